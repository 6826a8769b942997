//! # Robot
//!
//! The body of the periodic loop. `tick` is called once per cycle by the executable's scheduler
//! and issues exactly one control request to the master motor.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace};
use serde::Serialize;

use hw_if::{
    ds::RobotMode,
    eqpt::{
        input::InputDevice,
        motor::{ControlRequest, MotorController},
    },
};

use util::module::State;

use crate::{
    mode_sel::{self, ModeSel, OperatorInput},
    motor_pair::MotorPair,
    tm::Telemetry,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The robot: a motor pair driven from operator input, reporting to telemetry.
pub struct Robot<M: MotorController, T: Telemetry> {
    pair: MotorPair<M>,
    mode_sel: ModeSel,
    tm: T,

    /// Mode of the previous cycle, `None` before the first
    mode: Option<RobotMode>,
}

/// What happened on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub mode: RobotMode,

    /// Master position forwarded to telemetry
    pub position_rot: f64,

    /// Input sampled this cycle, only in teleop
    pub input: Option<OperatorInput>,

    /// The request issued to the master
    pub request: ControlRequest,

    /// Selection report, only in teleop
    pub mode_sel_rpt: Option<mode_sel::StatusReport>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<M: MotorController, T: Telemetry> Robot<M, T> {
    /// Build the robot from an initialised pair.
    pub fn new(pair: MotorPair<M>, mode_sel: ModeSel, tm: T) -> Self {
        Self {
            pair,
            mode_sel,
            tm,
            mode: None,
        }
    }

    /// Execute one cycle in the given mode.
    pub fn tick<D: InputDevice + ?Sized>(&mut self, mode: RobotMode, input: &D) -> TickReport {
        if self.mode != Some(mode) {
            self.mode_init(mode);
        }

        let position_rot = self.robot_periodic();

        let (request, input, mode_sel_rpt) = match mode {
            RobotMode::Teleop => {
                let (request, operator_input, rpt) = self.teleop_periodic(input);
                (request, Some(operator_input), Some(rpt))
            }
            // The hardware is neutral outside teleop, say so explicitly so there's still one
            // request per cycle
            RobotMode::Disabled | RobotMode::Autonomous | RobotMode::Test => {
                (ControlRequest::Brake, None, None)
            }
        };

        self.pair.set_control(request);

        TickReport {
            mode,
            position_rot,
            input,
            request,
            mode_sel_rpt,
        }
    }

    /// Runs every cycle regardless of mode.
    fn robot_periodic(&mut self) -> f64 {
        let position_rot = self.pair.master_position();
        self.tm.update(position_rot);

        position_rot
    }

    fn teleop_periodic<D: InputDevice + ?Sized>(
        &mut self,
        device: &D,
    ) -> (ControlRequest, OperatorInput, mode_sel::StatusReport) {
        let input = OperatorInput::sample(device, &self.mode_sel.params().input_map);

        let (request, rpt) = match self.mode_sel.proc(&input) {
            Ok(out) => out,
            Err(e) => match e {},
        };
        trace!("Teleop input {:?} -> {:?}", input, request);

        (request, input, rpt)
    }

    /// Called on the first cycle of a new mode.
    fn mode_init(&mut self, mode: RobotMode) {
        match self.mode {
            Some(prev) => info!("Mode change: {:?} -> {:?}", prev, mode),
            None => info!("Starting in {:?}", mode),
        }

        self.mode = Some(mode);
    }

    pub fn mode(&self) -> Option<RobotMode> {
        self.mode
    }

    pub fn mode_sel(&self) -> &ModeSel {
        &self.mode_sel
    }

    pub fn pair(&self) -> &MotorPair<M> {
        &self.pair
    }

    pub fn tm(&self) -> &T {
        &self.tm
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        cfg_applier::RetryPolicy,
        mode_sel::{StatusReport, Trigger},
        motor_pair::PairParams,
        sim_motor::SimMotor,
    };
    use hw_if::{
        ds::DsFrame,
        eqpt::{DeviceId, motor::{MotorConfig, OutputDomain}},
    };

    fn robot() -> Robot<SimMotor, Vec<f64>> {
        let (pair, _) = MotorPair::init(
            SimMotor::new(DeviceId(31)),
            SimMotor::new(DeviceId(32)),
            &PairParams {
                master_id: DeviceId(31),
                follower_id: DeviceId(32),
                follower_invert: false,
            },
            &MotorConfig::default(),
            &RetryPolicy::default(),
        );

        Robot::new(pair, ModeSel::default(), Vec::new())
    }

    fn frame(mode: RobotMode, axis: f64, buttons: Vec<u8>) -> DsFrame {
        DsFrame {
            mode,
            axes: vec![0.0, axis],
            buttons,
        }
    }

    #[test]
    fn test_teleop_voltage() {
        let mut r = robot();

        let rpt = r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, 0.5, vec![5]));

        assert_eq!(rpt.request, ControlRequest::position(OutputDomain::Voltage, 5.0));
        assert_eq!(r.pair().master().last_control(), Some(rpt.request));
    }

    #[test]
    fn test_teleop_current_deadzone() {
        let mut r = robot();

        let rpt = r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, 0.005, vec![6]));

        assert_eq!(rpt.request, ControlRequest::position(OutputDomain::Current, 0.0));
        assert_eq!(rpt.mode_sel_rpt.map(|s| s.deadzone_applied), Some(true));
    }

    #[test]
    fn test_mode_sel_report_follows_teleop() {
        let mut r = robot();
        assert_eq!(r.mode_sel().report(), StatusReport::default());

        r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, 0.005, vec![6]));
        assert_eq!(
            r.mode_sel().report(),
            StatusReport { deadzone_applied: true, trigger: Some(Trigger::B) }
        );

        r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, 0.5, vec![]));
        assert_eq!(
            r.mode_sel().report(),
            StatusReport { deadzone_applied: false, trigger: None }
        );

        // Selection only runs in teleop
        r.tick(RobotMode::Disabled, &frame(RobotMode::Disabled, 0.5, vec![5]));
        assert_eq!(r.mode_sel().report().trigger, None);
    }

    #[test]
    fn test_teleop_brake() {
        let mut r = robot();

        let rpt = r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, -1.0, vec![]));

        assert_eq!(rpt.request, ControlRequest::Brake);
        assert_eq!(rpt.input.map(|i| i.axis), Some(-1.0));
    }

    #[test]
    fn test_one_request_per_tick() {
        let mut r = robot();
        let modes = [
            RobotMode::Disabled,
            RobotMode::Teleop,
            RobotMode::Teleop,
            RobotMode::Autonomous,
            RobotMode::Test,
            RobotMode::Teleop,
        ];

        for (i, &mode) in modes.iter().enumerate() {
            r.tick(mode, &frame(mode, 0.7, vec![5, 6]));
            assert_eq!(r.pair().master().num_control_calls(), i + 1);
        }

        assert_eq!(r.pair().follower().num_control_calls(), 0);
        assert_eq!(r.mode(), Some(RobotMode::Teleop));
    }

    #[test]
    fn test_brake_outside_teleop() {
        let mut r = robot();

        for &mode in [RobotMode::Disabled, RobotMode::Autonomous, RobotMode::Test].iter() {
            let rpt = r.tick(mode, &frame(mode, 1.0, vec![5]));
            assert_eq!(rpt.request, ControlRequest::Brake);
            assert_eq!(rpt.input, None);
        }
    }

    #[test]
    fn test_position_forwarded_every_tick() {
        let mut r = robot();

        r.tick(RobotMode::Disabled, &DsFrame::default());
        r.tick(RobotMode::Teleop, &frame(RobotMode::Teleop, 0.2, vec![5]));

        // Master zeroed at init, no physics in the sim
        assert_eq!(r.tm(), &vec![0.0, 0.0]);
    }
}
