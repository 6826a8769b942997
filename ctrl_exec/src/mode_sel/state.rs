//! Implementations for the ModeSel state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{OperatorInput, Params, Trigger, SEL_RULES};
use hw_if::eqpt::motor::ControlRequest;
use util::{
    params,
    module::State,
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mode selection module state
#[derive(Debug, Default)]
pub struct ModeSel {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
}

/// Status report for ModeSel processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// The demand was inside the deadzone and has been zeroed
    pub deadzone_applied: bool,

    /// The trigger whose rule was selected, `None` if braking
    pub trigger: Option<Trigger>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for ModeSel {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = OperatorInput;
    type OutputData = ControlRequest;
    type StatusReport = StatusReport;
    type ProcError = std::convert::Infallible;

    /// Initialise the ModeSel module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, _session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        Ok(())
    }

    /// Select this cycle's request.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let (request, report) = self.select(input_data);

        trace!("ModeSel output: {:?} ({:?})", request, report);

        self.report = report;

        Ok((request, report))
    }
}

impl ModeSel {

    /// Create the module from already loaded parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            report: StatusReport::default()
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Report from the last `proc` call.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Select the request for the given input.
    ///
    /// Always returns exactly one request. The first rule in `SEL_RULES`
    /// whose trigger is held gives a position target in that rule's domain,
    /// if no trigger is held the motor brakes and the axis is ignored.
    pub fn select(&self, input: &OperatorInput) -> (ControlRequest, StatusReport) {
        let (target_rot, deadzone_applied) = desired_rotations(
            input.axis,
            self.params.axis_scale_rot,
            self.params.deadzone_rot
        );

        match SEL_RULES.iter().find(|r| input.is_held(r.trigger)) {
            Some(rule) => (
                ControlRequest::position(rule.domain, target_rot),
                StatusReport {
                    deadzone_applied,
                    trigger: Some(rule.trigger)
                }
            ),
            None => (
                ControlRequest::Brake,
                StatusReport {
                    deadzone_applied,
                    trigger: None
                }
            )
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert an axis value into a position demand.
///
/// The demand is `axis * scale_rot`, zeroed if its magnitude is less than or
/// equal to `deadzone_rot`. No other limit is applied. The second element is
/// `true` if the deadzone zeroed the demand.
pub fn desired_rotations(axis: f64, scale_rot: f64, deadzone_rot: f64) -> (f64, bool) {
    let desired = axis * scale_rot;

    if desired.abs() <= deadzone_rot {
        (0.0, true)
    }
    else {
        (desired, false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mode_sel::{InputMap, AXIS_SCALE_ROT, DEADZONE_ROT};
    use hw_if::{
        ds::{DsFrame, RobotMode},
        eqpt::motor::OutputDomain,
    };

    fn input(axis: f64, trigger_a: bool, trigger_b: bool) -> OperatorInput {
        OperatorInput { axis, trigger_a, trigger_b }
    }

    fn target(request: ControlRequest) -> f64 {
        match request {
            ControlRequest::PositionTarget { target_rot, .. } => target_rot,
            ControlRequest::Brake => panic!("Expected a position target")
        }
    }

    #[test]
    fn test_desired_rotations_scaling() {
        for &axis in [-1.0, -0.5, -0.25, 0.02, 0.3, 0.75, 1.0].iter() {
            let (d, dz) = desired_rotations(axis, AXIS_SCALE_ROT, DEADZONE_ROT);
            assert_eq!(d, axis * 10.0);
            assert!(!dz);
        }
    }

    #[test]
    fn test_deadzone() {
        for &axis in [0.0, 0.005, -0.005, 0.009, -0.009].iter() {
            assert_eq!(
                desired_rotations(axis, AXIS_SCALE_ROT, DEADZONE_ROT),
                (0.0, true)
            );
        }

        // The boundary itself is suppressed
        assert_eq!(desired_rotations(0.1, 1.0, 0.1), (0.0, true));
        assert_eq!(desired_rotations(-0.1, 1.0, 0.1), (0.0, true));
        assert_eq!(desired_rotations(0.11, 1.0, 0.1), (0.11, false));

        // With the default scale the boundary is an axis of 0.01
        assert_eq!(desired_rotations(0.01, AXIS_SCALE_ROT, DEADZONE_ROT), (0.0, true));
        assert_eq!(desired_rotations(-0.01, AXIS_SCALE_ROT, DEADZONE_ROT), (0.0, true));
        assert!(!desired_rotations(0.011, AXIS_SCALE_ROT, DEADZONE_ROT).1);
    }

    #[test]
    fn test_voltage_mode() {
        let sel = ModeSel::default();

        let (req, rpt) = sel.select(&input(0.5, true, false));

        assert_eq!(req, ControlRequest::position(OutputDomain::Voltage, 5.0));
        assert_eq!(rpt, StatusReport { deadzone_applied: false, trigger: Some(Trigger::A) });
    }

    #[test]
    fn test_current_mode_in_deadzone() {
        let sel = ModeSel::default();

        let (req, rpt) = sel.select(&input(0.005, false, true));

        assert_eq!(req, ControlRequest::position(OutputDomain::Current, 0.0));
        assert!(rpt.deadzone_applied);
        assert_eq!(rpt.trigger, Some(Trigger::B));
    }

    #[test]
    fn test_brake_ignores_axis() {
        let sel = ModeSel::default();

        for &axis in [-1.0, -0.3, 0.0, 0.05, 1.0].iter() {
            assert_eq!(sel.select(&input(axis, false, false)).0, ControlRequest::Brake);
        }
    }

    #[test]
    fn test_trigger_a_wins() {
        let sel = ModeSel::default();

        for &axis in [-1.0, 0.0, 0.42].iter() {
            match sel.select(&input(axis, true, true)).0 {
                ControlRequest::PositionTarget { domain, .. } =>
                    assert_eq!(domain, OutputDomain::Voltage),
                r => panic!("Expected a voltage target, got {:?}", r)
            }
        }
    }

    #[test]
    fn test_select_is_pure() {
        let sel = ModeSel::default();
        let i = input(-0.63, false, true);

        let first = sel.select(&i);
        let second = sel.select(&i);

        assert_eq!(first, second);
        assert_eq!(target(first.0), -0.63 * 10.0);
    }

    #[test]
    fn test_proc_updates_report() {
        let mut sel = ModeSel::default();

        let (req, rpt) = sel.proc(&input(-1.0, false, false)).unwrap();

        assert_eq!(req, ControlRequest::Brake);
        assert_eq!(sel.report, rpt);
        assert_eq!(rpt.trigger, None);
    }

    #[test]
    fn test_sample_from_frame() {
        let frame = DsFrame {
            mode: RobotMode::Teleop,
            axes: vec![0.9, -0.5],
            buttons: vec![6],
        };

        let i = OperatorInput::sample(&frame, &InputMap::default());

        assert_eq!(i, input(-0.5, false, true));
    }

    #[test]
    fn test_params_defaults() {
        let p: Params = util::params::parse(
            "[input_map]\naxis = 0\ntrigger_a_button = 1\ntrigger_b_button = 2\n"
        ).unwrap();

        assert_eq!(p.axis_scale_rot, AXIS_SCALE_ROT);
        assert_eq!(p.deadzone_rot, DEADZONE_ROT);
        assert_eq!(p.input_map.axis, 0);

        let shipped: Params = util::params::parse(
            include_str!("../../../params/mode_sel.toml")
        ).unwrap();
        assert_eq!(shipped, Params::default());
    }
}
