//! # Master/follower motor pair
//!
//! Two motors driving one mechanism. Only the master is ever commanded once the pair has been
//! initialised, the follower mirrors its output in hardware.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, warn};
use serde::Deserialize;

use hw_if::eqpt::{
    DeviceId,
    motor::{ControlRequest, MotorConfig, MotorController},
};

use crate::cfg_applier::{self, Ack, ConfigError, RetryPolicy};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters describing the pair.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PairParams {
    pub master_id: DeviceId,

    pub follower_id: DeviceId,

    /// If true the follower's output is the negative of the master's
    #[serde(default)]
    pub follower_invert: bool,
}

/// The standing relationship between the follower and its leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerBinding {
    pub follower: DeviceId,
    pub leader: DeviceId,
    pub invert: bool,
}

/// Outcome of initialising the pair.
#[derive(Debug)]
pub struct InitReport {
    pub master_config: Result<Ack, ConfigError>,
    pub follower_config: Result<Ack, ConfigError>,
}

/// A master motor and a follower bound to it.
pub struct MotorPair<M: MotorController> {
    master: M,
    follower: M,
    binding: FollowerBinding,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<M: MotorController> MotorPair<M> {
    /// Configure both motors, bind the follower and zero the master.
    ///
    /// The master gets `master_config`, the follower the pass-through (factory default)
    /// configuration. Both are applied with the same retry policy. A failed apply is logged and
    /// reported but does not stop initialisation, the robot remains controllable on whatever
    /// configuration the devices hold.
    pub fn init(
        mut master: M,
        mut follower: M,
        params: &PairParams,
        master_config: &MotorConfig,
        policy: &RetryPolicy,
    ) -> (Self, InitReport) {
        if master.id() != params.master_id || follower.id() != params.follower_id {
            warn!(
                "Motor IDs ({}, {}) differ from the pair parameters ({}, {})",
                master.id(),
                follower.id(),
                params.master_id,
                params.follower_id
            );
        }

        let master_res = cfg_applier::apply(&mut master, master_config, policy);

        let follower_res = cfg_applier::apply(&mut follower, &MotorConfig::default(), policy);
        if let Err(ref e) = follower_res {
            warn!("Follower will run on its previous configuration: {}", e);
        }

        let binding = FollowerBinding {
            follower: follower.id(),
            leader: master.id(),
            invert: params.follower_invert,
        };
        let status = follower.follow(binding.leader, binding.invert);
        debug!("Follow request status: {}", status);
        info!(
            "Device {} following device {}{}",
            binding.follower,
            binding.leader,
            if binding.invert { " (inverted)" } else { "" }
        );

        // All position targets are relative to where the master is now
        let status = master.set_position(0.0);
        debug!("Zero position status: {}", status);

        (
            Self {
                master,
                follower,
                binding,
            },
            InitReport {
                master_config: master_res,
                follower_config: follower_res,
            },
        )
    }

    /// Issue a request to the master. The follower mirrors it in hardware.
    pub fn set_control(&mut self, request: ControlRequest) {
        let status = self.master.set_control(request);

        if !status.is_ok() {
            debug!("Control request {:?} returned {}", request, status);
        }
    }

    /// Latest measured position of the master.
    ///
    /// Units: rotations
    pub fn master_position(&self) -> f64 {
        self.master.position()
    }

    /// Apply a new configuration to the master.
    ///
    /// Configurations are otherwise only applied in `init`. Use a policy with a backoff if the
    /// cyclic processing is running.
    pub fn reapply_master_config(
        &mut self,
        config: &MotorConfig,
        policy: &RetryPolicy,
    ) -> Result<Ack, ConfigError> {
        cfg_applier::apply(&mut self.master, config, policy)
    }

    pub fn binding(&self) -> FollowerBinding {
        self.binding
    }

    pub fn master(&self) -> &M {
        &self.master
    }

    pub fn follower(&self) -> &M {
        &self.follower
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim_motor::{SimCall, SimMotor};
    use hw_if::eqpt::{
        StatusCode,
        motor::{ControlProfile, OutputDomain},
    };

    fn params(invert: bool) -> PairParams {
        PairParams {
            master_id: DeviceId(31),
            follower_id: DeviceId(32),
            follower_invert: invert,
        }
    }

    fn master_config() -> MotorConfig {
        MotorConfig {
            voltage: Some(ControlProfile {
                kp: 2.4,
                ki: 0.0,
                kd: 0.1,
                peak_forward: 8.0,
                peak_reverse: -8.0,
            }),
            current: Some(ControlProfile {
                kp: 60.0,
                ki: 0.0,
                kd: 6.0,
                peak_forward: 120.0,
                peak_reverse: -120.0,
            }),
        }
    }

    #[test]
    fn test_init_sequence() {
        let mut master = SimMotor::new(DeviceId(31));
        master.set_measured_position(3.2);

        let (pair, report) = MotorPair::init(
            master,
            SimMotor::new(DeviceId(32)),
            &params(true),
            &master_config(),
            &RetryPolicy::default(),
        );

        assert_eq!(report.master_config, Ok(Ack { attempts: 1 }));
        assert_eq!(report.follower_config, Ok(Ack { attempts: 1 }));

        assert_eq!(pair.master().config(), Some(&master_config()));
        assert_eq!(pair.follower().config(), Some(&MotorConfig::default()));

        assert_eq!(pair.follower().leader(), Some((DeviceId(31), true)));
        assert_eq!(
            pair.binding(),
            FollowerBinding {
                follower: DeviceId(32),
                leader: DeviceId(31),
                invert: true,
            }
        );

        // Master configured then zeroed
        assert_eq!(
            pair.master().calls(),
            &[
                SimCall::ApplyConfig(StatusCode::Ok),
                SimCall::SetPosition(0.0)
            ]
        );
        assert_eq!(pair.master_position(), 0.0);
    }

    #[test]
    fn test_init_continues_after_config_failure() {
        let (pair, report) = MotorPair::init(
            SimMotor::new(DeviceId(31))
                .with_apply_results(vec![StatusCode::ConfigFailed; 5]),
            SimMotor::new(DeviceId(32)).with_apply_results(vec![StatusCode::EcuNotPresent; 5]),
            &params(false),
            &master_config(),
            &RetryPolicy::default(),
        );

        assert_eq!(report.master_config.unwrap_err().status(), StatusCode::ConfigFailed);
        assert_eq!(report.follower_config.unwrap_err().status(), StatusCode::EcuNotPresent);

        // Binding and zeroing still happen
        assert_eq!(pair.follower().leader(), Some((DeviceId(31), false)));
        assert_eq!(pair.master().calls().last(), Some(&SimCall::SetPosition(0.0)));
    }

    #[test]
    fn test_follower_never_commanded() {
        let (mut pair, _) = MotorPair::init(
            SimMotor::new(DeviceId(31)),
            SimMotor::new(DeviceId(32)),
            &params(false),
            &master_config(),
            &RetryPolicy::default(),
        );

        pair.set_control(ControlRequest::position(OutputDomain::Voltage, 5.0));
        pair.set_control(ControlRequest::Brake);

        assert_eq!(pair.master().num_control_calls(), 2);
        assert_eq!(pair.master().last_control(), Some(ControlRequest::Brake));
        assert_eq!(pair.follower().num_control_calls(), 0);
    }

    #[test]
    fn test_config_only_reapplied_on_request() {
        let (mut pair, _) = MotorPair::init(
            SimMotor::new(DeviceId(31)),
            SimMotor::new(DeviceId(32)),
            &params(false),
            &master_config(),
            &RetryPolicy::default(),
        );

        for _ in 0..10 {
            pair.set_control(ControlRequest::Brake);
        }
        assert_eq!(pair.master().num_apply_calls(), 1);

        let ack = pair.reapply_master_config(&MotorConfig::default(), &RetryPolicy::default());
        assert_eq!(ack, Ok(Ack { attempts: 1 }));
        assert_eq!(pair.master().num_apply_calls(), 2);
        assert_eq!(pair.master().config(), Some(&MotorConfig::default()));
    }
}
