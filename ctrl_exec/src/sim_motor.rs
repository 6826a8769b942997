//! # Simulated motor controller
//!
//! A [`MotorController`] which stands in for the real hardware. It has no physics: the measured
//! position only changes when it is reset or set explicitly. Every call is recorded so the
//! sequence of commands can be inspected.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use log::trace;

use hw_if::eqpt::{
    DeviceId, StatusCode,
    motor::{ControlRequest, MotorConfig, MotorController},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated motor controller.
#[derive(Debug)]
pub struct SimMotor {
    id: DeviceId,

    /// Results returned by the next apply calls. Once empty every apply succeeds.
    apply_results: VecDeque<StatusCode>,

    config: Option<MotorConfig>,

    position_rot: f64,

    leader: Option<(DeviceId, bool)>,

    calls: Vec<SimCall>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A call made on a [`SimMotor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCall {
    ApplyConfig(StatusCode),
    SetPosition(f64),
    SetControl(ControlRequest),
    Follow(DeviceId, bool),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimMotor {
    /// Create a new simulated motor with factory configuration at position zero.
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            apply_results: VecDeque::new(),
            config: None,
            position_rot: 0.0,
            leader: None,
            calls: Vec::new(),
        }
    }

    /// Script the results of the next apply calls.
    pub fn with_apply_results(mut self, results: Vec<StatusCode>) -> Self {
        self.apply_results = results.into();
        self
    }

    /// Move the simulated rotor.
    pub fn set_measured_position(&mut self, position_rot: f64) {
        self.position_rot = position_rot;
    }

    /// The last configuration that was successfully applied.
    pub fn config(&self) -> Option<&MotorConfig> {
        self.config.as_ref()
    }

    /// The device this one follows, and whether the output is inverted.
    pub fn leader(&self) -> Option<(DeviceId, bool)> {
        self.leader
    }

    /// The last control request received.
    pub fn last_control(&self) -> Option<ControlRequest> {
        self.calls.iter().rev().find_map(|c| match c {
            SimCall::SetControl(r) => Some(*r),
            _ => None,
        })
    }

    pub fn num_apply_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SimCall::ApplyConfig(_)))
            .count()
    }

    pub fn num_control_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SimCall::SetControl(_)))
            .count()
    }

    /// Every call made on this motor, oldest first.
    pub fn calls(&self) -> &[SimCall] {
        &self.calls
    }
}

impl MotorController for SimMotor {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn apply_config(&mut self, config: &MotorConfig) -> StatusCode {
        let status = self.apply_results.pop_front().unwrap_or(StatusCode::Ok);

        if status.is_ok() {
            self.config = Some(*config);
        }

        self.calls.push(SimCall::ApplyConfig(status));
        status
    }

    fn set_position(&mut self, position_rot: f64) -> StatusCode {
        self.position_rot = position_rot;
        self.calls.push(SimCall::SetPosition(position_rot));
        StatusCode::Ok
    }

    fn position(&self) -> f64 {
        self.position_rot
    }

    fn set_control(&mut self, request: ControlRequest) -> StatusCode {
        trace!("SimMotor {} control: {:?}", self.id, request);
        self.calls.push(SimCall::SetControl(request));
        StatusCode::Ok
    }

    fn follow(&mut self, leader: DeviceId, invert: bool) -> StatusCode {
        self.leader = Some((leader, invert));
        self.calls.push(SimCall::Follow(leader, invert));
        StatusCode::Ok
    }
}
