//! # Motor Controller Equipment
//!
//! Configuration, requests and the driver trait for the closed-loop motor controllers.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{DeviceId, StatusCode};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Unified API for a closed-loop motor controller.
///
/// Every call returns the [`StatusCode`] reported by the device. None of these calls may block
/// for longer than a single cycle.
pub trait MotorController {
    /// The device's bus ID.
    fn id(&self) -> DeviceId;

    /// Apply a full configuration to the device, replacing whatever it held before.
    fn apply_config(&mut self, config: &MotorConfig) -> StatusCode;

    /// Reset the device's position reference so the current position reads `position_rot`.
    fn set_position(&mut self, position_rot: f64) -> StatusCode;

    /// Latest measured position of the rotor.
    ///
    /// Units: rotations
    fn position(&self) -> f64;

    /// Command the device with the given request.
    fn set_control(&mut self, request: ControlRequest) -> StatusCode;

    /// Make this device mirror the output of `leader`, optionally inverting it.
    ///
    /// Once set the mirroring is handled by the hardware and needs no further calls.
    fn follow(&mut self, leader: DeviceId, invert: bool) -> StatusCode;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Gains and peak outputs of one position control loop.
///
/// The units of the peak outputs depend on the [`OutputDomain`] the profile is used in: volts for
/// `Voltage`, amps for `Current`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ControlProfile {
    /// Output per rotation of position error
    pub kp: f64,

    /// Output per integrated rotation-second of error
    pub ki: f64,

    /// Output per rotation/second of error rate
    pub kd: f64,

    /// Highest output the loop may demand
    pub peak_forward: f64,

    /// Lowest (most negative) output the loop may demand
    pub peak_reverse: f64,
}

/// Full configuration applied to a single motor controller.
///
/// A `None` profile leaves that domain at factory defaults, so `MotorConfig::default()` is the
/// pass-through configuration used for a follower.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorConfig {
    /// Voltage position loop, held in slot 0.
    #[serde(default)]
    pub voltage: Option<ControlProfile>,

    /// Torque-current position loop, held in slot 1.
    #[serde(default)]
    pub current: Option<ControlProfile>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The physical quantity a position loop regulates to reach its target.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum OutputDomain {
    /// Loop output is a voltage
    Voltage,

    /// Loop output is a torque-producing current
    Current,
}

/// A request sent to a motor controller once per cycle.
#[derive(Serialize, Deserialize, Debug, PartialEq, Copy, Clone)]
pub enum ControlRequest {
    /// Drive to an absolute position using the loop of the given domain.
    PositionTarget {
        domain: OutputDomain,

        /// Units: rotations
        target_rot: f64,
    },

    /// Neutral output with the motor in brake.
    Brake,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OutputDomain {
    /// The closed-loop slot index a profile of this domain occupies on the device.
    pub fn slot(&self) -> u8 {
        match self {
            OutputDomain::Voltage => 0,
            OutputDomain::Current => 1,
        }
    }
}

impl MotorConfig {
    /// Get the profile for the given domain, if one is configured.
    pub fn profile(&self, domain: OutputDomain) -> Option<&ControlProfile> {
        match domain {
            OutputDomain::Voltage => self.voltage.as_ref(),
            OutputDomain::Current => self.current.as_ref(),
        }
    }
}

impl ControlRequest {
    /// Build a position request for the given domain.
    pub fn position(domain: OutputDomain, target_rot: f64) -> Self {
        ControlRequest::PositionTarget { domain, target_rot }
    }
}
