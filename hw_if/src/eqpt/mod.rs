//! # Equipment
//!
//! Definitions for the equipment the control loop talks to: the motor controllers and the operator
//! input device.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod input;
pub mod motor;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Stable numeric identifier of a device on the robot's bus.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
#[serde(transparent)]
pub struct DeviceId(pub u8);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Status returned by the hardware layer for every call made on a device.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Copy, Clone)]
pub enum StatusCode {
    /// Call acknowledged by the device
    Ok,

    /// No call has been made yet
    NotInitialized,

    /// The frame could not be transmitted onto the bus
    TxFailed,

    /// The device didn't answer in time
    RxTimeout,

    /// The device isn't present on the bus
    EcuNotPresent,

    /// The device rejected the configuration
    ConfigFailed,

    /// A value in the request was outside the device's accepted range
    InvalidParamValue,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StatusCode {
    /// Returns `true` if the device acknowledged the call.
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusCode::Ok => "OK",
            StatusCode::NotInitialized => "StatusCodeNotInitialized",
            StatusCode::TxFailed => "TxFailed",
            StatusCode::RxTimeout => "RxTimeout",
            StatusCode::EcuNotPresent => "EcuIsNotPresent",
            StatusCode::ConfigFailed => "ConfigFailed",
            StatusCode::InvalidParamValue => "InvalidParamValue",
        };

        write!(f, "{}", s)
    }
}
