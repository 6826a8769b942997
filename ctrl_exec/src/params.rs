//! # Control Executable Parameters
//!
//! This module provide parameters for the control executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use hw_if::eqpt::motor::MotorConfig;

use crate::{cfg_applier::RetryPolicy, motor_pair::PairParams};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest accepted cycle period.
///
/// Units: seconds
pub const MAX_CYCLE_PERIOD_S: f64 = 1.0;

/// Longest accepted delay between configuration attempts.
///
/// Units: seconds
pub const MAX_CONFIG_RETRY_BACKOFF_S: f64 = 1.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CtrlExecParams {

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Number of times applying a configuration is attempted before giving up
    pub max_config_attempts: u32,

    /// Delay between configuration attempts, zero retries immediately.
    ///
    /// Units: seconds
    #[serde(default)]
    pub config_retry_backoff_s: f64,

    /// IDs and binding of the master/follower pair
    pub pair: PairParams,

    /// Configuration applied to the master motor
    pub master_config: MotorConfig,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A parameter value outside of its accepted range.
#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("cycle_period_s must be in (0, {}] s, found {0}", MAX_CYCLE_PERIOD_S)]
    InvalidCyclePeriod(f64),

    #[error("config_retry_backoff_s must be in [0, {}] s, found {0}", MAX_CONFIG_RETRY_BACKOFF_S)]
    InvalidRetryBackoff(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CtrlExecParams {
    /// Target period of one cycle.
    pub fn cycle_period(&self) -> Result<Duration, ParamsError> {
        let p = self.cycle_period_s;

        // NaN fails both comparisons
        if p > 0.0 && p <= MAX_CYCLE_PERIOD_S {
            Ok(Duration::from_secs_f64(p))
        }
        else {
            Err(ParamsError::InvalidCyclePeriod(p))
        }
    }

    /// The retry policy used when applying configurations at startup.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ParamsError> {
        let b = self.config_retry_backoff_s;

        if !(b >= 0.0 && b <= MAX_CONFIG_RETRY_BACKOFF_S) {
            return Err(ParamsError::InvalidRetryBackoff(b));
        }

        Ok(RetryPolicy {
            max_attempts: self.max_config_attempts,
            backoff: Duration::from_secs_f64(b),
        })
    }

    /// Number of cycles executed per second.
    ///
    /// Only meaningful once `cycle_period` has been checked.
    pub fn cycle_frequency_hz(&self) -> f64 {
        1.0 / self.cycle_period_s
    }
}
