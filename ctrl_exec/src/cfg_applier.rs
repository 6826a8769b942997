//! # Configuration applier
//!
//! Applies a [`MotorConfig`] to a motor controller, retrying a bounded number of times.
//!
//! With the default policy failures are retried immediately in a tight loop. This is only suitable
//! for the one-shot startup phase, before the cyclic processing begins. Anything applying
//! configurations while the loop is running shall use a policy with a non-zero backoff.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use log::{debug, error, info};

use hw_if::eqpt::{
    DeviceId, StatusCode,
    motor::{MotorConfig, MotorController},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Default number of attempts made to apply a configuration.
pub const MAX_CONFIG_ATTEMPTS: u32 = 5;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// How many times, and how far apart, a configuration apply is attempted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of apply calls made
    pub max_attempts: u32,

    /// Time slept between a failed attempt and the next
    pub backoff: Duration,
}

/// Acknowledgement that a configuration has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Number of apply calls made, including the successful one
    pub attempts: u32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "Could not apply config to device {id} after {attempts} attempt(s), error code: {status}"
    )]
    ApplyFailed {
        id: DeviceId,
        attempts: u32,
        status: StatusCode,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_CONFIG_ATTEMPTS,
            backoff: Duration::from_secs(0),
        }
    }
}

impl ConfigError {
    /// The last status reported by the device.
    pub fn status(&self) -> StatusCode {
        match self {
            ConfigError::ApplyFailed { status, .. } => *status,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Apply `config` to `motor`, stopping at the first attempt the device acknowledges.
///
/// If every attempt fails the returned error carries the status of the final attempt, and the
/// failure is logged. A failure is never fatal: the device keeps whatever configuration it holds.
pub fn apply<M>(
    motor: &mut M,
    config: &MotorConfig,
    policy: &RetryPolicy,
) -> Result<Ack, ConfigError>
where
    M: MotorController + ?Sized,
{
    let mut status = StatusCode::NotInitialized;

    for attempt in 1..=policy.max_attempts {
        if attempt > 1 && policy.backoff > Duration::from_secs(0) {
            std::thread::sleep(policy.backoff);
        }

        status = motor.apply_config(config);

        if status.is_ok() {
            info!(
                "Config applied to device {} ({} attempt(s))",
                motor.id(),
                attempt
            );
            return Ok(Ack { attempts: attempt });
        }

        debug!(
            "Config apply attempt {}/{} on device {} failed: {}",
            attempt,
            policy.max_attempts,
            motor.id(),
            status
        );
    }

    let err = ConfigError::ApplyFailed {
        id: motor.id(),
        attempts: policy.max_attempts,
        status,
    };
    error!("{}", err);

    Err(err)
}
