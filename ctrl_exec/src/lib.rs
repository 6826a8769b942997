//! # Control library.
//!
//! This library allows other crates in the workspace, and the executable, to access the modules
//! of the position control software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Configuration applier - applies motor configurations with bounded retry
pub mod cfg_applier;

/// Data store - data shared across a cycle of the executable
pub mod data_store;

/// Mode selection module - converts operator input into the cycle's control request
pub mod mode_sel;

/// Motor pair - the master motor and the follower mirroring it
pub mod motor_pair;

/// Executable parameters
pub mod params;

/// Robot - body of the periodic loop
pub mod robot;

/// Simulated motor controller
pub mod sim_motor;

/// Telemetry - forwards the measured position to visualisation and archives
pub mod tm;
