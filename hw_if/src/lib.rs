//! # Hardware interface crate.
//!
//! Provides the common equipment interfaces shared between the control library, the utilities and
//! the executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Motor controller and operator input equipment definitions
pub mod eqpt;

/// Driver station frames and robot modes
pub mod ds;
