//! Mode selection module
//!
//! Maps the operator's input to the control request issued to the master
//! motor on this cycle. Selection is a pure function of the current input,
//! nothing is carried over between cycles.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod input;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use input::*;
pub use params::*;
pub use state::*;

use hw_if::eqpt::motor::OutputDomain;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Rotations demanded at full axis deflection.
pub const AXIS_SCALE_ROT: f64 = 10.0;

/// Demands of this magnitude or less are treated as zero.
///
/// Units: rotations
pub const DEADZONE_ROT: f64 = 0.1;

/// Selection rules in priority order. The first rule whose trigger is held
/// decides the output domain, so `A` wins if both are held.
pub const SEL_RULES: [SelRule; 2] = [
    SelRule { trigger: Trigger::A, domain: OutputDomain::Voltage },
    SelRule { trigger: Trigger::B, domain: OutputDomain::Current },
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Pairs a trigger with the position loop used while it is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelRule {
    pub trigger: Trigger,
    pub domain: OutputDomain,
}
