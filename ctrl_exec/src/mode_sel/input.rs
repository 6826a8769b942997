//! Operator input sampled by ModeSel

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use hw_if::eqpt::input::InputDevice;

use super::InputMap;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The operator's input on one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OperatorInput {
    /// Position axis, between -1 and +1
    pub axis: f64,

    /// Voltage mode trigger
    pub trigger_a: bool,

    /// Torque-current mode trigger
    pub trigger_b: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The two mode triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trigger {
    A,
    B,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl OperatorInput {
    /// Sample the device through the given map.
    pub fn sample<D: InputDevice + ?Sized>(device: &D, map: &InputMap) -> Self {
        Self {
            axis: device.read_axis(map.axis),
            trigger_a: device.read_button(map.trigger_a_button),
            trigger_b: device.read_button(map.trigger_b_button),
        }
    }

    /// `true` if the trigger is held.
    pub fn is_held(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::A => self.trigger_a,
            Trigger::B => self.trigger_b,
        }
    }
}
