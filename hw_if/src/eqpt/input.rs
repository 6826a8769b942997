//! # Operator Input Equipment

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Index of an analog axis on the operator's controller.
pub type AxisId = usize;

/// Index of a button on the operator's controller.
pub type ButtonId = u8;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Read access to the operator's controller.
pub trait InputDevice {
    /// Value of an analog axis, between -1.0 and +1.0.
    fn read_axis(&self, axis: AxisId) -> f64;

    /// `true` while the button is held.
    fn read_button(&self, button: ButtonId) -> bool;
}
