//! Parameters structure for ModeSel

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use hw_if::eqpt::input::{AxisId, ButtonId};

use super::{AXIS_SCALE_ROT, DEADZONE_ROT};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for mode selection.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Params {

    /// Demand at full axis deflection.
    ///
    /// Units: rotations
    #[serde(default = "default_scale")]
    pub axis_scale_rot: f64,

    /// Demands with a magnitude less than or equal to this are zeroed.
    ///
    /// Units: rotations
    #[serde(default = "default_deadzone")]
    pub deadzone_rot: f64,

    /// Where on the controller the inputs are found.
    pub input_map: InputMap,
}

/// Location of ModeSel's inputs on the operator's controller.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct InputMap {
    /// Position axis
    pub axis: AxisId,

    /// Button acting as trigger A
    pub trigger_a_button: ButtonId,

    /// Button acting as trigger B
    pub trigger_b_button: ButtonId,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            axis_scale_rot: AXIS_SCALE_ROT,
            deadzone_rot: DEADZONE_ROT,
            input_map: InputMap::default(),
        }
    }
}

impl Default for InputMap {
    /// Left stick Y with the left and right bumpers on an Xbox controller.
    fn default() -> Self {
        Self {
            axis: 1,
            trigger_a_button: 5,
            trigger_b_button: 6,
        }
    }
}

fn default_scale() -> f64 {
    AXIS_SCALE_ROT
}

fn default_deadzone() -> f64 {
    DEADZONE_ROT
}
