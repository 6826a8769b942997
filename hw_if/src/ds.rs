//! # Driver station module
//!
//! A driver station frame carries everything the operator sends the robot each cycle: the
//! enabled mode plus the state of the controller's axes and buttons.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
use crate::eqpt::input::{AxisId, ButtonId, InputDevice};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One sample of the driver station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DsFrame {
    /// The mode the robot is commanded to run in
    pub mode: RobotMode,

    /// Axis values indexed by `AxisId`, each between -1 and +1
    pub axes: Vec<f64>,

    /// IDs of the buttons currently held
    pub buttons: Vec<ButtonId>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Modes the robot can be commanded into by the driver station.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum RobotMode {
    Disabled,
    Autonomous,
    Teleop,
    Test
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum DsFrameParseError {
    #[error("Frame contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Frame has an invalid mode ({0})")]
    InvalidMode(String),

    #[error("Frame has invalid axes ({0})")]
    InvalidAxes(String),

    #[error("Frame has invalid buttons ({0})")]
    InvalidButtons(String)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DsFrame {

    /// Parse a frame from a JSON object.
    ///
    /// `mode` is required, `axes` and `buttons` default to empty when absent.
    pub fn from_json(json_str: &str) -> Result<Self, DsFrameParseError> {
        // Parse the JSON string into a value
        let val: Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => return Err(DsFrameParseError::InvalidJson(e))
        };

        let mode = match val["mode"].as_str() {
            Some(s) => match RobotMode::from_str(s) {
                Some(m) => m,
                None => return Err(DsFrameParseError::InvalidMode(
                    format!("{} is not a recognised mode", s)
                ))
            },
            None => return Err(DsFrameParseError::InvalidMode(String::from(
                "Expected \"mode\" to be a string"
            )))
        };

        let mut axes = vec![];
        if !val["axes"].is_null() {
            let arr = match val["axes"].as_array() {
                Some(a) => a,
                None => return Err(DsFrameParseError::InvalidAxes(String::from(
                    "Expected \"axes\" to be an array"
                )))
            };

            for (i, a) in arr.iter().enumerate() {
                match a.as_f64() {
                    Some(v) if (-1.0..=1.0).contains(&v) => axes.push(v),
                    Some(v) => return Err(DsFrameParseError::InvalidAxes(
                        format!("axis {} value {} is outside [-1, 1]", i, v)
                    )),
                    None => return Err(DsFrameParseError::InvalidAxes(
                        format!("axis {} is not a number", i)
                    ))
                }
            }
        }

        let mut buttons = vec![];
        if !val["buttons"].is_null() {
            let arr = match val["buttons"].as_array() {
                Some(a) => a,
                None => return Err(DsFrameParseError::InvalidButtons(String::from(
                    "Expected \"buttons\" to be an array"
                )))
            };

            for b in arr.iter() {
                match b.as_u64() {
                    Some(id) if id <= ButtonId::MAX as u64 => buttons.push(id as ButtonId),
                    _ => return Err(DsFrameParseError::InvalidButtons(
                        format!("{} is not a valid button ID", b)
                    ))
                }
            }
        }

        Ok(DsFrame {
            mode,
            axes,
            buttons
        })
    }
}

impl InputDevice for DsFrame {
    /// Axes missing from the frame read as centred.
    fn read_axis(&self, axis: AxisId) -> f64 {
        self.axes.get(axis).copied().unwrap_or(0.0)
    }

    fn read_button(&self, button: ButtonId) -> bool {
        self.buttons.contains(&button)
    }
}

impl Default for RobotMode {
    fn default() -> Self {
        RobotMode::Disabled
    }
}

impl RobotMode {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "DISABLED" => Some(RobotMode::Disabled),
            "AUTO" => Some(RobotMode::Autonomous),
            "TELEOP" => Some(RobotMode::Teleop),
            "TEST" => Some(RobotMode::Test),
            _ => None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_frame() {
        let frame = DsFrame::from_json(
            r#"{"mode": "TELEOP", "axes": [0.0, -0.5], "buttons": [5]}"#
        ).unwrap();

        assert_eq!(frame.mode, RobotMode::Teleop);
        assert_eq!(frame.read_axis(1), -0.5);
        assert!(frame.read_button(5));
        assert!(!frame.read_button(6));
    }

    #[test]
    fn test_missing_inputs_are_neutral() {
        let frame = DsFrame::from_json(r#"{"mode": "DISABLED"}"#).unwrap();

        assert_eq!(frame.mode, RobotMode::Disabled);
        assert_eq!(frame.read_axis(1), 0.0);
        assert!(!frame.read_button(5));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            DsFrame::from_json(r#"{"mode": "DRIVE"}"#),
            Err(DsFrameParseError::InvalidMode(_))
        ));
        assert!(matches!(
            DsFrame::from_json(r#"{"axes": [0.0]}"#),
            Err(DsFrameParseError::InvalidMode(_))
        ));
        assert!(matches!(
            DsFrame::from_json(r#"{"mode": "TELEOP", "axes": [1.5]}"#),
            Err(DsFrameParseError::InvalidAxes(_))
        ));
        assert!(matches!(
            DsFrame::from_json(r#"{"mode": "TELEOP", "buttons": [-1]}"#),
            Err(DsFrameParseError::InvalidButtons(_))
        ));
        assert!(matches!(
            DsFrame::from_json("not json"),
            Err(DsFrameParseError::InvalidJson(_))
        ));
    }
}
