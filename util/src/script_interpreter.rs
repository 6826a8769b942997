//! # Driver station script interpreter module
//!
//! This module provides an interpreter for driver station scripts, allowing a
//! sequence of operator inputs to be played back into the control loop.
//!
//! A script is a list of timestamped frames, one per line:
//!
//! ```text
//! 0.0: {"mode": "DISABLED"};
//! 1.0: {"mode": "TELEOP", "axes": [0.0, 0.5], "buttons": [5]};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

// Internal
use hw_if::ds::{DsFrame, DsFrameParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A frame which is scripted to be received at a specific time.
struct ScriptedFrame {
    /// The time the frame becomes active
    exec_time_s: f64,

    frame: DsFrame
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_frames` to acquire the frames which have become active.
pub struct ScriptInterpreter {
    script_path: Option<PathBuf>,
    frames: VecDeque<ScriptedFrame>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script timestamps must not decrease, found {1} s after {0} s")]
    OutOfOrder(f64, f64),

    #[error("Script contains an invalid frame at {0} s: {1}")]
    InvalidFrame(f64, DsFrameParseError)
}

#[derive(Debug, PartialEq)]
pub enum PendingFrames {
    None,
    Some(Vec<DsFrame>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_script(&script)?;
        si.script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of frames
        let mut frame_queue: VecDeque<ScriptedFrame> = VecDeque::new();

        for cap in frame_regex().captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = frame_queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(prev.exec_time_s, exec_time_s));
                }
            }

            // The payload is a JSON frame
            let frame = DsFrame::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidFrame(exec_time_s, e))?;

            frame_queue.push_back(ScriptedFrame {
                exec_time_s,
                frame
            });
        }

        if frame_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            script_path: None,
            frames: frame_queue
        })
    }

    /// Return the frames which became active since the last call, using the
    /// session clock.
    pub fn get_pending_frames(&mut self) -> PendingFrames {
        self.get_pending_frames_at(get_elapsed_seconds())
    }

    /// Return the frames whose time is earlier than `current_time_s`.
    pub fn get_pending_frames_at(&mut self, current_time_s: f64) -> PendingFrames {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.frames.is_empty() {
            return PendingFrames::EndOfScript
        }

        let mut frame_vec: Vec<DsFrame> = vec![];

        // Keep popping from the front while the head is due
        while let Some(f) = self.frames.front() {
            if f.exec_time_s >= current_time_s {
                break;
            }

            if let Some(f) = self.frames.pop_front() {
                frame_vec.push(f.frame);
            }
        }

        if frame_vec.is_empty() {
            PendingFrames::None
        }
        else {
            PendingFrames::Some(frame_vec)
        }
    }

    /// Get the number of frames remaining in the script
    pub fn get_num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.frames.back() {
            Some(f) => f.exec_time_s,
            None => 0f64
        }
    }

    /// Path the script was loaded from, if it came from a file
    pub fn script_path(&self) -> Option<&Path> {
        self.script_path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The line format: `<seconds>: <json>;`
fn frame_regex() -> Regex {
    RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
        .multi_line(true)
        .build()
        .expect("frame regex is valid")
}

#[cfg(test)]
mod test {
    use super::*;
    use hw_if::ds::RobotMode;

    const SCRIPT: &str = r#"
        0.0: {"mode": "DISABLED"};
        0.5: {"mode": "TELEOP", "axes": [0.0, 0.5], "buttons": [5]};
        0.5: {"mode": "TELEOP", "axes": [0.0, 0.5], "buttons": [6]};
        2.0: {"mode": "DISABLED"};
    "#;

    #[test]
    fn test_parse_script() {
        let si = ScriptInterpreter::from_script(SCRIPT).unwrap();

        assert_eq!(si.get_num_frames(), 4);
        assert_eq!(si.get_duration(), 2.0);
        assert_eq!(si.script_path(), None);
    }

    #[test]
    fn test_pending_frames() {
        let mut si = ScriptInterpreter::from_script(SCRIPT).unwrap();

        match si.get_pending_frames_at(0.1) {
            PendingFrames::Some(f) => {
                assert_eq!(f.len(), 1);
                assert_eq!(f[0].mode, RobotMode::Disabled);
            },
            p => panic!("Expected one frame, got {:?}", p)
        }

        assert_eq!(si.get_pending_frames_at(0.2), PendingFrames::None);

        match si.get_pending_frames_at(1.0) {
            PendingFrames::Some(f) => {
                assert_eq!(f.len(), 2);
                assert_eq!(f[1].buttons, vec![6]);
            },
            p => panic!("Expected two frames, got {:?}", p)
        }

        assert!(matches!(si.get_pending_frames_at(3.0), PendingFrames::Some(_)));
        assert_eq!(si.get_pending_frames_at(4.0), PendingFrames::EndOfScript);
    }

    #[test]
    fn test_script_errors() {
        assert!(matches!(
            ScriptInterpreter::from_script("nothing here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_script(r#"1.0: {"mode": "FLY"};"#),
            Err(ScriptError::InvalidFrame(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::from_script(
                "1.0: {\"mode\": \"TEST\"};\n0.5: {\"mode\": \"TEST\"};"
            ),
            Err(ScriptError::OutOfOrder(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::new("/does/not/exist.ds"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }

    #[test]
    fn test_demo_script() {
        let si = ScriptInterpreter::from_script(
            include_str!("../../scripts/teleop_demo.ds")
        ).unwrap();

        assert_eq!(si.get_num_frames(), 8);
        assert_eq!(si.get_duration(), 9.0);
    }
}
