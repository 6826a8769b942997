//! # Telemetry
//!
//! Forwards the measured mechanism position to visualisation and the session archive.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};
use serde::Serialize;

use util::{
    archive::{ArchiveError, Archived, Archiver},
    session::{self, Session},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Session-relative path of the mechanism archive.
const MECHANISM_ARCH_PATH: &str = "tm/mechanism.csv";

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sink for the measured position.
///
/// Updates are fire-and-forget: they shall not block and never report failure to the caller.
pub trait Telemetry {
    fn update(&mut self, position_rot: f64);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Visualisation of the mechanism as a single arm rotating with the master.
pub struct MechanismTm {
    latest: Option<MechanismRecord>,
    arch: Archiver,
}

/// One archived sample of the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MechanismRecord {
    pub time_s: f64,
    pub position_rot: f64,

    /// Angle the visualised arm is drawn at
    pub angle_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MechanismTm {
    /// Create the telemetry, archiving into the session.
    pub fn new(session: &Session) -> Result<Self, ArchiveError> {
        Ok(Self {
            latest: None,
            arch: Archiver::from_path(session, MECHANISM_ARCH_PATH)?,
        })
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<MechanismRecord> {
        self.latest
    }
}

impl MechanismRecord {
    pub fn new(time_s: f64, position_rot: f64) -> Self {
        Self {
            time_s,
            position_rot,
            angle_deg: position_rot * 360.0,
        }
    }
}

impl Telemetry for MechanismTm {
    fn update(&mut self, position_rot: f64) {
        let record = MechanismRecord::new(session::get_elapsed_seconds(), position_rot);

        trace!("Mechanism at {:.3} rot ({:.1} deg)", record.position_rot, record.angle_deg);

        self.latest = Some(record);

        if let Err(e) = self.write() {
            warn!("Could not archive mechanism telemetry: {}", e);
        }
    }
}

impl Archived for MechanismTm {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.latest {
            Some(r) => self.arch.serialise(r),
            None => Ok(()),
        }
    }
}

/// Collects every update, used where no visualisation is available.
impl Telemetry for Vec<f64> {
    fn update(&mut self, position_rot: f64) {
        self.push(position_rot);
    }
}
