//! # Data Store

use hw_if::ds::DsFrame;

use crate::robot::TickReport;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of consecutive cycle overruns after which the overrun is raised as
/// an error.
pub const MAX_CONSEC_CYCLE_OVERRUNS: u64 = 50;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    // Driver station
    /// Latest frame received from the driver station. Held until a newer one
    /// arrives.
    pub ds_frame: DsFrame,

    // Robot
    /// Report from the most recent cycle
    pub tick_rpt: Option<TickReport>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        let cycles_per_second = (cycle_frequency_hz.round() as u128).max(1);

        self.is_1_hz_cycle = self.num_cycles % cycles_per_second == 0;

        self.tick_rpt = None;
    }

    /// Record a cycle which finished within its period.
    pub fn cycle_on_time(&mut self) {
        self.num_consec_cycle_overruns = 0;
    }

    /// Record a cycle which overran its period.
    ///
    /// Returns `true` on the overrun which first exceeds
    /// `MAX_CONSEC_CYCLE_OVERRUNS`, so the escalation is raised once per run
    /// of overruns.
    pub fn cycle_overrun(&mut self) -> bool {
        self.num_consec_cycle_overruns += 1;

        self.num_consec_cycle_overruns == MAX_CONSEC_CYCLE_OVERRUNS + 1
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        self.num_cycles += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_1_hz_flag() {
        let mut ds = DataStore::default();
        let mut flags = vec![];

        for _ in 0..101 {
            ds.cycle_start(50.0);
            flags.push(ds.is_1_hz_cycle);
            ds.cycle_end();
        }

        assert_eq!(ds.num_cycles, 101);
        assert_eq!(
            flags.iter().enumerate().filter(|(_, f)| **f).map(|(i, _)| i).collect::<Vec<_>>(),
            vec![0, 50, 100]
        );
    }

    #[test]
    fn test_slow_cycle_always_1_hz() {
        let mut ds = DataStore::default();

        for _ in 0..3 {
            ds.cycle_start(0.5);
            assert!(ds.is_1_hz_cycle);
            ds.cycle_end();
        }
    }

    #[test]
    fn test_overrun_escalation() {
        let mut ds = DataStore::default();

        for _ in 0..MAX_CONSEC_CYCLE_OVERRUNS {
            assert!(!ds.cycle_overrun());
        }
        assert!(ds.cycle_overrun());
        assert!(!ds.cycle_overrun());
        assert_eq!(ds.num_consec_cycle_overruns, MAX_CONSEC_CYCLE_OVERRUNS + 2);

        // An on time cycle starts a new run
        ds.cycle_on_time();
        assert_eq!(ds.num_consec_cycle_overruns, 0);
        for _ in 0..MAX_CONSEC_CYCLE_OVERRUNS {
            assert!(!ds.cycle_overrun());
        }
        assert!(ds.cycle_overrun());
    }

    #[test]
    fn test_tick_rpt_cleared() {
        let mut ds = DataStore::default();
        ds.tick_rpt = Some(TickReport {
            mode: hw_if::ds::RobotMode::Disabled,
            position_rot: 0.0,
            input: None,
            request: hw_if::eqpt::motor::ControlRequest::Brake,
            mode_sel_rpt: None,
        });

        ds.cycle_start(50.0);

        assert_eq!(ds.tick_rpt, None);
    }
}
