//! Main control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Startup (once):
//!         - Load parameters
//!         - Configure the master and follower motors, bind the follower
//!         - Zero the master position
//!     - Main loop (every cycle):
//!         - Driver station input acquisition
//!         - Telemetry of the measured position
//!         - Mode selection
//!         - Control request to the master motor
//!
//! # Usage
//!
//! `ctrl_exec [script]` - with a script the driver station frames are played
//! back from it and the executable stops at the end of the script. Without
//! one the robot stays disabled.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};
use std::env;
use std::thread;
use std::time::Instant;
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use ctrl_lib::{
    data_store::{DataStore, MAX_CONSEC_CYCLE_OVERRUNS},
    mode_sel::ModeSel,
    motor_pair::MotorPair,
    params::CtrlExecParams,
    robot::Robot,
    tm::MechanismTm,
};
#[cfg(feature = "sim")]
use ctrl_lib::sim_motor::SimMotor;
use util::{
    host,
    module::State,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingFrames},
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "ctrl_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Position Control Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: CtrlExecParams = util::params::load(
        "ctrl_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let cycle_period = params.cycle_period().wrap_err("Invalid exec params")?;
    let retry_policy = params.retry_policy().wrap_err("Invalid exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DS SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let mut script = match args.len() {
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1])
                .wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} frames\n",
                si.get_duration(),
                si.get_num_frames()
            );

            Some(si)
        },
        1 => {
            info!("No script provided, the robot will remain disabled\n");
            None
        },
        _ => return Err(eyre!(
            "Expected either zero or one argument, found {}", args.len() - 1
        ))
    };

    // ---- INITIALISE MOTORS ----

    info!("Initialising motors...");

    #[cfg(feature = "sim")]
    let (master, follower) = (
        SimMotor::new(params.pair.master_id),
        SimMotor::new(params.pair.follower_id)
    );
    #[cfg(not(feature = "sim"))]
    compile_error!("No motor controller backend is available, enable the `sim` feature");

    // Configuration failures are reported inside init and are not fatal
    let (pair, init_rpt) = MotorPair::init(
        master,
        follower,
        &params.pair,
        &params.master_config,
        &retry_policy
    );
    debug!("Motor pair init report: {:?}", init_rpt);

    info!("Motor initialisation complete\n");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut mode_sel = ModeSel::default();
    mode_sel.init("mode_sel.toml", &session)
        .wrap_err("Failed to initialise ModeSel")?;
    info!("ModeSel init complete");

    let tm = MechanismTm::new(&session)
        .wrap_err("Failed to initialise mechanism telemetry")?;
    info!("Telemetry init complete");

    info!("Module initialisation complete\n");

    let mut robot = Robot::new(pair, mode_sel, tm);
    let mut ds = DataStore::default();

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        ds.cycle_start(params.cycle_frequency_hz());

        // ---- DRIVER STATION INPUT ----

        if let Some(ref mut si) = script {
            match si.get_pending_frames() {
                PendingFrames::None => (),
                // Only the newest frame matters
                PendingFrames::Some(frames) => {
                    if let Some(f) = frames.into_iter().last() {
                        ds.ds_frame = f;
                    }
                },
                PendingFrames::EndOfScript => {
                    info!("End of DS script reached, stopping");
                    break
                }
            }
        }

        // ---- CONTROL ----

        ds.tick_rpt = Some(robot.tick(ds.ds_frame.mode, &ds.ds_frame));

        if ds.is_1_hz_cycle {
            if let Some(ref rpt) = ds.tick_rpt {
                debug!(
                    "{:?}: position {:.3} rot, request {:?}",
                    rpt.mode,
                    rpt.position_rot,
                    rpt.request
                );
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.cycle_on_time();
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );

                if ds.cycle_overrun() {
                    error!(
                        "More than {} consecutive cycle overruns, the loop cannot keep up \
                        with a {:.03} s period",
                        MAX_CONSEC_CYCLE_OVERRUNS,
                        cycle_period.as_secs_f64()
                    );
                }
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    info!("End of execution after {} cycles", ds.num_cycles);

    Ok(())
}
