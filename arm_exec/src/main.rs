//! Main arm executable entry point.
//!
//! # Usage
//!
//! ```text
//! arm_exec [--script <path>] [--params <file>] [--no-device]
//! ```
//!
//! With a script the commands in it are executed at their scripted times and the executable exits
//! at the end of the script. Without one an interactive shell is started.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use structopt::StructOpt;

// Internal
use arm_lib::{
    arm_ctrl::Arm,
    cmd_processor::{self, CmdOutcome},
    driver::{self, ArmDriver, DisconnectedDriver},
    params::ArmExecParams,
    shell,
};
use util::{
    host,
    logger::{logger_init, parse_level},
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period between checks for pending script commands.
const SCRIPT_POLL_PERIOD: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "arm_exec", about = "OWI robotic arm controller")]
struct Opts {
    /// Run the given script instead of the interactive shell
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Parameter file, relative to the params directory
    #[structopt(short, long, default_value = "arm_exec.toml")]
    params: String,

    /// Do not try to open the arm, commands are only logged
    #[structopt(long)]
    no_device: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("arm_exec", "sessions").wrap_err("Failed to create the session")?;

    // Load parameters before the logger so the level can be read from them
    let params: ArmExecParams =
        util::params::load(&opts.params).wrap_err("Could not load arm_exec params")?;

    // Initialise logger
    let level = parse_level(&params.log_level).wrap_err("Invalid log level in parameters")?;
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("OWI Robotic Arm Executable\n");
    match host::describe() {
        Ok(d) => info!("Running on: {}", d),
        Err(e) => warn!("Could not get host information: {}", e),
    }
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE ARM ----

    let driver: Box<dyn ArmDriver> = if opts.no_device {
        info!("Device disabled, running disconnected");
        Box::new(DisconnectedDriver)
    } else {
        driver::open_driver(&params.usb)
    };

    let mut arm =
        Arm::new(driver, &params.arm, &params.gamepad).wrap_err("Failed to initialise the arm")?;

    // ---- MAIN LOOP ----

    match opts.script {
        Some(path) => {
            info!("Loading script from {:?}", path);

            let mut si = ScriptInterpreter::new(&path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            loop {
                match si.get_pending_cmds() {
                    PendingCmds::None => (),
                    PendingCmds::Some(cmds) => {
                        for cmd in cmds.iter() {
                            if cmd.is_blocking() {
                                info!("Waiting for {:?} to finish", cmd);
                            }
                            match cmd_processor::execute(&mut arm, cmd) {
                                Ok(CmdOutcome::Status(s)) => {
                                    info!("{}", shell::render_status(&s))
                                }
                                Ok(CmdOutcome::Done) => (),
                                Err(e) => warn!("Could not execute {:?}: {}", cmd, e),
                            }
                        }
                    }
                    PendingCmds::EndOfScript => {
                        info!("End of script reached, stopping");
                        break;
                    }
                }

                thread::sleep(SCRIPT_POLL_PERIOD);
            }
        }
        None => {
            let history_path = host::get_sw_root()
                .wrap_err("Could not find the software root")?
                .join(&params.history_path);

            shell::run(&mut arm, &history_path).wrap_err("Shell failed")?;
        }
    }

    // ---- SHUTDOWN ----

    info!("Shutting down");

    session.save("arm_status.json", arm.status());

    // Stops the arm
    drop(arm);

    session.exit();

    Ok(())
}
