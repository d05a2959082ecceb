//! # Interactive shell
//!
//! Reads arm commands from the terminal and executes them immediately. Type
//! `help` for the list of commands and `quit` to leave.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use arm_if::{ArmCmd, CmdParseError, Direction};
use colored::Colorize;
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use structopt::StructOpt;

use crate::arm_ctrl::{Arm, ArmStatus};
use crate::cmd_processor::{self, CmdOutcome};
use crate::driver::ArmDriver;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "Arm $ ";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A parsed line of shell input.
#[derive(Debug, PartialEq)]
pub enum ShellLine {
    Empty,
    Quit,
    Cmd(ArmCmd),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Terminal error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("{0}")]
    Parse(structopt::clap::Error),

    #[error(transparent)]
    InvalidCmd(#[from] CmdParseError),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run the shell until the user quits.
///
/// History is loaded from and saved to `history_path`.
pub fn run<D: ArmDriver>(arm: &mut Arm<D>, history_path: &Path) -> Result<(), ShellError> {
    let mut rl = DefaultEditor::new()?;

    if rl.load_history(history_path).is_err() {
        info!("No shell history found at {:?}", history_path);
    }

    println!("Enter arm commands, `help` for a list or `quit` to exit");

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        rl.add_history_entry(line.as_str())?;

        match parse_line(&line) {
            Ok(ShellLine::Empty) => (),
            Ok(ShellLine::Quit) => break,
            Ok(ShellLine::Cmd(cmd)) => match cmd_processor::execute(arm, &cmd) {
                Ok(CmdOutcome::Status(s)) => println!("{}", render_status(&s)),
                Ok(CmdOutcome::Done) => (),
                Err(e) => warn!("Could not execute {:?}: {}", cmd, e),
            },
            // Includes the help text
            Err(e) => println!("{}", e),
        }
    }

    if let Some(parent) = history_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("Could not create the history directory: {}", e);
        }
    }
    if let Err(e) = rl.save_history(history_path) {
        warn!("Could not save shell history: {}", e);
    }

    Ok(())
}

/// Parse a single line of input.
pub fn parse_line(line: &str) -> Result<ShellLine, ShellError> {
    let line = line.trim();

    match line {
        "" => return Ok(ShellLine::Empty),
        "quit" | "exit" => return Ok(ShellLine::Quit),
        _ => (),
    }

    let cmd = ArmCmd::from_iter_safe(std::iter::once("arm").chain(line.split_whitespace()))
        .map_err(ShellError::Parse)?;
    cmd.validate()?;

    Ok(ShellLine::Cmd(cmd))
}

/// Render the arm status, one line per motor.
///
/// Each motor is shown as `< Name >`, the arrow for the direction it is
/// moving in is highlighted.
pub fn render_status(status: &ArmStatus) -> String {
    let mut out = String::new();

    for m in status.motors.iter() {
        let (left, right) = match m.direction {
            Direction::Stop => ("<".normal(), ">".normal()),
            Direction::Positive => ("<".green().bold(), ">".normal()),
            Direction::Negative => ("<".normal(), ">".green().bold()),
        };

        out.push_str(&format!(
            "{} {:<8} {}  {:>7.2} s, {} in history\n",
            left,
            m.motor.name(),
            right,
            m.time_since_last_change_s,
            m.history_len
        ));
    }

    out.push_str(&format!(
        "Light: {:?}, {}",
        status.light,
        if status.connected {
            "connected"
        } else {
            "disconnected"
        }
    ));

    out
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
