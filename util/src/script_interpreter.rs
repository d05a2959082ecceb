//! # Arm script interpreter module
//!
//! This module provides an interpreter for arm command scripts, allowing
//! commands to be executed at set times.
//!
//! Each command in a script takes the form `<time_s>: <json command>;`, for
//! example:
//!
//! ```text
//! 0.0: {"move": {"motor": "base", "direction": "positive", "duration_s": 1.0}};
//! 2.5: "rewind";
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use arm_if::{ArmCmd, CmdParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Matches `<time>: <payload>;`, the payload may not contain a `;`.
const COMMAND_PATTERN: &str = r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
pub struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The command to run
    cmd: ArmCmd
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_cmds` to
/// acquire a list of commands that need executing.
pub struct ScriptInterpreter {
    script_path: PathBuf,
    cmds: VecDeque<Command>
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

    #[error("Script contains an invalid command at {0} s: {1}")]
    InvalidCmd(f64, CmdParseError),

    #[error("Could not build the script pattern: {0}")]
    Pattern(regex::Error)
}

#[derive(Debug, PartialEq)]
pub enum PendingCmds {
    None,
    Some(Vec<ArmCmd>),
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

        let cmds = Self::parse(&script)?;

        Ok(ScriptInterpreter {
            script_path: path,
            cmds
        })
    }

    /// Parse the contents of a script.
    fn parse(script: &str) -> Result<VecDeque<Command>, ScriptError> {

        // Empty queue of commands
        let mut cmd_queue: VecDeque<Command> = VecDeque::new();

        let re = RegexBuilder::new(COMMAND_PATTERN)
            .multi_line(true)
            .build()
            .map_err(ScriptError::Pattern)?;

        for cap in re.captures_iter(script) {
            let time_str = cap.get(1).map_or("", |m| m.as_str());
            let payload = cap.get(3).map_or("", |m| m.as_str());

            // Parse the exec time
            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            // Parse the command from the payload. The scripts contain JSON only.
            let cmd = ArmCmd::from_json(payload)
                .map_err(|e| ScriptError::InvalidCmd(exec_time_s, e))?;

            cmd_queue.push_back(Command {
                exec_time_s,
                cmd
            });
        }

        if cmd_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Scripts may be written out of order, execution must not be
        cmd_queue
            .make_contiguous()
            .sort_by(|a, b| a.exec_time_s.total_cmp(&b.exec_time_s));

        Ok(cmd_queue)
    }

    /// Return a vector of pending commands using the session clock.
    pub fn get_pending_cmds(&mut self) -> PendingCmds {
        self.get_pending_cmds_at(get_elapsed_seconds())
    }

    /// Return a vector of commands whose execution time is before `current_time_s`.
    pub fn get_pending_cmds_at(&mut self, current_time_s: f64) -> PendingCmds {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingCmds::EndOfScript
        }

        let mut cmd_vec: Vec<ArmCmd> = vec![];

        // Pop items from the front of the queue until the exec times are
        // larger than the current time.
        while let Some(c) = self.cmds.front() {
            if c.exec_time_s > current_time_s {
                break;
            }
            if let Some(c) = self.cmds.pop_front() {
                cmd_vec.push(c.cmd);
            }
        }

        if cmd_vec.is_empty() {
            PendingCmds::None
        }
        else {
            PendingCmds::Some(cmd_vec)
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }

    /// Path the script was loaded from
    pub fn get_path(&self) -> &Path {
        &self.script_path
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use arm_if::{Direction, MotorId};

    const SCRIPT: &str = r#"
        // Wave then come home
        0.0: {"move": {"motor": "base", "direction": "positive", "duration_s": 1.0}};
        1.5: "toggle_light";
        1.5: {"move": {"motor": "elbow", "direction": "stop"}};
        4: "rewind";
    "#;

    fn write_script(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.arm");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_script() {
        let (_dir, path) = write_script(SCRIPT);
        let si = ScriptInterpreter::new(&path).unwrap();

        assert_eq!(si.get_num_cmds(), 4);
        assert_eq!(si.get_duration(), 4.0);
        assert_eq!(si.get_path(), path.as_path());
    }

    #[test]
    fn test_pending_cmds() {
        let (_dir, path) = write_script(SCRIPT);
        let mut si = ScriptInterpreter::new(&path).unwrap();

        assert_eq!(
            si.get_pending_cmds_at(0.5),
            PendingCmds::Some(vec![ArmCmd::Move {
                motor: MotorId::Base,
                direction: Direction::Positive,
                duration_s: Some(1.0)
            }])
        );
        assert_eq!(si.get_pending_cmds_at(1.0), PendingCmds::None);

        match si.get_pending_cmds_at(2.0) {
            PendingCmds::Some(cmds) => {
                assert_eq!(cmds.len(), 2);
                assert_eq!(cmds[0], ArmCmd::ToggleLight);
            }
            p => panic!("Expected two commands, got {:?}", p),
        }

        assert_eq!(
            si.get_pending_cmds_at(10.0),
            PendingCmds::Some(vec![ArmCmd::Rewind])
        );
        assert_eq!(si.get_pending_cmds_at(11.0), PendingCmds::EndOfScript);
    }

    #[test]
    fn test_out_of_order_script() {
        let (_dir, path) = write_script("2.0: \"stop\";\n1.0: \"rewind\";\n");
        let mut si = ScriptInterpreter::new(&path).unwrap();

        assert_eq!(
            si.get_pending_cmds_at(1.0),
            PendingCmds::Some(vec![ArmCmd::Rewind])
        );
    }

    #[test]
    fn test_script_errors() {
        assert!(matches!(
            ScriptInterpreter::new("/definitely/not/a/script.arm"),
            Err(ScriptError::ScriptNotFound(_))
        ));

        let (_dir, path) = write_script("nothing to see here");
        assert!(matches!(
            ScriptInterpreter::new(&path),
            Err(ScriptError::ScriptEmpty)
        ));

        let (_dir, path) = write_script("1.0: {\"move\": {\"motor\": \"knee\"}};");
        assert!(matches!(
            ScriptInterpreter::new(&path),
            Err(ScriptError::InvalidCmd(t, _)) if t == 1.0
        ));
    }
}
