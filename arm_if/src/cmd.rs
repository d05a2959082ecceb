//! # Arm commands
//!
//! Commands are shared between the interactive shell (parsed with structopt) and command scripts
//! (parsed from JSON).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::Duration;
use structopt::StructOpt;
use thiserror::Error;

use crate::motor::{Direction, LightState, MotorId};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be executed by the arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(rename_all = "snake_case")]
#[structopt(name = "arm", about = "Commands for the robotic arm")]
pub enum ArmCmd {
    /// Change the direction of a single motor.
    ///
    /// Directions are `stop` (0), `a` (1) or `b` (2). A is clockwise for the base, close for the
    /// grip and up for everything else.
    #[structopt(name = "move")]
    Move {
        /// Motor to move (base, shoulder, elbow, wrist or grip)
        motor: MotorId,

        /// Direction to move the motor in
        direction: Direction,

        /// If given the motor is stopped after this many seconds.
        #[structopt(short = "t", long = "time")]
        #[serde(default)]
        duration_s: Option<f64>,
    },

    /// Stop all motors and turn the light off.
    #[structopt(name = "stop")]
    Stop,

    /// Turn the light on or off.
    #[structopt(name = "light")]
    Light {
        /// `on` or `off`
        state: LightState,
    },

    /// Flip the light.
    #[structopt(name = "toggle-light")]
    ToggleLight,

    /// Flash the light on and off.
    #[structopt(name = "flash")]
    Flash {
        /// Number of times to flash
        iterations: u32,

        /// Seconds between each change
        interval_s: f64,
    },

    /// Return the arm to its start position by replaying its history in reverse.
    #[structopt(name = "rewind")]
    Rewind,

    /// Forget the recorded history, making the current pose the new start position.
    #[structopt(name = "clear-history")]
    ClearHistory,

    /// Show the current state of the arm.
    #[structopt(name = "status")]
    Status,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum CmdParseError {
    #[error("Command contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Durations must be finite and positive, found {0}")]
    InvalidDuration(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ArmCmd {
    /// Parse a command from a JSON string, for example
    /// `{"move": {"motor": "base", "direction": "positive", "duration_s": 1.5}}`.
    pub fn from_json(json_str: &str) -> Result<Self, CmdParseError> {
        let cmd: ArmCmd = serde_json::from_str(json_str).map_err(CmdParseError::InvalidJson)?;
        cmd.validate()?;
        Ok(cmd)
    }

    /// Check the values which the type system cannot.
    pub fn validate(&self) -> Result<(), CmdParseError> {
        match self {
            ArmCmd::Move {
                duration_s: Some(d),
                ..
            } => check_duration(*d),
            ArmCmd::Flash { interval_s, .. } => check_duration(*interval_s),
            _ => Ok(()),
        }
    }

    /// Returns true if executing this command blocks for a period of time.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ArmCmd::Move {
                duration_s: Some(_),
                ..
            } | ArmCmd::Flash { .. }
                | ArmCmd::Rewind
        )
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Durations must be positive and fit in a [`Duration`].
fn check_duration(duration_s: f64) -> Result<(), CmdParseError> {
    if duration_s > 0.0 && Duration::try_from_secs_f64(duration_s).is_ok() {
        Ok(())
    } else {
        Err(CmdParseError::InvalidDuration(duration_s))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_json() {
        let cmd = ArmCmd::from_json(
            r#"{"move": {"motor": "shoulder", "direction": "negative", "duration_s": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            ArmCmd::Move {
                motor: MotorId::Shoulder,
                direction: Direction::Negative,
                duration_s: Some(0.5)
            }
        );

        let cmd = ArmCmd::from_json(r#"{"move": {"motor": "grip", "direction": "stop"}}"#).unwrap();
        assert_eq!(
            cmd,
            ArmCmd::Move {
                motor: MotorId::Grip,
                direction: Direction::Stop,
                duration_s: None
            }
        );

        assert_eq!(ArmCmd::from_json(r#""rewind""#).unwrap(), ArmCmd::Rewind);
        assert_eq!(
            ArmCmd::from_json(r#"{"light": {"state": "on"}}"#).unwrap(),
            ArmCmd::Light {
                state: LightState::On
            }
        );
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            ArmCmd::from_json(r#"{"move": {"motor": "knee", "direction": "stop"}}"#),
            Err(CmdParseError::InvalidJson(_))
        ));
        assert!(matches!(
            ArmCmd::from_json(r#"{"flash": {"iterations": 3, "interval_s": -1.0}}"#),
            Err(CmdParseError::InvalidDuration(_))
        ));
        assert!(matches!(
            ArmCmd::from_json(
                r#"{"move": {"motor": "base", "direction": "positive", "duration_s": 1e300}}"#
            ),
            Err(CmdParseError::InvalidDuration(_))
        ));
        assert!(matches!(
            ArmCmd::from_json("not json"),
            Err(CmdParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_from_shell_args() {
        let cmd = ArmCmd::from_iter_safe(&["arm", "move", "wrist", "a", "-t", "1.5"]).unwrap();
        assert_eq!(
            cmd,
            ArmCmd::Move {
                motor: MotorId::Wrist,
                direction: Direction::Positive,
                duration_s: Some(1.5)
            }
        );

        let cmd = ArmCmd::from_iter_safe(&["arm", "toggle-light"]).unwrap();
        assert_eq!(cmd, ArmCmd::ToggleLight);

        assert!(ArmCmd::from_iter_safe(&["arm", "move", "knee", "a"]).is_err());
        assert!(ArmCmd::from_iter_safe(&["arm", "move", "base", "3"]).is_err());

        // Too long to represent, rejected rather than overflowing later
        let cmd = ArmCmd::from_iter_safe(&["arm", "flash", "1", "1e300"]).unwrap();
        assert!(matches!(
            cmd.validate(),
            Err(CmdParseError::InvalidDuration(_))
        ));
    }
}
