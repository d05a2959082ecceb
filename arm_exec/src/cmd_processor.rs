//! # Command processor
//!
//! Executes [`ArmCmd`]s against the arm, regardless of whether they came from
//! the shell or a script.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use arm_if::ArmCmd;
use log::{debug, info};

use crate::arm_ctrl::{Arm, ArmError, ArmStatus};
use crate::driver::ArmDriver;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Result of executing a command.
#[derive(Debug, Clone)]
pub enum CmdOutcome {
    /// The command was executed
    Done,

    /// The command asked for the state of the arm
    Status(ArmStatus),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Execute a single command.
///
/// Timed moves, flashes and rewinds block until they are complete.
pub fn execute<D: ArmDriver>(arm: &mut Arm<D>, cmd: &ArmCmd) -> Result<CmdOutcome, ArmError> {
    debug!("Executing {:?}", cmd);

    match cmd {
        ArmCmd::Move {
            motor,
            direction,
            duration_s,
        } => {
            let time_to_move = duration_s.map(to_duration).transpose()?;
            arm.move_motor(*motor, *direction, time_to_move)?;
        }
        ArmCmd::Stop => arm.reset()?,
        ArmCmd::Light { state } => arm.set_light(*state)?,
        ArmCmd::ToggleLight => arm.toggle_light()?,
        ArmCmd::Flash {
            iterations,
            interval_s,
        } => arm.flash_light(*iterations, to_duration(*interval_s)?)?,
        ArmCmd::Rewind => arm.return_to_start()?,
        ArmCmd::ClearHistory => {
            arm.clear_history();
            info!("History cleared, current position is the new start position");
        }
        ArmCmd::Status => return Ok(CmdOutcome::Status(arm.status())),
    }

    Ok(CmdOutcome::Done)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn to_duration(seconds: f64) -> Result<std::time::Duration, ArmError> {
    util::time::seconds_to_duration(seconds).ok_or(ArmError::InvalidDuration(seconds))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::driver::DisconnectedDriver;
    use crate::params::{ArmParams, GamepadParams};
    use arm_if::{Direction, LightState, MotorId};

    fn arm() -> Arm<DisconnectedDriver> {
        Arm::new(
            DisconnectedDriver,
            &ArmParams::default(),
            &GamepadParams::default(),
        )
        .unwrap()
        .with_manual_clock()
    }

    #[test]
    fn test_execute_commands() {
        let mut arm = arm();

        execute(
            &mut arm,
            &ArmCmd::Move {
                motor: MotorId::Elbow,
                direction: Direction::Positive,
                duration_s: None,
            },
        )
        .unwrap();
        assert_eq!(arm.directions()[MotorId::Elbow], Direction::Positive);

        execute(&mut arm, &ArmCmd::ToggleLight).unwrap();
        assert_eq!(arm.light(), LightState::On);

        execute(&mut arm, &ArmCmd::Stop).unwrap();
        assert!(!arm.directions().any_moving());
        assert_eq!(arm.light(), LightState::Off);
    }

    #[test]
    fn test_status_command() {
        let mut arm = arm();

        match execute(&mut arm, &ArmCmd::Status).unwrap() {
            CmdOutcome::Status(s) => {
                assert!(!s.connected);
                assert_eq!(s.light, LightState::Off);
            }
            o => panic!("Expected a status, got {:?}", o),
        }
    }

    #[test]
    fn test_invalid_duration() {
        let mut arm = arm();

        let res = execute(
            &mut arm,
            &ArmCmd::Move {
                motor: MotorId::Base,
                direction: Direction::Positive,
                duration_s: Some(-1.0),
            },
        );
        assert!(matches!(res, Err(ArmError::InvalidDuration(_))));

        let res = execute(
            &mut arm,
            &ArmCmd::Flash {
                iterations: 1,
                interval_s: 1e300,
            },
        );
        assert!(matches!(res, Err(ArmError::InvalidDuration(_))));
    }

    #[test]
    fn test_huge_poll_period_rejected() {
        let params = ArmParams {
            rewind_poll_period_s: 1e300,
        };
        let res = Arm::new(DisconnectedDriver, &params, &GamepadParams::default());
        assert!(matches!(res, Err(ArmError::InvalidDuration(_))));
    }

    #[test]
    fn test_rewind_and_clear() {
        let mut arm = arm();

        execute(
            &mut arm,
            &ArmCmd::Move {
                motor: MotorId::Grip,
                direction: Direction::Negative,
                duration_s: Some(0.01),
            },
        )
        .unwrap();
        assert!(arm.has_history());

        execute(&mut arm, &ArmCmd::ClearHistory).unwrap();
        assert!(!arm.has_history());

        execute(
            &mut arm,
            &ArmCmd::Move {
                motor: MotorId::Grip,
                direction: Direction::Positive,
                duration_s: Some(0.01),
            },
        )
        .unwrap();
        execute(&mut arm, &ArmCmd::Rewind).unwrap();
        assert!(!arm.has_history());
    }
}
