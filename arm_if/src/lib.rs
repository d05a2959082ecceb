//! # Arm interface crate.
//!
//! Provides the common interface types for the arm software: motor and
//! direction identifiers, the USB command frame and the command vocabulary
//! shared by the shell, scripts and the executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Motor identifiers, directions and light state
pub mod motor;

/// The 3 byte command frame sent to the arm
pub mod frame;

/// Arm commands
pub mod cmd;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use cmd::{ArmCmd, CmdParseError};
pub use frame::{CommandFrame, FrameError, MotorDirections};
pub use motor::{Direction, LightState, MotorError, MotorId};
