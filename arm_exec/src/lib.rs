//! # Arm library.
//!
//! This library allows other crates in the workspace (and the integration tests) to access the
//! items defined inside the arm executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Arm control - motor state, command frames and the rewind history
pub mod arm_ctrl;

/// Command processor - executes arm commands from the shell or a script
pub mod cmd_processor;

/// Drivers - sends command frames to the arm over USB
pub mod driver;

/// Gamepad mapping - converts gamepad state into motor demands
pub mod input_map;

/// Executable parameters
pub mod params;

/// Interactive shell
pub mod shell;
