//! Arm control module

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod motor;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use motor::*;
pub use state::*;

use crate::driver::DriverError;
use arm_if::MotorError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during arm control.
#[derive(Debug, thiserror::Error)]
pub enum ArmError {
    #[error(transparent)]
    InvalidValue(#[from] MotorError),

    #[error("Could not send the command to the arm: {0}")]
    Driver(#[from] DriverError),

    #[error("Durations must be finite and positive, found {0}")]
    InvalidDuration(f64),
}
