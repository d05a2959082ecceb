//! # Arm command frame
//!
//! The arm is driven by a single 3 byte payload sent in a vendor control transfer:
//!
//! | Byte | Content                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | `shoulder << 6 \| elbow << 4 \| wrist << 2 \| grip`         |
//! | 1    | base direction                                              |
//! | 2    | light, 0 or 1                                               |
//!
//! Each direction occupies 2 bits and takes the values of [`Direction`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::ops::{Index, IndexMut};
use thiserror::Error;

use crate::motor::{Direction, LightState, MotorError, MotorId, NUM_MOTORS};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Length of a command frame in bytes.
pub const FRAME_LEN: usize = 3;

const SHOULDER_SHIFT: u8 = 6;
const ELBOW_SHIFT: u8 = 4;
const WRIST_SHIFT: u8 = 2;
const GRIP_SHIFT: u8 = 0;

const DIRECTION_MASK: u8 = 0b11;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The direction of every motor on the arm.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorDirections([Direction; NUM_MOTORS]);

/// A packed command frame, ready to send to the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame([u8; FRAME_LEN]);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur building or decoding a frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error(transparent)]
    InvalidValue(#[from] MotorError),

    #[error("Expected a frame of 3 bytes, found {0}")]
    InvalidLength(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotorDirections {
    /// All motors stopped.
    pub fn stopped() -> Self {
        Self::default()
    }

    /// Iterate over each motor and its direction.
    pub fn iter(&self) -> impl Iterator<Item = (MotorId, Direction)> + '_ {
        MotorId::ALL.iter().map(move |id| (*id, self[*id]))
    }

    pub fn any_moving(&self) -> bool {
        self.0.iter().any(|d| d.is_moving())
    }
}

impl Index<MotorId> for MotorDirections {
    type Output = Direction;

    fn index(&self, id: MotorId) -> &Direction {
        &self.0[id.index()]
    }
}

impl IndexMut<MotorId> for MotorDirections {
    fn index_mut(&mut self, id: MotorId) -> &mut Direction {
        &mut self.0[id.index()]
    }
}

impl CommandFrame {
    /// Pack the given directions and light state into a frame.
    pub fn new(dirs: &MotorDirections, light: LightState) -> Self {
        let arm = (dirs[MotorId::Shoulder].as_u8() << SHOULDER_SHIFT)
            | (dirs[MotorId::Elbow].as_u8() << ELBOW_SHIFT)
            | (dirs[MotorId::Wrist].as_u8() << WRIST_SHIFT)
            | (dirs[MotorId::Grip].as_u8() << GRIP_SHIFT);

        Self([arm, dirs[MotorId::Base].as_u8(), light.as_u8()])
    }

    /// Build a frame from raw values.
    ///
    /// `dirs` is in base, shoulder, elbow, wrist, grip order. Each value is validated against the
    /// motor it belongs to.
    pub fn from_raw(dirs: [u8; NUM_MOTORS], light: u8) -> Result<Self, FrameError> {
        let mut directions = MotorDirections::stopped();

        for (id, raw) in MotorId::ALL.iter().zip(dirs.iter()) {
            directions[*id] = id.check_direction(*raw)?;
        }

        Ok(Self::new(&directions, LightState::try_from(light)?))
    }

    /// The frame which stops all motors and turns the light off.
    pub fn stop() -> Self {
        Self([0; FRAME_LEN])
    }

    /// The payload to send to the device.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unpack a frame back into directions and light state.
    pub fn decode(bytes: &[u8]) -> Result<(MotorDirections, LightState), FrameError> {
        if bytes.len() != FRAME_LEN {
            return Err(FrameError::InvalidLength(bytes.len()));
        }

        let field = |shift: u8| (bytes[0] >> shift) & DIRECTION_MASK;

        let mut dirs = MotorDirections::stopped();
        dirs[MotorId::Shoulder] = MotorId::Shoulder.check_direction(field(SHOULDER_SHIFT))?;
        dirs[MotorId::Elbow] = MotorId::Elbow.check_direction(field(ELBOW_SHIFT))?;
        dirs[MotorId::Wrist] = MotorId::Wrist.check_direction(field(WRIST_SHIFT))?;
        dirs[MotorId::Grip] = MotorId::Grip.check_direction(field(GRIP_SHIFT))?;
        dirs[MotorId::Base] = MotorId::Base.check_direction(bytes[1])?;

        Ok((dirs, LightState::try_from(bytes[2])?))
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#04x}, {:#04x}, {:#04x}]", self.0[0], self.0[1], self.0[2])
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
