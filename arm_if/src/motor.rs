//! # Motor identifiers and directions

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of motors on the arm.
pub const NUM_MOTORS: usize = 5;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Direction a motor is being driven in.
///
/// The discriminant is the value placed on the wire, 2 bits per motor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Stop = 0,

    /// Direction A (clockwise, up or close depending on the motor)
    Positive = 1,

    /// Direction B (counter-clockwise, down or open depending on the motor)
    Negative = 2,
}

/// IDs of the motors on the arm
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MotorId {
    Base,
    Shoulder,
    Elbow,
    Wrist,
    Grip,
}

/// State of the light in the gripper.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    Off = 0,
    On = 1,
}

/// Errors raised when validating motor, direction or light values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotorError {
    #[error("{name} can only be set to stop (0), {pos} (1) or {neg} (2), found {value}")]
    InvalidDirection {
        name: &'static str,
        pos: &'static str,
        neg: &'static str,
        value: u8,
    },

    #[error("Direction must be stop (0), A (1) or B (2), found {0}")]
    InvalidRawDirection(u8),

    #[error("Cannot parse {0:?} as a direction")]
    UnparsableDirection(String),

    #[error("Light can only be set to off (0) or on (1), found {0}")]
    InvalidLight(u8),

    #[error("Cannot parse {0:?} as a light state")]
    UnparsableLight(String),

    #[error("Do not know how to move {0}")]
    UnknownMotor(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Direction {
    /// The value of this direction on the wire.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The direction that undoes this one.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Stop => Direction::Stop,
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Direction::Stop
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Stop
    }
}

impl TryFrom<u8> for Direction {
    type Error = MotorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Stop),
            1 => Ok(Direction::Positive),
            2 => Ok(Direction::Negative),
            v => Err(MotorError::InvalidRawDirection(v)),
        }
    }
}

impl FromStr for Direction {
    type Err = MotorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "stop" => Ok(Direction::Stop),
            "1" | "a" | "pos" | "positive" => Ok(Direction::Positive),
            "2" | "b" | "neg" | "negative" => Ok(Direction::Negative),
            _ => Err(MotorError::UnparsableDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Stop => write!(f, "stop"),
            Direction::Positive => write!(f, "A"),
            Direction::Negative => write!(f, "B"),
        }
    }
}

impl MotorId {
    /// All motors on the arm.
    pub const ALL: [MotorId; NUM_MOTORS] = [
        MotorId::Base,
        MotorId::Shoulder,
        MotorId::Elbow,
        MotorId::Wrist,
        MotorId::Grip,
    ];

    /// Index of this motor in [`MotorId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MotorId::Base => "Base",
            MotorId::Shoulder => "Shoulder",
            MotorId::Elbow => "Elbow",
            MotorId::Wrist => "Wrist",
            MotorId::Grip => "Grip",
        }
    }

    /// Human readable names of the positive and negative directions of this motor.
    pub fn direction_names(self) -> (&'static str, &'static str) {
        match self {
            MotorId::Base => ("clockwise", "counter-clockwise"),
            MotorId::Grip => ("close", "open"),
            MotorId::Shoulder | MotorId::Elbow | MotorId::Wrist => ("up", "down"),
        }
    }

    /// Validate a raw direction value for this motor.
    ///
    /// The error names the motor and the meaning of each valid value.
    pub fn check_direction(self, value: u8) -> Result<Direction, MotorError> {
        Direction::try_from(value).map_err(|_| {
            let (pos, neg) = self.direction_names();
            MotorError::InvalidDirection {
                name: self.name(),
                pos,
                neg,
                value,
            }
        })
    }
}

impl FromStr for MotorId {
    type Err = MotorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" | "rotate" => Ok(MotorId::Base),
            "shoulder" => Ok(MotorId::Shoulder),
            "elbow" => Ok(MotorId::Elbow),
            "wrist" => Ok(MotorId::Wrist),
            "grip" | "gripper" => Ok(MotorId::Grip),
            _ => Err(MotorError::UnknownMotor(s.to_string())),
        }
    }
}

impl fmt::Display for MotorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl LightState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn toggled(self) -> Self {
        match self {
            LightState::Off => LightState::On,
            LightState::On => LightState::Off,
        }
    }
}

impl Default for LightState {
    fn default() -> Self {
        LightState::Off
    }
}

impl TryFrom<u8> for LightState {
    type Error = MotorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LightState::Off),
            1 => Ok(LightState::On),
            v => Err(MotorError::InvalidLight(v)),
        }
    }
}

impl FromStr for LightState {
    type Err = MotorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "off" => Ok(LightState::Off),
            "1" | "on" => Ok(LightState::On),
            _ => Err(MotorError::UnparsableLight(s.to_string())),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_direction_from_raw() {
        assert_eq!(Direction::try_from(0), Ok(Direction::Stop));
        assert_eq!(Direction::try_from(1), Ok(Direction::Positive));
        assert_eq!(Direction::try_from(2), Ok(Direction::Negative));
        assert_eq!(Direction::try_from(3), Err(MotorError::InvalidRawDirection(3)));
        assert_eq!(Direction::try_from(255), Err(MotorError::InvalidRawDirection(255)));
    }

    #[test]
    fn test_reversed() {
        assert_eq!(Direction::Stop.reversed(), Direction::Stop);
        assert_eq!(Direction::Positive.reversed(), Direction::Negative);
        assert_eq!(Direction::Negative.reversed(), Direction::Positive);
    }

    #[test]
    fn test_check_direction_names_motor() {
        let err = MotorId::Base.check_direction(3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Base can only be set to stop (0), clockwise (1) or counter-clockwise (2), found 3"
        );

        let err = MotorId::Grip.check_direction(7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Grip can only be set to stop (0), close (1) or open (2), found 7"
        );

        assert_eq!(MotorId::Wrist.check_direction(2), Ok(Direction::Negative));
    }

    #[test]
    fn test_parse_motor() {
        assert_eq!("base".parse::<MotorId>(), Ok(MotorId::Base));
        assert_eq!("Rotate".parse::<MotorId>(), Ok(MotorId::Base));
        assert_eq!("GRIPPER".parse::<MotorId>(), Ok(MotorId::Grip));
        assert_eq!(
            "knee".parse::<MotorId>(),
            Err(MotorError::UnknownMotor("knee".into()))
        );
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("stop".parse::<Direction>(), Ok(Direction::Stop));
        assert_eq!("1".parse::<Direction>(), Ok(Direction::Positive));
        assert_eq!("B".parse::<Direction>(), Ok(Direction::Negative));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_light() {
        assert_eq!(LightState::try_from(0), Ok(LightState::Off));
        assert_eq!(LightState::try_from(1), Ok(LightState::On));
        assert_eq!(LightState::try_from(2), Err(MotorError::InvalidLight(2)));
        assert_eq!(LightState::Off.toggled(), LightState::On);
        assert_eq!(LightState::On.toggled().toggled(), LightState::On);
    }
}
