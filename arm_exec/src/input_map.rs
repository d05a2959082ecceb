//! # Gamepad input mapping
//!
//! Converts a snapshot of gamepad state into arm demands. Reading the gamepad
//! itself is left to whatever owns the window or event loop, which fills in a
//! [`GamepadState`] each frame.
//!
//! | Control        | Motor    | `> threshold` | `< -threshold` |
//! |----------------|----------|---------------|----------------|
//! | Right stick x  | Base     | A             | B              |
//! | Right stick y  | Shoulder | A             | B              |
//! | Left stick x   | Elbow    | B             | A              |
//! | Left stick y   | Wrist    | A             | B              |
//! | Right trigger  | Grip     | A             |                |
//! | Left trigger   | Grip     | B             |                |
//!
//! Stick axes are snapped to zero inside `stick_snap` before the threshold is
//! applied. The right bumper toggles the light each time it is pressed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use arm_if::{Direction, MotorDirections, MotorId};
use serde::{Deserialize, Serialize};

use crate::params::GamepadParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Position of an analogue stick, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stick {
    pub x: f64,
    pub y: f64,
}

/// A snapshot of the gamepad controls used by the arm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    pub left_stick: Stick,
    pub right_stick: Stick,

    /// Trigger values in `[0, 1]`
    pub left_trigger: f64,
    pub right_trigger: f64,

    pub right_bumper: bool,
}

/// The demands produced from one gamepad snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmDemands {
    pub directions: MotorDirections,

    /// True if the light should be toggled
    pub toggle_light: bool,
}

/// Maps gamepad state to arm demands.
///
/// The mapper remembers the bumper state so that holding the bumper only
/// toggles the light once.
#[derive(Debug, Clone)]
pub struct InputMapper {
    threshold: f64,

    stick_snap: f64,

    bumper_was_pressed: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputMapper {
    pub fn new(params: &GamepadParams) -> Self {
        Self {
            threshold: params.threshold,
            stick_snap: params.stick_snap,
            bumper_was_pressed: false,
        }
    }

    /// Map the given gamepad state into demands.
    pub fn map(&mut self, state: &GamepadState) -> ArmDemands {
        let (t, snap) = (self.threshold, self.stick_snap);
        let axis = |value: f64| axis_direction(stick_center_snap(value, snap), t);
        let mut directions = MotorDirections::stopped();

        directions[MotorId::Base] = axis(state.right_stick.x);
        directions[MotorId::Shoulder] = axis(state.right_stick.y);
        directions[MotorId::Elbow] = axis(state.left_stick.x).reversed();
        directions[MotorId::Wrist] = axis(state.left_stick.y);

        directions[MotorId::Grip] = if state.right_trigger > t {
            Direction::Positive
        } else if state.left_trigger > t {
            Direction::Negative
        } else {
            Direction::Stop
        };

        let toggle_light = state.right_bumper && !self.bumper_was_pressed;
        self.bumper_was_pressed = state.right_bumper;

        ArmDemands {
            directions,
            toggle_light,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Snap small stick values to zero to compensate for calibration and loose
/// sticks.
pub fn stick_center_snap(value: f64, snap: f64) -> f64 {
    if value >= snap || value <= -snap {
        value
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn axis_direction(value: f64, threshold: f64) -> Direction {
    if value > threshold {
        Direction::Positive
    } else if value < -threshold {
        Direction::Negative
    } else {
        Direction::Stop
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn mapper() -> InputMapper {
        InputMapper::new(&GamepadParams::default())
    }

    #[test]
    fn test_stick_center_snap() {
        assert_eq!(stick_center_snap(0.1, 0.2), 0.0);
        assert_eq!(stick_center_snap(-0.19, 0.2), 0.0);
        assert_eq!(stick_center_snap(0.2, 0.2), 0.2);
        assert_eq!(stick_center_snap(-0.7, 0.2), -0.7);
    }

    #[test]
    fn test_centered_pad_stops_everything() {
        let demands = mapper().map(&GamepadState::default());
        assert_eq!(demands.directions, MotorDirections::stopped());
        assert!(!demands.toggle_light);
    }

    #[test]
    fn test_stick_mapping() {
        let state = GamepadState {
            left_stick: Stick { x: 0.5, y: -0.5 },
            right_stick: Stick { x: -0.9, y: 0.3 },
            ..Default::default()
        };

        let d = mapper().map(&state).directions;
        assert_eq!(d[MotorId::Base], Direction::Negative);
        assert_eq!(d[MotorId::Shoulder], Direction::Positive);
        assert_eq!(d[MotorId::Elbow], Direction::Negative);
        assert_eq!(d[MotorId::Wrist], Direction::Negative);
        assert_eq!(d[MotorId::Grip], Direction::Stop);
    }

    #[test]
    fn test_sticks_snap_before_threshold() {
        let mut m = InputMapper::new(&GamepadParams {
            threshold: 0.1,
            stick_snap: 0.5,
        });

        // Past the threshold but inside the snap, so ignored
        let state = GamepadState {
            right_stick: Stick { x: 0.3, y: -0.4 },
            ..Default::default()
        };
        assert_eq!(m.map(&state).directions, MotorDirections::stopped());

        // Triggers are not snapped
        let state = GamepadState {
            right_stick: Stick { x: 0.6, y: 0.0 },
            right_trigger: 0.3,
            ..Default::default()
        };
        let d = m.map(&state).directions;
        assert_eq!(d[MotorId::Base], Direction::Positive);
        assert_eq!(d[MotorId::Grip], Direction::Positive);
    }

    #[test]
    fn test_right_trigger_wins_grip() {
        let state = GamepadState {
            left_trigger: 1.0,
            right_trigger: 1.0,
            ..Default::default()
        };
        assert_eq!(
            mapper().map(&state).directions[MotorId::Grip],
            Direction::Positive
        );

        let state = GamepadState {
            left_trigger: 0.8,
            ..Default::default()
        };
        assert_eq!(
            mapper().map(&state).directions[MotorId::Grip],
            Direction::Negative
        );
    }

    #[test]
    fn test_bumper_toggles_on_press_only() {
        let mut m = mapper();
        let pressed = GamepadState {
            right_bumper: true,
            ..Default::default()
        };
        let released = GamepadState::default();

        assert!(m.map(&pressed).toggle_light);
        assert!(!m.map(&pressed).toggle_light);
        assert!(!m.map(&released).toggle_light);
        assert!(m.map(&pressed).toggle_light);
    }
}
