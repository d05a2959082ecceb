//! Implementations for the Arm state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;
use std::convert::TryFrom;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use super::{ArmError, Motor};
use crate::driver::ArmDriver;
use crate::input_map::{GamepadState, InputMapper};
use crate::params::{ArmParams, GamepadParams};
use arm_if::{CommandFrame, Direction, LightState, MotorDirections, MotorId};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The robotic arm: five motors, a light and the driver used to reach them.
///
/// Every change is sent to the arm immediately. Dropping the arm stops all
/// motors and turns the light off.
pub struct Arm<D: ArmDriver> {
    driver: D,

    motors: [Motor; 5],

    light: LightState,

    clock: Clock,

    rewind_poll_period: Duration,

    mapper: InputMapper,
}

/// Snapshot of the arm's state.
#[derive(Debug, Clone, Serialize)]
pub struct ArmStatus {
    pub connected: bool,
    pub light: LightState,
    pub motors: Vec<MotorStatus>,
}

/// Snapshot of a single motor.
#[derive(Debug, Clone, Serialize)]
pub struct MotorStatus {
    pub motor: MotorId,
    pub direction: Direction,
    pub time_since_last_change_s: f64,
    pub history_len: usize,
}

/// Source of the time used to measure how long each motor has been moving.
enum Clock {
    /// Real time, measured at each change
    Wall { last_tick: Instant },

    /// Time only advances through [`Arm::update_time`] and timed moves
    Manual,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<D: ArmDriver> Arm<D> {
    /// Create a new arm and bring it to a stop.
    pub fn new(
        driver: D,
        arm_params: &ArmParams,
        gamepad_params: &GamepadParams,
    ) -> Result<Self, ArmError> {
        let rewind_poll_period = util::time::seconds_to_duration(arm_params.rewind_poll_period_s)
            .ok_or(ArmError::InvalidDuration(arm_params.rewind_poll_period_s))?;

        let mut arm = Self {
            driver,
            motors: [
                Motor::new(MotorId::Base),
                Motor::new(MotorId::Shoulder),
                Motor::new(MotorId::Elbow),
                Motor::new(MotorId::Wrist),
                Motor::new(MotorId::Grip),
            ],
            light: LightState::Off,
            clock: Clock::Wall {
                last_tick: Instant::now(),
            },
            rewind_poll_period,
            mapper: InputMapper::new(gamepad_params),
        };

        arm.reset()?;

        // Wherever the arm is now is the start position
        arm.clear_history();

        if arm.driver.is_connected() {
            info!("Arm now ready");
        }

        Ok(arm)
    }

    /// Stop measuring real time, from now on time only advances through
    /// [`Arm::update_time`] and timed moves.
    pub fn with_manual_clock(mut self) -> Self {
        self.clock = Clock::Manual;
        self
    }

    // ---- ACCESSORS ----

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn motor(&self, id: MotorId) -> &Motor {
        &self.motors[id.index()]
    }

    pub fn light(&self) -> LightState {
        self.light
    }

    /// Current direction of every motor.
    pub fn directions(&self) -> MotorDirections {
        let mut dirs = MotorDirections::stopped();
        for m in self.motors.iter() {
            dirs[m.id()] = m.direction();
        }
        dirs
    }

    /// Returns true if any motor has history to rewind.
    pub fn has_history(&self) -> bool {
        self.motors.iter().any(|m| !m.history().is_empty())
    }

    pub fn status(&self) -> ArmStatus {
        ArmStatus {
            connected: self.driver.is_connected(),
            light: self.light,
            motors: self
                .motors
                .iter()
                .map(|m| MotorStatus {
                    motor: m.id(),
                    direction: m.direction(),
                    time_since_last_change_s: m.time_since_last_change().as_secs_f64(),
                    history_len: m.history().len(),
                })
                .collect(),
        }
    }

    // ---- TIME ----

    /// Advance the timers of all motors.
    pub fn update_time(&mut self, time_since_last_update: Duration) {
        for m in self.motors.iter_mut() {
            m.update_time(time_since_last_update);
        }
    }

    /// Bring the motor timers up to date.
    ///
    /// `manual_dt` is only used by the manual clock.
    fn tick(&mut self, manual_dt: Duration) {
        let dt = match &mut self.clock {
            Clock::Wall { last_tick } => {
                let now = Instant::now();
                let dt = now.duration_since(*last_tick);
                *last_tick = now;
                dt
            }
            Clock::Manual => manual_dt,
        };

        self.update_time(dt);
    }

    fn restart_clock(&mut self) {
        if let Clock::Wall { last_tick } = &mut self.clock {
            *last_tick = Instant::now();
        }
    }

    // ---- COMMANDS ----

    /// Build a command frame from the current state.
    pub fn build_command(&self) -> CommandFrame {
        CommandFrame::new(&self.directions(), self.light)
    }

    /// Send the current state to the arm.
    pub fn update(&mut self) -> Result<(), ArmError> {
        let frame = self.build_command();
        self.driver.send(&frame)?;
        Ok(())
    }

    /// Stop all motors and turn the light off.
    pub fn reset(&mut self) -> Result<(), ArmError> {
        self.tick(Duration::from_secs(0));

        for m in self.motors.iter_mut() {
            m.change_direction(Direction::Stop);
        }
        self.light = LightState::Off;

        self.update()
    }

    pub fn set_light(&mut self, light: LightState) -> Result<(), ArmError> {
        self.light = light;
        self.update()
    }

    /// Set the light from a raw value, 0 for off and 1 for on.
    pub fn set_light_raw(&mut self, light: u8) -> Result<(), ArmError> {
        self.set_light(LightState::try_from(light)?)
    }

    /// Set the light to the opposite of whatever it is currently.
    pub fn toggle_light(&mut self) -> Result<(), ArmError> {
        self.set_light(self.light.toggled())
    }

    /// Flash the light `iterations` times, with a gap of `interval` between
    /// each change.
    pub fn flash_light(&mut self, iterations: u32, interval: Duration) -> Result<(), ArmError> {
        for _ in 0..iterations {
            self.set_light(LightState::On)?;
            thread::sleep(interval);
            self.set_light(LightState::Off)?;
            thread::sleep(interval);
        }

        Ok(())
    }

    /// Change the direction of a motor.
    ///
    /// If `time_to_move` is given this blocks for that long and then stops
    /// the motor.
    pub fn move_motor(
        &mut self,
        id: MotorId,
        direction: Direction,
        time_to_move: Option<Duration>,
    ) -> Result<(), ArmError> {
        self.tick(Duration::from_secs(0));

        if self.motors[id.index()].change_direction(direction) {
            debug!("{} now moving {}", id, direction);
        }
        self.update()?;

        if let Some(t) = time_to_move {
            thread::sleep(t);
            self.tick(t);

            self.motors[id.index()].change_direction(Direction::Stop);
            self.update()?;
        }

        Ok(())
    }

    /// Move a motor from a raw direction value (0 stop, 1 or 2).
    pub fn move_motor_raw(
        &mut self,
        id: MotorId,
        direction: u8,
        time_to_move: Option<Duration>,
    ) -> Result<(), ArmError> {
        let direction = id.check_direction(direction)?;
        self.move_motor(id, direction, time_to_move)
    }

    /// Move a motor by its name.
    pub fn move_motor_by_name(&mut self, name: &str, direction: u8) -> Result<(), ArmError> {
        let id: MotorId = name.parse()?;
        self.move_motor_raw(id, direction, None)
    }

    /// Rotate the base: stop (0), clockwise (1) or counter-clockwise (2).
    pub fn move_base(&mut self, direction: u8, time_to_move: Option<Duration>) -> Result<(), ArmError> {
        self.move_motor_raw(MotorId::Base, direction, time_to_move)
    }

    /// Move the shoulder: stop (0), up (1) or down (2).
    pub fn move_shoulder(&mut self, direction: u8, time_to_move: Option<Duration>) -> Result<(), ArmError> {
        self.move_motor_raw(MotorId::Shoulder, direction, time_to_move)
    }

    /// Move the elbow: stop (0), up (1) or down (2).
    pub fn move_elbow(&mut self, direction: u8, time_to_move: Option<Duration>) -> Result<(), ArmError> {
        self.move_motor_raw(MotorId::Elbow, direction, time_to_move)
    }

    /// Move the wrist: stop (0), up (1) or down (2).
    pub fn move_wrist(&mut self, direction: u8, time_to_move: Option<Duration>) -> Result<(), ArmError> {
        self.move_motor_raw(MotorId::Wrist, direction, time_to_move)
    }

    /// Open or close the grip: stop (0), close (1) or open (2).
    pub fn move_grip(&mut self, direction: u8, time_to_move: Option<Duration>) -> Result<(), ArmError> {
        self.move_motor_raw(MotorId::Grip, direction, time_to_move)
    }

    /// Apply a gamepad snapshot to the arm.
    pub fn apply_gamepad(&mut self, state: &GamepadState) -> Result<(), ArmError> {
        let demands = self.mapper.map(state);

        self.tick(Duration::from_secs(0));

        for m in self.motors.iter_mut() {
            m.change_direction(demands.directions[m.id()]);
        }

        if demands.toggle_light {
            self.light = self.light.toggled();
        }

        self.update()
    }

    // ---- REWIND ----

    /// Forget all recorded history, the current pose becomes the start pose.
    pub fn clear_history(&mut self) {
        for m in self.motors.iter_mut() {
            m.clear_history();
        }
        self.restart_clock();
    }

    /// Stop all motors and prepare to play their history back.
    pub fn begin_rewind(&mut self) -> Result<(), ArmError> {
        self.tick(Duration::from_secs(0));

        for m in self.motors.iter_mut() {
            m.begin_rewind();
        }

        self.update()
    }

    /// Step every motor's rewind to `elapsed` since [`Arm::begin_rewind`],
    /// sending a new frame if anything changed.
    ///
    /// Returns true once every motor has finished.
    pub fn rewind_step(&mut self, elapsed: Duration) -> Result<bool, ArmError> {
        let mut changed = false;
        for m in self.motors.iter_mut() {
            changed |= m.rewind_step(elapsed);
        }

        if changed {
            self.update()?;
        }

        Ok(self.motors.iter().all(|m| m.rewind_finished(elapsed)))
    }

    /// Return the arm to its start position by playing every motor's history
    /// back in reverse. Blocks until the arm is home.
    pub fn return_to_start(&mut self) -> Result<(), ArmError> {
        info!("Starting return to start position");

        self.begin_rewind()?;

        let start = Instant::now();

        while !self.rewind_step(start.elapsed())? {
            thread::sleep(self.rewind_poll_period);
        }

        // The rewind itself is not part of the history
        self.clear_history();
        self.update()?;

        info!(
            "Finished returning to start position in {:.02} s",
            start.elapsed().as_secs_f64()
        );

        Ok(())
    }
}

impl<D: ArmDriver> Drop for Arm<D> {
    fn drop(&mut self) {
        debug!("Stopping arm");

        if let Err(e) = self.reset() {
            warn!("Could not stop the arm: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
