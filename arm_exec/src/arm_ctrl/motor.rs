//! A single motor on the arm and its move history

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use arm_if::{Direction, MotorId};
use log::trace;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One period of a motor's history.
///
/// `direction` is the reverse of the direction the motor was running in, so
/// playing the entry back undoes the move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub direction: Direction,
    pub duration: Duration,
}

/// A motor on the arm.
#[derive(Debug, Clone)]
pub struct Motor {
    id: MotorId,

    direction: Direction,

    time_since_last_change: Duration,

    history: Vec<HistoryEntry>,

    /// Time since the start of a rewind at which the next history entry is
    /// due to be played.
    next_rewind_change: Duration,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Motor {
    pub fn new(id: MotorId) -> Self {
        Self {
            id,
            direction: Direction::Stop,
            time_since_last_change: Duration::from_secs(0),
            history: Vec::new(),
            next_rewind_change: Duration::from_secs(0),
        }
    }

    pub fn id(&self) -> MotorId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn time_since_last_change(&self) -> Duration {
        self.time_since_last_change
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Advance the motor's timer.
    pub fn update_time(&mut self, time_since_last_update: Duration) {
        self.time_since_last_change += time_since_last_update;
    }

    /// Change the direction of the motor, recording the period which has just
    /// finished.
    ///
    /// Returns `false` if the motor was already moving in this direction, in
    /// which case nothing is recorded and the timer keeps running.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction {
            return false;
        }

        self.record_current();
        self.direction = direction;
        self.time_since_last_change = Duration::from_secs(0);

        true
    }

    /// Push the in-progress period onto the history without changing
    /// direction.
    pub fn record_current(&mut self) {
        if self.time_since_last_change == Duration::from_secs(0) {
            return;
        }

        let entry = HistoryEntry {
            direction: self.direction.reversed(),
            duration: self.time_since_last_change,
        };

        trace!("{} recorded {:?}", self.id, entry);

        self.history.push(entry);
        self.time_since_last_change = Duration::from_secs(0);
    }

    /// Prepare to play the history back.
    ///
    /// A move in progress is recorded, a stop in progress is not. Stop periods
    /// from before the first move are dropped, so the rewind ends as soon as
    /// the first move has been undone.
    pub fn begin_rewind(&mut self) {
        if self.direction.is_moving() {
            self.record_current();
        }
        self.direction = Direction::Stop;
        self.time_since_last_change = Duration::from_secs(0);
        self.next_rewind_change = Duration::from_secs(0);

        let leading_idle = self
            .history
            .iter()
            .take_while(|e| !e.direction.is_moving())
            .count();
        self.history.drain(..leading_idle);
    }

    /// Step the rewind to `elapsed` since [`Motor::begin_rewind`].
    ///
    /// Entries are popped last first, each one lasting for its recorded
    /// duration. Once the history is exhausted the motor is stopped. Returns
    /// `true` if the direction changed.
    pub fn rewind_step(&mut self, elapsed: Duration) -> bool {
        let previous = self.direction;

        while elapsed >= self.next_rewind_change {
            match self.history.pop() {
                Some(entry) => {
                    self.direction = entry.direction;
                    self.next_rewind_change += entry.duration;
                }
                None => {
                    self.direction = Direction::Stop;
                    break;
                }
            }
        }

        self.direction != previous
    }

    /// Returns true once all history has been played back and the motor has
    /// stopped.
    pub fn rewind_finished(&self, elapsed: Duration) -> bool {
        self.history.is_empty()
            && elapsed >= self.next_rewind_change
            && self.direction == Direction::Stop
    }

    /// Forget all history.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.time_since_last_change = Duration::from_secs(0);
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_change_direction_records_reverse() {
        let mut m = Motor::new(MotorId::Shoulder);

        assert!(m.change_direction(Direction::Positive));
        m.update_time(ms(300));
        assert!(m.change_direction(Direction::Stop));
        m.update_time(ms(100));
        assert!(m.change_direction(Direction::Negative));
        m.update_time(ms(50));

        assert_eq!(
            m.history(),
            &[
                HistoryEntry {
                    direction: Direction::Negative,
                    duration: ms(300)
                },
                HistoryEntry {
                    direction: Direction::Stop,
                    duration: ms(100)
                },
            ]
        );
        assert_eq!(m.direction(), Direction::Negative);
        assert_eq!(m.time_since_last_change(), ms(50));
    }

    #[test]
    fn test_same_direction_is_noop() {
        let mut m = Motor::new(MotorId::Base);

        m.change_direction(Direction::Positive);
        m.update_time(ms(200));
        assert!(!m.change_direction(Direction::Positive));

        assert!(m.history().is_empty());
        assert_eq!(m.time_since_last_change(), ms(200));
    }

    #[test]
    fn test_zero_length_periods_not_recorded() {
        let mut m = Motor::new(MotorId::Grip);

        m.change_direction(Direction::Positive);
        m.change_direction(Direction::Negative);

        assert!(m.history().is_empty());
    }

    #[test]
    fn test_rewind_plays_history_backwards() {
        let mut m = Motor::new(MotorId::Elbow);

        m.change_direction(Direction::Positive);
        m.update_time(ms(300));
        m.change_direction(Direction::Stop);
        m.update_time(ms(100));
        m.change_direction(Direction::Negative);
        m.update_time(ms(200));

        m.begin_rewind();
        assert_eq!(m.direction(), Direction::Stop);
        assert_eq!(m.history().len(), 3);

        // Undo the last move first: it was negative for 200 ms
        assert!(m.rewind_step(ms(0)));
        assert_eq!(m.direction(), Direction::Positive);
        assert!(!m.rewind_step(ms(150)));

        // Then the stop period
        assert!(m.rewind_step(ms(200)));
        assert_eq!(m.direction(), Direction::Stop);

        // Then the first move
        assert!(m.rewind_step(ms(300)));
        assert_eq!(m.direction(), Direction::Negative);
        assert!(!m.rewind_finished(ms(350)));

        // And finally stop
        assert!(m.rewind_step(ms(600)));
        assert_eq!(m.direction(), Direction::Stop);
        assert!(m.rewind_finished(ms(600)));
    }

    #[test]
    fn test_rewind_catches_up() {
        let mut m = Motor::new(MotorId::Wrist);

        m.change_direction(Direction::Positive);
        m.update_time(ms(10));
        m.change_direction(Direction::Negative);
        m.update_time(ms(10));
        m.begin_rewind();

        // A late poll skips straight through the elapsed entries
        assert!(!m.rewind_step(ms(500)));
        assert_eq!(m.direction(), Direction::Stop);
        assert!(m.rewind_finished(ms(500)));
    }

    #[test]
    fn test_rewind_skips_idle_periods() {
        let mut m = Motor::new(MotorId::Shoulder);

        // Idle for a long time before and after a short move
        m.update_time(ms(1000));
        m.change_direction(Direction::Positive);
        m.update_time(ms(50));
        m.change_direction(Direction::Stop);
        m.update_time(ms(2000));

        m.begin_rewind();
        assert_eq!(
            m.history(),
            &[HistoryEntry {
                direction: Direction::Negative,
                duration: ms(50)
            }]
        );

        assert!(m.rewind_step(ms(0)));
        assert_eq!(m.direction(), Direction::Negative);
        assert!(m.rewind_step(ms(50)));
        assert!(m.rewind_finished(ms(50)));
    }

    #[test]
    fn test_idle_motor_has_nothing_to_rewind() {
        let mut m = Motor::new(MotorId::Grip);

        m.update_time(ms(5000));
        m.begin_rewind();

        assert!(m.history().is_empty());
        assert!(m.rewind_finished(ms(0)));
    }

    #[test]
    fn test_rewind_without_history() {
        let mut m = Motor::new(MotorId::Base);

        m.begin_rewind();
        assert!(!m.rewind_step(ms(0)));
        assert!(m.rewind_finished(ms(0)));
    }
}
