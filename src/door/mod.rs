//! Door entity and toggle resolution.
//!
//! A single-button garage door opener has one control wire: every press
//! of the button emits the same ambiguous toggle pulse, and what the
//! door does next depends entirely on what it is currently doing and on
//! the last direction it was told to move.
//!
//! ```text
//!            ┌──────── pulse ────────┐
//!            ▼                       │
//!  CLOSED ──pulse──▶ OPENING ──pulse──▶ STOPPED (dir = OPEN)
//!            ▲                       │
//!            │                     pulse
//!  OPEN ───pulse──▶ CLOSING ──pulse──▶ STOPPED (dir = CLOSE)
//!            ▲                       │
//!            └──────── pulse ────────┘
//!
//!  STOPPED + dir OPEN  ──pulse──▶ CLOSING   (reverses)
//!  STOPPED + dir CLOSE ──pulse──▶ OPENING   (reverses)
//! ```
//!
//! [`Door::pulse`] is a total function over the five states — every
//! state has exactly one defined response, so there is no invalid
//! transition to report. The remembered [`Direction`] is the sole piece
//! of memory used to disambiguate a pulse while the door is stopped.
//!
//! Position is only ever written by the motion simulator in
//! [`motion`](crate::door::motion), which also performs the two
//! terminal transitions (`Closing → Closed`, `Opening → Open`).

pub mod motion;

use log::info;

// ---------------------------------------------------------------------------
// Discrete state
// ---------------------------------------------------------------------------

/// What the door is currently doing. The five variants are mutually
/// exclusive; `Stopped` means halted mid-travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DoorState {
    Closed = 0,
    Closing = 1,
    Stopped = 2,
    Opening = 3,
    Open = 4,
}

impl DoorState {
    /// Total number of states.
    pub const COUNT: usize = 5;

    /// All states, in discriminant order. Handy for exhaustive tests.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Closed,
        Self::Closing,
        Self::Stopped,
        Self::Opening,
        Self::Open,
    ];

    /// True while the drive motor is running.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

// ---------------------------------------------------------------------------
// Remembered direction
// ---------------------------------------------------------------------------

/// The last direction the door was told to move. Retained while the
/// door is stopped or parked at a limit; a pulse from `Stopped` resumes
/// in the *opposite* of this direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Close,
    Open,
}

// ---------------------------------------------------------------------------
// Door entity
// ---------------------------------------------------------------------------

/// The authoritative physical/logical door record.
///
/// One instance exists per process, owned by the control loop. State
/// and direction change only through [`Door::pulse`]; position (and the
/// terminal `Closed`/`Open` transitions) only through the motion
/// simulator. Everything else gets read-only accessors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Door {
    pub(crate) state: DoorState,
    pub(crate) direction: Direction,
    /// Normalized travel: 0.0 = fully closed, 1.0 = fully open.
    pub(crate) position: f32,
}

impl Door {
    /// A freshly booted door: fully closed, last direction CLOSE.
    pub fn new() -> Self {
        Self {
            state: DoorState::Closed,
            direction: Direction::Close,
            position: 0.0,
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Press the physical toggle button exactly once.
    ///
    /// Deterministic in `(state, direction)`; see the module-level
    /// transition diagram. Never fails — every state has a defined
    /// response.
    pub fn pulse(&mut self) {
        let (next, dir) = match (self.state, self.direction) {
            (DoorState::Open, _) => (DoorState::Closing, Direction::Close),
            (DoorState::Opening, d) => (DoorState::Stopped, d),
            (DoorState::Stopped, Direction::Open) => (DoorState::Closing, Direction::Close),
            (DoorState::Stopped, Direction::Close) => (DoorState::Opening, Direction::Open),
            (DoorState::Closed, _) => (DoorState::Opening, Direction::Open),
            (DoorState::Closing, d) => (DoorState::Stopped, d),
        };
        info!(
            "door: toggle pulse {:?} -> {:?} (direction {:?})",
            self.state, next, dir
        );
        self.state = next;
        self.direction = dir;
    }
}

impl Default for Door {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn door_in(state: DoorState, direction: Direction) -> Door {
        Door {
            state,
            direction,
            position: 0.5,
        }
    }

    #[test]
    fn boots_closed_with_close_direction() {
        let d = Door::new();
        assert_eq!(d.state(), DoorState::Closed);
        assert_eq!(d.direction(), Direction::Close);
        assert_eq!(d.position(), 0.0);
    }

    #[test]
    fn pulse_from_open_starts_closing() {
        let mut d = door_in(DoorState::Open, Direction::Open);
        d.pulse();
        assert_eq!(d.state(), DoorState::Closing);
        assert_eq!(d.direction(), Direction::Close);
    }

    #[test]
    fn pulse_from_opening_stops_without_touching_direction() {
        let mut d = door_in(DoorState::Opening, Direction::Open);
        d.pulse();
        assert_eq!(d.state(), DoorState::Stopped);
        assert_eq!(d.direction(), Direction::Open);
    }

    #[test]
    fn pulse_from_closing_stops_without_touching_direction() {
        let mut d = door_in(DoorState::Closing, Direction::Close);
        d.pulse();
        assert_eq!(d.state(), DoorState::Stopped);
        assert_eq!(d.direction(), Direction::Close);
    }

    #[test]
    fn pulse_from_stopped_reverses_last_direction() {
        let mut d = door_in(DoorState::Stopped, Direction::Open);
        d.pulse();
        assert_eq!(d.state(), DoorState::Closing);
        assert_eq!(d.direction(), Direction::Close);

        let mut d = door_in(DoorState::Stopped, Direction::Close);
        d.pulse();
        assert_eq!(d.state(), DoorState::Opening);
        assert_eq!(d.direction(), Direction::Open);
    }

    #[test]
    fn pulse_from_closed_starts_opening() {
        let mut d = door_in(DoorState::Closed, Direction::Close);
        d.pulse();
        assert_eq!(d.state(), DoorState::Opening);
        assert_eq!(d.direction(), Direction::Open);
    }

    #[test]
    fn double_pulse_from_open_ends_stopped_not_open() {
        let mut d = door_in(DoorState::Open, Direction::Open);
        d.pulse();
        d.pulse();
        assert_eq!(d.state(), DoorState::Stopped);
    }

    #[test]
    fn pulse_never_touches_position() {
        for state in DoorState::ALL {
            for direction in [Direction::Close, Direction::Open] {
                let mut d = door_in(state, direction);
                d.pulse();
                assert_eq!(d.position(), 0.5, "pulse from {state:?} moved position");
            }
        }
    }
}
