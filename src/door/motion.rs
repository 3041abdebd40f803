//! Drive motion simulator.
//!
//! Stands in for the physical drive's position feedback. Each tick of
//! the control loop advances the position one fixed step toward the
//! target implied by the current discrete state, and performs the
//! terminal transition when a travel limit is reached:
//!
//! - `Closing`: position decreases; at 0.0 the door latches `Closed`.
//! - `Opening`: position increases; at 1.0 the door latches `Open`.
//! - anything else: no motion.
//!
//! This module is the sole writer of `Door::position` and the sole
//! trigger of the two terminal transitions. The step lands exactly on
//! the bound when it reaches or passes it, so the `Closed ⇒ 0.0` and
//! `Open ⇒ 1.0` invariants hold without float residue.

use log::info;

use super::{Door, DoorState};

/// Advances a [`Door`]'s position by one fixed step per tick.
#[derive(Debug, Clone, Copy)]
pub struct MotionSimulator {
    step: f32,
}

impl MotionSimulator {
    /// `step` is the normalized travel per tick (0 < step <= 1).
    pub fn new(step: f32) -> Self {
        debug_assert!(step > 0.0 && step <= 1.0, "invalid motion step {step}");
        Self { step }
    }

    /// Run one simulator tick against `door`.
    ///
    /// Returns the terminal state if this tick latched a travel limit,
    /// so the caller can report the completed transition.
    pub fn tick(&self, door: &mut Door) -> Option<DoorState> {
        match door.state {
            DoorState::Closing => {
                door.position -= self.step;
                if door.position <= 0.0 {
                    door.position = 0.0;
                    door.state = DoorState::Closed;
                    info!("door: finished closing, now closed");
                    return Some(DoorState::Closed);
                }
                info!("door: position is {:.2}", door.position);
                None
            }
            DoorState::Opening => {
                door.position += self.step;
                if door.position >= 1.0 {
                    door.position = 1.0;
                    door.state = DoorState::Open;
                    info!("door: finished opening, now open");
                    return Some(DoorState::Open);
                }
                info!("door: position is {:.2}", door.position);
                None
            }
            DoorState::Closed | DoorState::Stopped | DoorState::Open => None,
        }
    }
}
