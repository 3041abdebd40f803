//! Outbound application events.
//!
//! The [`DoorService`](super::service::DoorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them — log to the console, publish
//! over a future telemetry channel, etc.

use crate::door::{Direction, DoorState};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The door moved between discrete states.
    StateChanged { from: DoorState, to: DoorState },

    /// The simulator latched a travel limit (`Closed` or `Open`).
    TravelCompleted(DoorState),

    /// The application service has started (carries initial state).
    Started(DoorState),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    pub state: DoorState,
    pub direction: Direction,
    pub position: f32,
    pub tick_count: u64,
    pub commands_handled: u64,
    pub pulses_issued: u64,
}
