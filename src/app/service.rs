//! Application service — the hexagonal core.
//!
//! [`DoorService`] owns the [`Door`] entity and the motion simulator.
//! It exposes the three high-level intents (open/close/stop), the three
//! queries, and the per-tick motion step. All I/O flows through port
//! traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  DoorCommand ──▶ ┌────────────────────────┐ ──▶ ReplySink
//!                  │      DoorService       │
//!      tick() ───▶ │  Door · pulse · motion │ ──▶ EventSink
//!                  └────────────────────────┘
//! ```
//!
//! An intent is not a pulse: a single toggle pulse cannot redirect a
//! moving door, so an intent may need zero, one, or (via a bounded
//! stop-then-retry) up to three pulses to realize. The retry depth is
//! guarded so an extended transition table can never loop the service.

use log::{info, warn};

use crate::door::motion::MotionSimulator;
use crate::door::{Direction, Door, DoorState};

use super::commands::DoorCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, PeerHandle, ReplySink};

/// Maximum intent re-entry depth. The deepest reachable chain is
/// `close()` from `Stopped` with a remembered CLOSE direction:
/// pulse (→ Opening), stop, pulse (→ Closing) — depth 2.
const MAX_REDIRECT_DEPTH: u8 = 2;

// ───────────────────────────────────────────────────────────────
// DoorService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct DoorService {
    door: Door,
    sim: MotionSimulator,
    tick_count: u64,
    commands_handled: u64,
    pulses_issued: u64,
}

impl DoorService {
    /// Construct the service with the given motion step per tick.
    pub fn new(position_step: f32) -> Self {
        Self {
            door: Door::new(),
            sim: MotionSimulator::new(position_step),
            tick_count: 0,
            commands_handled: 0,
            pulses_issued: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the initial state. Call once before the first `tick()`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.door.state()));
        info!("DoorService started in {:?}", self.door.state());
    }

    // ── Per-tick motion ───────────────────────────────────────

    /// Run one simulator tick: advance position toward the target
    /// implied by the current state, latching `Closed`/`Open` at the
    /// travel limits. No-op unless the door is moving.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        self.tick_count += 1;
        let prev = self.door.state();
        if let Some(terminal) = self.sim.tick(&mut self.door) {
            sink.emit(&AppEvent::TravelCompleted(terminal));
            sink.emit(&AppEvent::StateChanged {
                from: prev,
                to: terminal,
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process one decoded command from the link.
    ///
    /// The three intents report the resulting state back to the
    /// requesting peer once they complete; the queries reply with
    /// their own sentence and nothing else.
    pub fn handle_command(
        &mut self,
        cmd: DoorCommand,
        peer: PeerHandle,
        replies: &mut impl ReplySink,
        sink: &mut impl EventSink,
    ) {
        self.commands_handled += 1;
        match cmd {
            DoorCommand::Open => {
                self.open(sink);
                self.report_state(peer, replies);
            }
            DoorCommand::Close => {
                self.close(sink);
                self.report_state(peer, replies);
            }
            DoorCommand::Stop => {
                self.stop(sink);
                self.report_state(peer, replies);
            }
            DoorCommand::GetPosition => self.report_position(peer, replies),
            DoorCommand::GetDirection => self.report_direction(peer, replies),
            DoorCommand::GetState => self.report_state(peer, replies),
        }
    }

    // ── Intents ───────────────────────────────────────────────

    /// Drive the door toward fully open.
    pub fn open(&mut self, sink: &mut impl EventSink) {
        info!("intent: open");
        self.open_at(0, sink);
    }

    /// Drive the door toward fully closed.
    pub fn close(&mut self, sink: &mut impl EventSink) {
        info!("intent: close");
        self.close_at(0, sink);
    }

    /// Halt any in-progress travel. No-op at a limit or already stopped.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        info!("intent: stop");
        match self.door.state() {
            DoorState::Open | DoorState::Closed | DoorState::Stopped => {
                info!("door is not moving, nothing to stop");
            }
            DoorState::Opening | DoorState::Closing => self.pulse_once(sink),
        }
    }

    fn open_at(&mut self, depth: u8, sink: &mut impl EventSink) {
        if depth > MAX_REDIRECT_DEPTH {
            warn!("open intent exceeded redirect depth, aborting");
            return;
        }
        match self.door.state() {
            DoorState::Open => info!("door is already open"),
            DoorState::Opening => info!("door is already opening"),
            DoorState::Stopped | DoorState::Closed => self.pulse_once(sink),
            DoorState::Closing => {
                // One pulse alone cannot redirect a closing door.
                info!("door is closing, stopping before opening");
                self.stop(sink);
                self.open_at(depth + 1, sink);
            }
        }
    }

    fn close_at(&mut self, depth: u8, sink: &mut impl EventSink) {
        if depth > MAX_REDIRECT_DEPTH {
            warn!("close intent exceeded redirect depth, aborting");
            return;
        }
        match self.door.state() {
            DoorState::Closed => info!("door is already closed"),
            DoorState::Closing => info!("door is already closing"),
            DoorState::Open => self.pulse_once(sink),
            DoorState::Stopped => {
                // A pulse from Stopped resumes opposite the remembered
                // direction, which may be the wrong way for this intent.
                // Re-evaluate and issue a second pulse only if the door
                // did not end up closing.
                self.pulse_once(sink);
                if self.door.state() != DoorState::Closing {
                    self.close_at(depth + 1, sink);
                }
            }
            DoorState::Opening => {
                info!("door is opening, stopping before closing");
                self.stop(sink);
                self.close_at(depth + 1, sink);
            }
        }
    }

    fn pulse_once(&mut self, sink: &mut impl EventSink) {
        let from = self.door.state();
        self.door.pulse();
        self.pulses_issued += 1;
        sink.emit(&AppEvent::StateChanged {
            from,
            to: self.door.state(),
        });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Reply with the continuous position, two decimal places.
    pub fn report_position(&self, peer: PeerHandle, replies: &mut impl ReplySink) {
        let text = format!("Garage door position is {:.2}", self.door.position());
        info!("{}", text);
        replies.send_reply(peer, &text);
    }

    /// Reply with the discrete state sentence.
    pub fn report_state(&self, peer: PeerHandle, replies: &mut impl ReplySink) {
        let text = match self.door.state() {
            DoorState::Open => "Garage door is open.",
            DoorState::Opening => "Garage door is opening.",
            DoorState::Stopped => "Garage door is stopped.",
            DoorState::Closed => "Garage door is closed.",
            DoorState::Closing => "Garage door is closing.",
        };
        info!("{}", text);
        replies.send_reply(peer, text);
    }

    /// Reply with the remembered travel direction.
    pub fn report_direction(&self, peer: PeerHandle, replies: &mut impl ReplySink) {
        let text = match self.door.direction() {
            Direction::Open => "The direction of the door is OPEN direction.",
            Direction::Close => "The direction of the door is CLOSE direction.",
        };
        info!("{}", text);
        replies.send_reply(peer, text);
    }

    // ── Read accessors ────────────────────────────────────────

    pub fn state(&self) -> DoorState {
        self.door.state()
    }

    pub fn direction(&self) -> Direction {
        self.door.direction()
    }

    pub fn position(&self) -> f32 {
        self.door.position()
    }

    /// Total simulator ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            state: self.door.state(),
            direction: self.door.direction(),
            position: self.door.position(),
            tick_count: self.tick_count,
            commands_handled: self.commands_handled,
            pulses_issued: self.pulses_issued,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    fn make_service() -> DoorService {
        let mut svc = DoorService::new(0.01);
        svc.start(&mut NullSink);
        svc
    }

    #[test]
    fn open_from_closed_is_one_pulse() {
        let mut svc = make_service();
        svc.open(&mut NullSink);
        assert_eq!(svc.state(), DoorState::Opening);
        assert_eq!(svc.build_telemetry().pulses_issued, 1);
    }

    #[test]
    fn open_while_opening_is_a_no_op() {
        let mut svc = make_service();
        svc.open(&mut NullSink);
        svc.open(&mut NullSink);
        assert_eq!(svc.state(), DoorState::Opening);
        assert_eq!(svc.build_telemetry().pulses_issued, 1);
    }

    #[test]
    fn close_while_opening_stops_then_reverses() {
        let mut svc = make_service();
        svc.open(&mut NullSink);
        svc.close(&mut NullSink);
        // open pulse, then stop pulse + resume pulse; direction was
        // OPEN when stopped, so the resume resolves straight to Closing.
        assert_eq!(svc.state(), DoorState::Closing);
        assert_eq!(svc.build_telemetry().pulses_issued, 3);
    }

    #[test]
    fn close_from_stopped_close_direction_needs_three_pulses() {
        let mut svc = make_service();
        // Closed -> Opening -> (ticks) -> stop while... build the
        // Stopped+CLOSE case: open, close (now Closing), stop.
        svc.open(&mut NullSink);
        svc.close(&mut NullSink);
        svc.stop(&mut NullSink);
        assert_eq!(svc.state(), DoorState::Stopped);
        assert_eq!(svc.direction(), Direction::Close);

        let before = svc.build_telemetry().pulses_issued;
        svc.close(&mut NullSink);
        assert_eq!(svc.state(), DoorState::Closing);
        assert_eq!(svc.build_telemetry().pulses_issued - before, 3);
    }

    #[test]
    fn stop_is_idempotent_at_rest() {
        let mut svc = make_service();
        for _ in 0..5 {
            svc.stop(&mut NullSink);
        }
        assert_eq!(svc.state(), DoorState::Closed);
        assert_eq!(svc.direction(), Direction::Close);
        assert_eq!(svc.build_telemetry().pulses_issued, 0);
    }

    #[test]
    fn close_from_closed_changes_nothing() {
        let mut svc = make_service();
        svc.close(&mut NullSink);
        assert_eq!(svc.state(), DoorState::Closed);
        assert_eq!(svc.direction(), Direction::Close);
        assert_eq!(svc.position(), 0.0);
    }

    #[test]
    fn tick_only_moves_a_moving_door() {
        let mut svc = make_service();
        svc.tick(&mut NullSink);
        assert_eq!(svc.position(), 0.0);
        svc.open(&mut NullSink);
        svc.tick(&mut NullSink);
        assert!(svc.position() > 0.0);
    }
}
