//! Control-loop event queue.
//!
//! Events are produced by the control loop's own timers (motion tick,
//! telemetry tick) and by the arrival check on the link command
//! channel. They are consumed by the control loop, one at a time, in
//! FIFO order — turning "timer fired while a command was pending" races
//! into a total order of discrete events over the single [`Door`]
//! owner.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Tick timer   │────▶│              │     │              │
//! │ Telemetry    │────▶│  Event Queue │────▶│ Control Loop │
//! │ Link arrival │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! [`Door`]: crate::door::Door

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 32;

/// Control-loop event types, ordered by rough priority.
/// Lower discriminant = higher priority when multiple events
/// are pending simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Motion ────────────────────────────────────────────
    /// Simulator tick timer fired.
    MotionTick = 10,

    // ── Communication ─────────────────────────────────────
    /// One or more decoded commands are waiting on the link channel.
    CommandPending = 20,
    /// Telemetry report timer fired.
    TelemetryTick = 30,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// The control-loop thread is the only producer and the only consumer;
// the atomics keep the queue sound if a producer ever moves off-thread.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: EVENT_BUFFER is accessed exclusively through push_event /
// pop_event below. Producer and consumer both run on the control-loop
// thread; the atomic head/tail indices enforce the SPSC discipline and
// keep every element access disjoint.
static mut EVENT_BUFFER: [u8; EVENT_QUEUE_CAP] = [0; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    // SAFETY: single producer; the slot at `head` is not visible to the
    // consumer until the Release store below.
    unsafe {
        EVENT_BUFFER[head as usize] = event as u8;
    }

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the producer published this slot with
    // the Release store on EVENT_HEAD.
    let raw = unsafe { EVENT_BUFFER[tail as usize] };
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Check if the event queue is empty.
pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        10 => Some(Event::MotionTick),
        20 => Some(Event::CommandPending),
        30 => Some(Event::TelemetryTick),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queue is a process-wide static, so exercise it in one test
    // to avoid cross-test interference.
    #[test]
    fn push_pop_fifo_and_drain() {
        while pop_event().is_some() {}

        assert!(queue_is_empty());
        assert!(push_event(Event::MotionTick));
        assert!(push_event(Event::CommandPending));
        assert!(push_event(Event::TelemetryTick));
        assert!(!queue_is_empty());

        assert_eq!(pop_event(), Some(Event::MotionTick));

        let mut seen = Vec::new();
        drain_events(|e| seen.push(e));
        assert_eq!(seen, vec![Event::CommandPending, Event::TelemetryTick]);
        assert!(queue_is_empty());

        // Fill to capacity; the slot-sentinel design drops the overflow.
        let mut accepted = 0;
        while push_event(Event::MotionTick) {
            accepted += 1;
        }
        assert_eq!(accepted, EVENT_QUEUE_CAP - 1);
        while pop_event().is_some() {}
    }
}
