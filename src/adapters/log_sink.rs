//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the process log. A future MQTT or webhook adapter would implement
//! the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | dir={:?} | pos={:.2} | ticks={} | cmds={} | pulses={}",
                    t.state, t.direction, t.position, t.tick_count, t.commands_handled, t.pulses_issued,
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::TravelCompleted(state) => {
                info!("LIMIT | door latched {:?}", state);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
