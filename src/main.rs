//! GarageDoor Daemon — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  TcpLink           LogEventSink       ConfigFileAdapter        │
//! │  (LinkTransport)   (EventSink)        (ConfigPort)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              DoorService (pure logic)                  │    │
//! │  │  Door · Toggle resolver · Motion simulator             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LinkEngine (dispatcher) · Link I/O thread (reconnecting)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concurrent activities share the door: the motion simulator tick
//! and command handling. Both are serialized here, on the control-loop
//! thread — the link I/O thread only ever talks to it through bounded
//! channels, so every read-modify-write of the door happens in one
//! total order.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use garagedoor::adapters::config_file::ConfigFileAdapter;
use garagedoor::adapters::log_sink::LogEventSink;
use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::{ConfigError, ConfigPort, EventSink};
use garagedoor::app::service::DoorService;
use garagedoor::config::SystemConfig;
use garagedoor::events::{Event, drain_events, push_event};
use garagedoor::link::channels::ChannelReplySink;
use garagedoor::link::engine::LinkEngine;
use garagedoor::link::io_task;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  GarageDoor v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1. Load config (or defaults) ──────────────────────────
    let config_path = std::env::var_os("GARAGEDOOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("garagedoor.json"));
    let store = ConfigFileAdapter::new(config_path);
    let config = match store.load() {
        Ok(cfg) => {
            info!("Config loaded from {}", store.path().display());
            cfg
        }
        Err(ConfigError::NotFound) => {
            info!(
                "No config at {}, running with defaults",
                store.path().display()
            );
            SystemConfig::default()
        }
        Err(e) => {
            warn!("Config load failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    // ── 2. Construct adapters and the door service ────────────
    let mut log_sink = LogEventSink::new();
    let mut replies = ChannelReplySink;
    let mut service = DoorService::new(config.position_step);
    service.start(&mut log_sink);

    let mut engine = LinkEngine::new(&config);

    // ── 3. Link I/O thread (binds and retries forever) ────────
    let _link_thread = io_task::spawn(config.clone())?;

    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));
    let telemetry_every =
        (u64::from(config.telemetry_interval_secs) * 1000 / u64::from(config.tick_interval_ms)).max(1);
    let mut telemetry_counter: u64 = 0;

    loop {
        std::thread::sleep(tick);
        push_event(Event::MotionTick);

        telemetry_counter += 1;
        if telemetry_counter >= telemetry_every {
            push_event(Event::TelemetryTick);
            telemetry_counter = 0;
        }

        // Apply connection lifecycle notices before any pending
        // commands, so a fresh auth outcome is visible to the gate.
        while let Some(notice) = io_task::try_recv_notice() {
            engine.apply_notice(notice);
        }

        if io_task::commands_pending() {
            push_event(Event::CommandPending);
        }

        // Process all pending events, one at a time, in order.
        drain_events(|event| match event {
            Event::MotionTick => {
                service.tick(&mut log_sink);
            }
            Event::TelemetryTick => {
                let t = service.build_telemetry();
                log_sink.emit(&AppEvent::Telemetry(t));
            }
            Event::CommandPending => {
                while let Some(msg) = io_task::try_recv_command() {
                    engine.dispatch(
                        msg.peer,
                        msg.line.as_str(),
                        &mut service,
                        &mut replies,
                        &mut log_sink,
                    );
                }
            }
        });
    }
}
