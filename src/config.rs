//! System configuration parameters
//!
//! All tunable parameters for the garage door daemon.
//! Values can be overridden via a JSON config file at startup.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Link ---
    /// Address the command link listens on.
    pub listen_addr: heapless::String<48>,
    /// Delay between link bind/reconnect attempts (seconds).
    pub link_retry_secs: u32,
    /// Deny commands from peers the transport has not authenticated.
    pub require_auth: bool,
    /// Per-peer command budget (commands per second, token bucket).
    pub rate_limit_per_sec: u32,

    // --- Motion ---
    /// Simulator tick interval (milliseconds).
    pub tick_interval_ms: u32,
    /// Normalized travel per tick (full travel = 1.0).
    pub position_step: f32,

    // --- Timing ---
    /// Telemetry report interval (seconds).
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut listen_addr = heapless::String::new();
        // 48 bytes comfortably holds any v4 addr:port.
        listen_addr.push_str("0.0.0.0:4242").unwrap();

        Self {
            // Link
            listen_addr,
            link_retry_secs: 5,
            require_auth: true,
            rate_limit_per_sec: 10,

            // Motion: 0.01 of travel per 300 ms tick, ~30 s full travel
            tick_interval_ms: 300,
            position_step: 0.01,

            // Timing
            telemetry_interval_secs: 60,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, not
    /// clamped, so a mangled config file cannot stall the simulator or
    /// disable the link retry loop.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.listen_addr.is_empty() {
            return Err("listen_addr must not be empty");
        }
        if self.link_retry_secs == 0 {
            return Err("link_retry_secs must be at least 1");
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1");
        }
        if !(self.position_step > 0.0 && self.position_step <= 1.0) {
            return Err("position_step must be in (0, 1]");
        }
        if self.telemetry_interval_secs == 0 {
            return Err("telemetry_interval_secs must be at least 1");
        }
        if self.rate_limit_per_sec == 0 {
            return Err("rate_limit_per_sec must be at least 1");
        }
        Ok(())
    }
}
