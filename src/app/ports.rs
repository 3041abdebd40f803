//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorService (domain)
//! ```
//!
//! Driven adapters (the link reply path, event sinks, config storage)
//! implement these traits. The [`DoorService`](super::service::DoorService)
//! consumes them via generics, so the domain core never touches a socket
//! or the filesystem directly.

use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Peer identity
// ───────────────────────────────────────────────────────────────

/// Opaque reply destination handed in with each command.
///
/// The core never interprets it — it is a slot index owned by the link
/// layer, carried through so replies land on the requesting peer.
pub type PeerHandle = u8;

// ───────────────────────────────────────────────────────────────
// Reply sink port (domain → requesting peer)
// ───────────────────────────────────────────────────────────────

/// Outbound text replies to a specific peer.
///
/// Fire-and-forget: delivery failure is the transport's concern, never
/// the domain's. Implementations must not block.
pub trait ReplySink {
    fn send_reply(&mut self, to: PeerHandle, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a
/// future MQTT publisher, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (startup config source)
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST validate before returning: invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped, so a mangled config file cannot inject a zero tick interval
/// or a negative motion step.
pub trait ConfigPort {
    /// Load configuration from the backing store.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in the backing store (first run).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
