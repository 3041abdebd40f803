//! Link inter-task communication channels.
//!
//! Uses `embassy-sync` bounded MPMC channels to bridge the async link
//! I/O task with the synchronous control loop. Both threads share these
//! static channels without heap allocation.
//!
//! ```text
//! ┌──────────────┐  CommandMsg   ┌───────────────┐
//! │  Link I/O    │─────────────▶│  Control Loop │
//! │  (async)     │  LinkNotice   │  (sync)       │
//! │              │─────────────▶│               │
//! │              │◀─────────────│               │
//! └──────────────┘   ReplyMsg    └───────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::ports::{PeerHandle, ReplySink};

use super::codec::MAX_LINE_LEN;

/// Maximum reply text length (the longest state sentence plus slack).
pub const MAX_REPLY_LEN: usize = 128;

/// Inbound command line from a peer, delivered to the control loop.
pub struct CommandMsg {
    /// Which peer sent this line.
    pub peer: PeerHandle,
    /// The decoded line (framing already stripped).
    pub line: heapless::String<MAX_LINE_LEN>,
}

/// Outbound reply from the control loop, delivered to the I/O task.
pub struct ReplyMsg {
    /// Which peer this reply is destined for.
    pub peer: PeerHandle,
    /// Reply text; the I/O task appends the line terminator.
    pub text: heapless::String<MAX_REPLY_LEN>,
}

/// Connection lifecycle notifications from the I/O task.
#[derive(Debug, Clone, Copy)]
pub enum LinkNotice {
    /// A peer connected and was assigned a slot.
    Connected(PeerHandle),
    /// The transport finished authenticating a peer.
    AuthResult { peer: PeerHandle, success: bool },
    /// A peer disconnected (or was dropped after an I/O error).
    Disconnected(PeerHandle),
}

/// Channel depth for command (inbound) messages.
const CMD_DEPTH: usize = 8;

/// Channel depth for reply (outbound) messages.
const REPLY_DEPTH: usize = 16;

/// Inbound command channel: I/O task → control loop.
pub static CMD_CHANNEL: Channel<CriticalSectionRawMutex, CommandMsg, CMD_DEPTH> = Channel::new();

/// Outbound reply channel: control loop → I/O task.
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, ReplyMsg, REPLY_DEPTH> = Channel::new();

/// Lifecycle notification channel: I/O task → control loop.
pub static LINK_CHANNEL: Channel<CriticalSectionRawMutex, LinkNotice, 8> = Channel::new();

// ── ReplySink over the reply channel ─────────────────────────

/// [`ReplySink`] adapter that enqueues replies for the I/O task.
///
/// Fire-and-forget per the port contract: a full channel or an
/// oversized reply drops the message with a diagnostic.
pub struct ChannelReplySink;

impl ReplySink for ChannelReplySink {
    fn send_reply(&mut self, to: PeerHandle, text: &str) {
        let mut buf = heapless::String::new();
        if buf.push_str(text).is_err() {
            warn!("link: reply for peer {} exceeds {} bytes, dropped", to, MAX_REPLY_LEN);
            return;
        }
        if REPLY_CHANNEL.try_send(ReplyMsg { peer: to, text: buf }).is_err() {
            warn!("link: reply channel full for peer {}", to);
        }
    }
}
