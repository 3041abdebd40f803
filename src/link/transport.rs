//! Transport abstraction — any multi-peer, byte-oriented channel.
//!
//! Concrete implementations:
//! - TCP socket server ([`TcpLink`](crate::adapters::tcp_link::TcpLink))
//! - [`NullTransport`] when no link is wired up (tests, dry runs)
//!
//! The link I/O task is generic over `LinkTransport`, so adding a new
//! transport (serial, TLS, a broker client) requires zero changes to
//! the dispatch logic. Authentication mechanics live entirely inside
//! the transport; the link layer only ever sees the per-peer outcome
//! via [`LinkTransport::poll_auth`].

use core::fmt;

use crate::app::ports::PeerHandle;

/// Errors originating from a link transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// TCP or socket I/O failure.
    Io,
    /// Operation requires a connected peer but none is present
    /// (includes a peer that hung up).
    NotConnected,
    /// All peer slots are occupied.
    SlotsFull,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "socket I/O error"),
            Self::NotConnected => write!(f, "no peer connected"),
            Self::SlotsFull => write!(f, "all peer slots occupied"),
        }
    }
}

/// Multi-peer byte transport.
pub trait LinkTransport {
    /// Poll for a newly connected peer. Returns its slot when one was
    /// accepted this call, `None` otherwise.
    fn try_accept(&mut self) -> Option<PeerHandle>;

    /// Poll for a completed transport-level authentication outcome.
    ///
    /// For transports with a real handshake this fires when the
    /// handshake concludes; the plain TCP stand-in reports success at
    /// accept time.
    fn poll_auth(&mut self) -> Option<(PeerHandle, bool)>;

    /// Whether the peer slot currently holds a live connection.
    fn is_connected(&self, peer: PeerHandle) -> bool;

    /// Read up to `buf.len()` bytes from a peer.
    /// Returns `Ok(0)` when no data is available (non-blocking).
    fn read_peer(&mut self, peer: PeerHandle, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// Write `data` to a peer. Returns the number of bytes written.
    fn write_peer(&mut self, peer: PeerHandle, data: &[u8]) -> Result<usize, LinkError>;

    /// Flush any buffered output for a peer.
    fn flush_peer(&mut self, peer: PeerHandle) -> Result<(), LinkError>;

    /// Tear down a peer's connection and free its slot.
    fn disconnect(&mut self, peer: PeerHandle);
}

/// A null transport that accepts nobody and discards all writes.
/// Useful as a default when no link is configured.
pub struct NullTransport;

impl LinkTransport for NullTransport {
    fn try_accept(&mut self) -> Option<PeerHandle> {
        None
    }

    fn poll_auth(&mut self) -> Option<(PeerHandle, bool)> {
        None
    }

    fn is_connected(&self, _peer: PeerHandle) -> bool {
        false
    }

    fn read_peer(&mut self, _peer: PeerHandle, _buf: &mut [u8]) -> Result<usize, LinkError> {
        Ok(0)
    }

    fn write_peer(&mut self, _peer: PeerHandle, data: &[u8]) -> Result<usize, LinkError> {
        Ok(data.len())
    }

    fn flush_peer(&mut self, _peer: PeerHandle) -> Result<(), LinkError> {
        Ok(())
    }

    fn disconnect(&mut self, _peer: PeerHandle) {}
}
