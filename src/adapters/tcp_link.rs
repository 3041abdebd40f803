//! TCP link transport adapter.
//!
//! Implements [`LinkTransport`] — a multi-peer, line-oriented command
//! channel over a non-blocking TCP server. This is the stand-in for the
//! real external message transport: it owns connection acceptance and
//! reports per-peer authentication outcomes upward, but carries no
//! credential machinery of its own (a secured transport would report
//! after its handshake instead of at accept time).
//!
//! ## Connection model
//!
//! 1. [`TcpLink::bind`] binds a TCP listener (non-blocking mode).
//! 2. `try_accept()` polls for an incoming connection; on success the
//!    peer socket is switched to non-blocking and parked in a free
//!    slot. With all slots occupied the connection is dropped.
//! 3. Reads are non-blocking — `read_peer()` returns `Ok(0)` when no
//!    data is available rather than blocking the caller; a clean EOF
//!    surfaces as [`LinkError::NotConnected`].
//! 4. `disconnect()` tears down the peer socket and frees its slot.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};

use log::{info, warn};

use crate::app::ports::PeerHandle;
use crate::link::session::MAX_PEERS;
use crate::link::transport::{LinkError, LinkTransport};

/// Non-blocking multi-peer TCP server.
pub struct TcpLink {
    listener: TcpListener,
    peers: [Option<TcpStream>; MAX_PEERS],
    /// Authentication outcomes not yet polled by the I/O task.
    pending_auth: VecDeque<(PeerHandle, bool)>,
}

impl TcpLink {
    /// Bind a listener on `addr` (e.g. `0.0.0.0:4242`) in non-blocking
    /// mode.
    pub fn bind(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            peers: core::array::from_fn(|_| None),
            pending_auth: VecDeque::new(),
        })
    }

    /// The actual bound address (useful when binding port 0 in tests).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    fn free_slot(&self) -> Option<usize> {
        self.peers.iter().position(Option::is_none)
    }
}

impl LinkTransport for TcpLink {
    fn try_accept(&mut self) -> Option<PeerHandle> {
        let (stream, addr) = match self.listener.accept() {
            Ok(pair) => pair,
            Err(e) if e.kind() == ErrorKind::WouldBlock => return None,
            Err(e) => {
                warn!("tcp: accept failed: {}", e);
                return None;
            }
        };

        let Some(slot) = self.free_slot() else {
            warn!("tcp: all {} peer slots occupied, dropping {}", MAX_PEERS, addr);
            let _ = stream.shutdown(Shutdown::Both);
            return None;
        };

        if let Err(e) = stream.set_nonblocking(true) {
            warn!("tcp: set_nonblocking failed for {}: {}", addr, e);
            return None;
        }

        let peer = slot as PeerHandle;
        info!("tcp: {} connected as peer {}", addr, peer);
        self.peers[slot] = Some(stream);
        // Plain TCP has no handshake to wait for; report the outcome
        // immediately so the deny-by-default gate opens for this peer.
        self.pending_auth.push_back((peer, true));
        Some(peer)
    }

    fn poll_auth(&mut self) -> Option<(PeerHandle, bool)> {
        self.pending_auth.pop_front()
    }

    fn is_connected(&self, peer: PeerHandle) -> bool {
        self.peers
            .get(peer as usize)
            .is_some_and(Option::is_some)
    }

    fn read_peer(&mut self, peer: PeerHandle, buf: &mut [u8]) -> Result<usize, LinkError> {
        let stream = self
            .peers
            .get_mut(peer as usize)
            .and_then(Option::as_mut)
            .ok_or(LinkError::NotConnected)?;

        match stream.read(buf) {
            Ok(0) => Err(LinkError::NotConnected), // orderly EOF
            Ok(n) => Ok(n),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::Interrupted => {
                Ok(0)
            }
            Err(_) => Err(LinkError::Io),
        }
    }

    fn write_peer(&mut self, peer: PeerHandle, data: &[u8]) -> Result<usize, LinkError> {
        let stream = self
            .peers
            .get_mut(peer as usize)
            .and_then(Option::as_mut)
            .ok_or(LinkError::NotConnected)?;

        stream.write_all(data).map_err(|_| LinkError::Io)?;
        Ok(data.len())
    }

    fn flush_peer(&mut self, peer: PeerHandle) -> Result<(), LinkError> {
        let stream = self
            .peers
            .get_mut(peer as usize)
            .and_then(Option::as_mut)
            .ok_or(LinkError::NotConnected)?;

        stream.flush().map_err(|_| LinkError::Io)
    }

    fn disconnect(&mut self, peer: PeerHandle) {
        if let Some(slot) = self.peers.get_mut(peer as usize) {
            if let Some(stream) = slot.take() {
                let _ = stream.shutdown(Shutdown::Both);
                info!("tcp: peer {} disconnected", peer);
            }
        }
    }
}
