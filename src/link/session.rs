//! Peer sessions — authentication outcome tracking and rate limiting.
//!
//! The transport owns *how* a peer authenticates (its handshake, its
//! credentials — none of the link layer's business). What the link
//! layer keeps is the per-peer *outcome*: a session starts
//! unauthenticated, flips when the transport reports success, and is
//! reset when the peer disconnects. The dispatcher consults the flag
//! before acting on any command — deny-by-default, so a command that
//! races ahead of the transport's authentication report is dropped.
//!
//! Each session also carries a token-bucket rate limiter so one chatty
//! peer cannot monopolize the control loop.

use burster::Limiter;
use core::time::Duration;
use log::warn;

use crate::app::ports::PeerHandle;

/// Maximum number of concurrently connected peers.
pub const MAX_PEERS: usize = 4;

// ── Single session ───────────────────────────────────────────

/// Tracks one peer slot's authentication outcome and command budget.
pub struct Session {
    authenticated: bool,
    rate_limiter: burster::TokenBucket<fn() -> Duration>,
}

impl Session {
    /// `rate_per_sec` is both the bucket capacity and the refill rate.
    pub fn new(rate_per_sec: u32) -> Self {
        Self {
            authenticated: false,
            rate_limiter: burster::TokenBucket::new_with_time_provider(
                u64::from(rate_per_sec),
                u64::from(rate_per_sec),
                platform_now as fn() -> Duration,
            ),
        }
    }

    /// Record the transport's authentication outcome for this peer.
    pub fn set_authenticated(&mut self, success: bool) {
        if !success {
            warn!("session: transport reported failed authentication");
        }
        self.authenticated = success;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Consume one rate-limit token; returns `false` when exhausted.
    pub fn check_rate_limit(&mut self) -> bool {
        self.rate_limiter.try_consume(1).is_ok()
    }

    /// Reset the session back to unauthenticated (peer disconnect).
    pub fn reset(&mut self) {
        self.authenticated = false;
    }
}

// ── Session table for multi-peer support ─────────────────────

/// Fixed-size table of per-peer sessions, indexed by [`PeerHandle`].
pub struct SessionTable {
    sessions: [Session; MAX_PEERS],
}

impl SessionTable {
    pub fn new(rate_per_sec: u32) -> Self {
        Self {
            sessions: core::array::from_fn(|_| Session::new(rate_per_sec)),
        }
    }

    /// Get a mutable reference to the session for `peer`.
    pub fn get_mut(&mut self, peer: PeerHandle) -> Option<&mut Session> {
        self.sessions.get_mut(peer as usize)
    }

    /// Returns true if the specified peer is authenticated.
    pub fn is_authenticated(&self, peer: PeerHandle) -> bool {
        self.sessions
            .get(peer as usize)
            .is_some_and(Session::is_authenticated)
    }

    /// Record an authentication outcome for `peer`.
    pub fn set_authenticated(&mut self, peer: PeerHandle, success: bool) {
        if let Some(s) = self.sessions.get_mut(peer as usize) {
            s.set_authenticated(success);
        }
    }

    /// Reset a specific peer's session (e.g. on disconnect).
    pub fn reset_peer(&mut self, peer: PeerHandle) {
        if let Some(s) = self.sessions.get_mut(peer as usize) {
            s.reset();
        }
    }
}

// ── Platform time for rate limiter ───────────────────────────

fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}

// ── Tests ────────────────────────────────────────────────────
