//! Link engine — dispatches decoded command lines to the door service.
//!
//! **Transport-decoupled**: the engine does not own a transport.
//! Callers feed `(peer, line)` pairs via [`dispatch`](LinkEngine::dispatch)
//! and lifecycle notices via [`apply_notice`](LinkEngine::apply_notice);
//! the I/O task bridges the transport to this engine via channels.
//!
//! Every line passes through a three-gate pipeline:
//!
//! 1. **Rate limiting** — per-peer token bucket rejects bursts.
//! 2. **Authentication gate** — deny-by-default: until the transport
//!    reports a successful authentication for the peer, its commands
//!    are dropped (configurable via `require_auth`).
//! 3. **Decode** — case-insensitive command parse; unknown input is
//!    logged and produces no reply.
//!
//! A line that clears all gates is handed to the
//! [`DoorService`](crate::app::service::DoorService), which replies to
//! the originating peer through the [`ReplySink`] port.

use log::{info, warn};

use crate::app::commands::DoorCommand;
use crate::app::ports::{EventSink, PeerHandle, ReplySink};
use crate::app::service::DoorService;
use crate::config::SystemConfig;

use super::channels::LinkNotice;
use super::session::SessionTable;

/// Command dispatcher with per-peer session table.
pub struct LinkEngine {
    sessions: SessionTable,
    require_auth: bool,
}

impl LinkEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sessions: SessionTable::new(config.rate_limit_per_sec),
            require_auth: config.require_auth,
        }
    }

    /// Apply a connection lifecycle notice from the I/O task.
    pub fn apply_notice(&mut self, notice: LinkNotice) {
        match notice {
            LinkNotice::Connected(peer) => {
                info!("link: peer {} connected", peer);
                self.sessions.reset_peer(peer);
            }
            LinkNotice::AuthResult { peer, success } => {
                info!("link: peer {} authentication outcome: {}", peer, success);
                self.sessions.set_authenticated(peer, success);
            }
            LinkNotice::Disconnected(peer) => {
                info!("link: peer {} disconnected", peer);
                self.sessions.reset_peer(peer);
            }
        }
    }

    /// Dispatch one decoded line from `peer`.
    pub fn dispatch(
        &mut self,
        peer: PeerHandle,
        line: &str,
        service: &mut DoorService,
        replies: &mut impl ReplySink,
        sink: &mut impl EventSink,
    ) {
        let Some(session) = self.sessions.get_mut(peer) else {
            warn!("link: line from out-of-range peer {}", peer);
            return;
        };

        if !session.check_rate_limit() {
            warn!("link: peer {} over command rate limit, dropping line", peer);
            return;
        }

        if self.require_auth && !session.is_authenticated() {
            warn!("link: peer {} not authenticated, dropping command", peer);
            return;
        }

        match DoorCommand::parse(line) {
            Some(cmd) => {
                info!("link: peer {} -> {:?}", peer, cmd);
                service.handle_command(cmd, peer, replies, sink);
            }
            None => {
                warn!("link: unknown command from peer {}: {:?}", peer, line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::AppEvent;
    use crate::door::DoorState;

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[derive(Default)]
    struct RecordingReplies {
        replies: Vec<(PeerHandle, String)>,
    }
    impl ReplySink for RecordingReplies {
        fn send_reply(&mut self, to: PeerHandle, text: &str) {
            self.replies.push((to, text.to_owned()));
        }
    }

    fn harness(require_auth: bool) -> (LinkEngine, DoorService, RecordingReplies) {
        let config = SystemConfig {
            require_auth,
            ..Default::default()
        };
        let engine = LinkEngine::new(&config);
        let mut service = DoorService::new(config.position_step);
        service.start(&mut NullSink);
        (engine, service, RecordingReplies::default())
    }

    #[test]
    fn authenticated_peer_command_gets_a_state_reply() {
        let (mut engine, mut service, mut replies) = harness(true);
        engine.apply_notice(LinkNotice::Connected(0));
        engine.apply_notice(LinkNotice::AuthResult {
            peer: 0,
            success: true,
        });

        engine.dispatch(0, "OPEN", &mut service, &mut replies, &mut NullSink);
        assert_eq!(service.state(), DoorState::Opening);
        assert_eq!(replies.replies, vec![(0, "Garage door is opening.".to_owned())]);
    }

    #[test]
    fn unauthenticated_peer_is_denied_by_default() {
        let (mut engine, mut service, mut replies) = harness(true);
        engine.apply_notice(LinkNotice::Connected(0));

        engine.dispatch(0, "OPEN", &mut service, &mut replies, &mut NullSink);
        assert_eq!(service.state(), DoorState::Closed, "command must not act");
        assert!(replies.replies.is_empty(), "denied command must not reply");
    }

    #[test]
    fn auth_gate_can_be_disabled() {
        let (mut engine, mut service, mut replies) = harness(false);
        engine.apply_notice(LinkNotice::Connected(0));

        engine.dispatch(0, "open", &mut service, &mut replies, &mut NullSink);
        assert_eq!(service.state(), DoorState::Opening);
        assert_eq!(replies.replies.len(), 1);
    }

    #[test]
    fn unknown_command_produces_no_reply() {
        let (mut engine, mut service, mut replies) = harness(false);
        engine.apply_notice(LinkNotice::Connected(0));

        engine.dispatch(0, "FROBNICATE", &mut service, &mut replies, &mut NullSink);
        assert_eq!(service.state(), DoorState::Closed);
        assert!(replies.replies.is_empty());
    }

    #[test]
    fn disconnect_resets_the_auth_outcome() {
        let (mut engine, mut service, mut replies) = harness(true);
        engine.apply_notice(LinkNotice::Connected(1));
        engine.apply_notice(LinkNotice::AuthResult {
            peer: 1,
            success: true,
        });
        engine.apply_notice(LinkNotice::Disconnected(1));
        engine.apply_notice(LinkNotice::Connected(1));

        engine.dispatch(1, "OPEN", &mut service, &mut replies, &mut NullSink);
        assert_eq!(service.state(), DoorState::Closed);
        assert!(replies.replies.is_empty());
    }

    #[test]
    fn queries_reply_to_the_requesting_peer_only() {
        let (mut engine, mut service, mut replies) = harness(false);
        engine.apply_notice(LinkNotice::Connected(2));

        engine.dispatch(2, "GETPOSITION", &mut service, &mut replies, &mut NullSink);
        engine.dispatch(2, "GETDIRECTION", &mut service, &mut replies, &mut NullSink);
        assert_eq!(replies.replies, vec![
            (2, "Garage door position is 0.00".to_owned()),
            (2, "The direction of the door is CLOSE direction.".to_owned()),
        ]);
    }
}
