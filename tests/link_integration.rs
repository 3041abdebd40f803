//! Integration tests: line codec → link engine → door service.

use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::{EventSink, PeerHandle, ReplySink};
use garagedoor::app::service::DoorService;
use garagedoor::config::SystemConfig;
use garagedoor::door::DoorState;
use garagedoor::link::channels::LinkNotice;
use garagedoor::link::codec::LineDecoder;
use garagedoor::link::engine::LinkEngine;

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

fn harness(config: SystemConfig) -> (LinkEngine, DoorService, RecordingReplies) {
    let engine = LinkEngine::new(&config);
    let mut service = DoorService::new(config.position_step);
    service.start(&mut NullSink);
    (engine, service, RecordingReplies::default())
}

fn connect_and_auth(engine: &mut LinkEngine, peer: PeerHandle) {
    engine.apply_notice(LinkNotice::Connected(peer));
    engine.apply_notice(LinkNotice::AuthResult {
        peer,
        success: true,
    });
}

/// Push a raw byte stream through the codec into the engine, the way
/// the I/O task and control loop do in production.
fn feed(
    decoder: &mut LineDecoder,
    engine: &mut LinkEngine,
    peer: PeerHandle,
    data: &[u8],
    service: &mut DoorService,
    replies: &mut RecordingReplies,
) {
    let mut lines: Vec<String> = Vec::new();
    decoder.feed(data, |l| lines.push(l.to_owned()));
    for line in lines {
        engine.dispatch(peer, &line, service, replies, &mut NullSink);
    }
}

#[test]
fn a_session_drives_the_door_end_to_end() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    connect_and_auth(&mut engine, 0);

    feed(&mut decoder, &mut engine, 0, b"open\r\n", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Opening);

    feed(&mut decoder, &mut engine, 0, b"GETSTATE\n", &mut service, &mut replies);
    assert_eq!(replies.replies, vec![
        (0, "Garage door is opening.".to_owned()),
        (0, "Garage door is opening.".to_owned()),
    ]);
}

#[test]
fn several_commands_in_one_chunk_all_dispatch() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    connect_and_auth(&mut engine, 0);

    feed(
        &mut decoder,
        &mut engine,
        0,
        b"OPEN\nSTOP\nGETDIRECTION\n",
        &mut service,
        &mut replies,
    );
    assert_eq!(service.state(), DoorState::Stopped);
    assert_eq!(replies.replies.len(), 3);
    assert_eq!(
        replies.replies[2].1,
        "The direction of the door is OPEN direction."
    );
}

#[test]
fn partial_lines_are_held_until_complete() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    connect_and_auth(&mut engine, 0);

    feed(&mut decoder, &mut engine, 0, b"OP", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Closed, "no complete line yet");
    feed(&mut decoder, &mut engine, 0, b"EN\n", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Opening);
}

#[test]
fn unknown_commands_are_suppressed_without_reply() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    connect_and_auth(&mut engine, 0);

    feed(
        &mut decoder,
        &mut engine,
        0,
        b"LAUNCH MISSILES\nGETSTATE\n",
        &mut service,
        &mut replies,
    );
    assert_eq!(service.state(), DoorState::Closed);
    assert_eq!(replies.replies, vec![(0, "Garage door is closed.".to_owned())]);
}

#[test]
fn commands_before_auth_outcome_are_denied() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    engine.apply_notice(LinkNotice::Connected(0));

    feed(&mut decoder, &mut engine, 0, b"OPEN\n", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Closed);
    assert!(replies.replies.is_empty());

    // The transport reports authentication; the same command now acts.
    engine.apply_notice(LinkNotice::AuthResult {
        peer: 0,
        success: true,
    });
    feed(&mut decoder, &mut engine, 0, b"OPEN\n", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Opening);
}

#[test]
fn failed_transport_auth_keeps_the_gate_shut() {
    let (mut engine, mut service, mut replies) = harness(SystemConfig::default());
    let mut decoder = LineDecoder::new();
    engine.apply_notice(LinkNotice::Connected(1));
    engine.apply_notice(LinkNotice::AuthResult {
        peer: 1,
        success: false,
    });

    feed(&mut decoder, &mut engine, 1, b"OPEN\n", &mut service, &mut replies);
    assert_eq!(service.state(), DoorState::Closed);
    assert!(replies.replies.is_empty());
}

#[test]
fn command_bursts_beyond_the_rate_limit_are_dropped() {
    let config = SystemConfig {
        rate_limit_per_sec: 5,
        require_auth: false,
        ..Default::default()
    };
    let (mut engine, mut service, mut replies) = harness(config);
    connect_and_auth(&mut engine, 0);

    for _ in 0..20 {
        engine.dispatch(0, "GETSTATE", &mut service, &mut replies, &mut NullSink);
    }
    assert!(
        replies.replies.len() <= 5,
        "expected at most 5 replies within one bucket, got {}",
        replies.replies.len()
    );
    assert!(!replies.replies.is_empty());
}

#[test]
fn peers_are_rate_limited_independently() {
    let config = SystemConfig {
        rate_limit_per_sec: 3,
        require_auth: false,
        ..Default::default()
    };
    let (mut engine, mut service, mut replies) = harness(config);
    connect_and_auth(&mut engine, 0);
    connect_and_auth(&mut engine, 1);

    for _ in 0..10 {
        engine.dispatch(0, "GETSTATE", &mut service, &mut replies, &mut NullSink);
    }
    engine.dispatch(1, "GETSTATE", &mut service, &mut replies, &mut NullSink);

    assert!(
        replies.replies.iter().any(|(p, _)| *p == 1),
        "peer 1 must not be starved by peer 0's burst"
    );
}
