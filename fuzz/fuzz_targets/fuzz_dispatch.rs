//! Fuzz target: codec → engine → service pipeline
//!
//! Streams arbitrary bytes through the full inbound path and asserts
//! the physical door invariants survive whatever the wire delivers.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::{EventSink, PeerHandle, ReplySink};
use garagedoor::app::service::DoorService;
use garagedoor::config::SystemConfig;
use garagedoor::door::DoorState;
use garagedoor::link::channels::LinkNotice;
use garagedoor::link::codec::LineDecoder;
use garagedoor::link::engine::LinkEngine;
use libfuzzer_sys::fuzz_target;

struct NullSink;
impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct NullReplies;
impl ReplySink for NullReplies {
    fn send_reply(&mut self, _to: PeerHandle, _text: &str) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig {
        require_auth: false,
        rate_limit_per_sec: u32::MAX,
        ..Default::default()
    };
    let mut engine = LinkEngine::new(&config);
    let mut service = DoorService::new(config.position_step);
    service.start(&mut NullSink);
    engine.apply_notice(LinkNotice::Connected(0));

    let mut decoder = LineDecoder::new();
    let mut lines: Vec<String> = Vec::new();
    decoder.feed(data, |l| lines.push(l.to_owned()));

    for line in lines {
        engine.dispatch(0, &line, &mut service, &mut NullReplies, &mut NullSink);
        service.tick(&mut NullSink);

        let position = service.position();
        assert!((0.0..=1.0).contains(&position));
        match service.state() {
            DoorState::Closed => assert_eq!(position, 0.0),
            DoorState::Open => assert_eq!(position, 1.0),
            _ => {}
        }
    }
});
