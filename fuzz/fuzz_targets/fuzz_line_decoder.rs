//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences into the streaming line decoder and
//! asserts that it never panics, never yields over-length lines, and
//! accepts input cleanly after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use garagedoor::link::codec::{LineDecoder, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    // Feed the raw bytes (may contain newlines, CRs, garbage, etc.)
    decoder.feed(data, |line| {
        assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
        assert!(!line.contains('\n'), "yielded line contains a terminator");
    });

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    decoder.feed(data, |_| {});
});
