//! Newline-delimited line codec.
//!
//! Wire format: one command per line, terminated by `\n` (an optional
//! trailing `\r` is stripped for telnet-style clients).
//!
//! The decoder accumulates incoming bytes and yields complete lines.
//! This handles partial reads gracefully — a single transport read may
//! return part of a line, or several lines concatenated. Lines longer
//! than [`MAX_LINE_LEN`] are discarded up to the next newline instead
//! of being truncated into a different (possibly valid) command.

use log::warn;

/// Maximum accepted line length in bytes, terminator excluded.
pub const MAX_LINE_LEN: usize = 128;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    /// Set while skipping the tail of an oversized line.
    discarding: bool,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            discarding: false,
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Invokes `on_line` once per complete line found in `data`,
    /// in arrival order. Incomplete trailing bytes are buffered for
    /// the next call. Non-UTF-8 lines are dropped with a diagnostic.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in data {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else {
                    let mut line = self.buf.as_slice();
                    if line.last() == Some(&b'\r') {
                        line = &line[..line.len() - 1];
                    }
                    match core::str::from_utf8(line) {
                        Ok(text) => on_line(text),
                        Err(_) => warn!("link: dropping non-UTF-8 line ({} bytes)", line.len()),
                    }
                }
                self.buf.clear();
            } else if self.discarding {
                // Still inside an oversized line.
            } else if self.buf.push(byte).is_err() {
                warn!(
                    "link: line exceeds {} bytes, discarding up to next newline",
                    MAX_LINE_LEN
                );
                self.buf.clear();
                self.discarding = true;
            }
        }
    }

    /// Reset decoder state (e.g. after a peer reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
