//! Incremental decoding of streamed completion bodies
//!
//! Network chunks can split lines (and multi-byte characters) anywhere, so
//! bytes are buffered until a full line is available.

/// Splits a byte stream into complete lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every line completed by them (without line endings)
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&line[..line.len() - 1]));
        }
        lines
    }

    /// Flush a trailing line that had no terminating newline
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// One server-sent event relevant to completions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload
    Data(String),
    /// The `data: [DONE]` terminator
    Done,
}

/// Decoder for `text/event-stream` bodies
///
/// Only `data:` fields are surfaced. Comments, `event:`/`id:` fields and
/// blank separator lines are ignored.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: LineBuffer,
}

impl SseDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning the events they complete
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.lines
            .push(bytes)
            .iter()
            .filter_map(|line| parse_line(line))
            .collect()
    }

    /// Flush any event left in the buffer at end of stream
    pub fn finish(&mut self) -> Option<SseEvent> {
        self.lines.finish().and_then(|line| parse_line(&line))
    }
}

fn parse_line(line: &str) -> Option<SseEvent> {
    let payload = line.strip_prefix("data:")?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.trim() == "[DONE]" {
        Some(SseEvent::Done)
    } else if payload.trim().is_empty() {
        None
    } else {
        Some(SseEvent::Data(payload.to_string()))
    }
}
