//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks; the decoder buffers them and yields an
//! [`SseEvent`] for every complete event block (terminated by a blank line).

/// One server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name, `"message"` when the block has no `event:` field.
    pub event: String,
    /// Concatenated `data:` lines, joined with `\n`.
    pub data: String,
}

/// Buffers raw bytes and splits them into events.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    /// Bytes of `buf` already searched without finding a separator.
    scanned: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        // A separator may straddle the previous chunk boundary by up to 3 bytes
        let mut from = self.scanned.saturating_sub(3);
        while let Some((end, sep_len)) = find_block_end(&self.buf, from) {
            let block: Vec<u8> = self.buf.drain(..end + sep_len).take(end).collect();
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
            from = 0;
        }
        self.scanned = self.buf.len();
        events
    }
}

/// Locate the first blank-line separator at or after `from`, returning
/// (block length, separator length).
fn find_block_end(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i < buf.len() {
        if buf[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if buf[i..].starts_with(b"\n\n") {
            return Some((i, 2));
        }
        i += 1;
    }
    None
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }

    Some(SseEvent {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"event: put\ndata: {\"path\":\"/\",\"data\":null}\n\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: "put".to_string(),
                data: r#"{"path":"/","data":null}"#.to_string(),
            }]
        );
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: pa").is_empty());
        assert!(decoder.push(b"tch\ndata: {}\n").is_empty());
        let events = decoder.push(b"\nevent: keep-alive\ndata: null\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "patch");
        assert_eq!(events[1].event, "keep-alive");
        assert_eq!(events[1].data, "null");
    }

    #[test]
    fn test_crlf_and_comments() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": heartbeat\r\nevent: put\r\ndata: 1\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "put");
        assert_eq!(events[0].data, "1");
    }

    #[test]
    fn test_multiline_data_and_default_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b"data: first\ndata: second\n\n");
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "first\nsecond");
    }

    #[test]
    fn test_large_event_fed_byte_by_byte() {
        let payload = "x".repeat(64 * 1024);
        let stream = format!(
            "event: put\r\ndata: {}\r\n\r\nevent: keep-alive\ndata: null\n\n",
            payload
        );

        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for byte in stream.as_bytes() {
            events.extend(decoder.push(std::slice::from_ref(byte)));
        }

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "put");
        assert_eq!(events[0].data, payload);
        assert_eq!(events[1].event, "keep-alive");
        assert!(decoder.buf.is_empty());
    }

    #[test]
    fn test_separator_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: put\r\ndata: 1\r\n\r").is_empty());
        let events = decoder.push(b"\nevent: patch\ndata: 2\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "1");

        let events = decoder.push(b"\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "patch");
        assert_eq!(events[0].data, "2");
    }

    #[test]
    fn test_comment_only_block_is_skipped() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b": ping\n\n").is_empty());
    }
}
