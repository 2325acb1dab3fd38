//! Accumulation buffer for session output.
//!
//! Device output arrives in arbitrary chunks and is often decorated with
//! terminal escape sequences (colour, cursor movement). Everything read from
//! a session goes through this buffer, which strips the escapes on the way in
//! and hands back plain text on drain.

use bytes::BytesMut;

/// Buffer for accumulating session output between drains.
#[derive(Debug)]
pub struct SessionBuffer {
    /// The accumulated, escape-free output.
    buffer: BytesMut,
}

impl SessionBuffer {
    /// Create a new buffer with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// The last line currently in the buffer (no trailing newline).
    ///
    /// On a quiet interactive session this is usually the live prompt.
    pub fn tail_line(&self) -> &[u8] {
        let data = self.buffer.as_ref();
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        match memchr::memrchr(b'\n', data) {
            Some(pos) => &data[pos + 1..],
            None => data,
        }
    }

    /// Drain the buffer as text, normalising `\r\n` line endings.
    pub fn take_string(&mut self) -> String {
        let bytes = self.buffer.split();
        let text = String::from_utf8_lossy(&bytes);
        if memchr::memchr(b'\r', &bytes).is_some() {
            text.replace("\r\n", "\n").replace('\r', "")
        } else {
            text.into_owned()
        }
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for SessionBuffer {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}
