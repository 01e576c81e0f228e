//! Incremental message reader
//!
//! Bytes are fed one at a time, the way they come off the serial line. A
//! message ends at the `!` terminator or when the buffer is full, whichever
//! comes first. The terminator itself is not stored.

use heapless::Vec;

/// Message terminator byte
pub const MESSAGE_TERMINATOR: u8 = b'!';

/// Maximum message length in bytes (terminator excluded)
pub const MAX_MESSAGE_LEN: usize = 64;

/// Errors that can occur when extracting message text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// Buffered bytes are not valid UTF-8
    InvalidUtf8,
}

/// Reader progress after a byte was fed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadStatus {
    /// Need more bytes
    Pending,
    /// Terminator seen, message complete
    Terminated,
    /// Buffer filled up before a terminator arrived
    Full,
}

impl ReadStatus {
    /// Check if the message is complete
    pub const fn is_complete(self) -> bool {
        !matches!(self, ReadStatus::Pending)
    }
}

/// Accumulates one message
#[derive(Debug, Clone, Default)]
pub struct MessageReader {
    buffer: Vec<u8, MAX_MESSAGE_LEN>,
}

impl MessageReader {
    /// Create an empty reader
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Drop any buffered bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Feeding after completion without a [`reset`](Self::reset) keeps
    /// reporting [`ReadStatus::Full`] once the buffer is full.
    pub fn feed(&mut self, byte: u8) -> ReadStatus {
        if self.buffer.is_full() {
            return ReadStatus::Full;
        }
        if byte == MESSAGE_TERMINATOR {
            return ReadStatus::Terminated;
        }

        // Capacity was checked above
        let _ = self.buffer.push(byte);

        if self.buffer.is_full() {
            ReadStatus::Full
        } else {
            ReadStatus::Pending
        }
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffered message as trimmed text
    pub fn text(&self) -> Result<&str, ReadError> {
        core::str::from_utf8(&self.buffer)
            .map(str::trim)
            .map_err(|_| ReadError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed until a message completes, returning the status and bytes used
    fn feed_all(reader: &mut MessageReader, bytes: &[u8]) -> (ReadStatus, usize) {
        for (index, &byte) in bytes.iter().enumerate() {
            let status = reader.feed(byte);
            if status.is_complete() {
                return (status, index + 1);
            }
        }
        (ReadStatus::Pending, bytes.len())
    }

    #[test]
    fn test_terminated_message() {
        let mut reader = MessageReader::new();
        let (status, consumed) = feed_all(&mut reader, b"tcl:status!tcl:colorbegin!");

        assert_eq!(status, ReadStatus::Terminated);
        assert_eq!(consumed, 11);
        assert_eq!(reader.text(), Ok("tcl:status"));
    }

    #[test]
    fn test_pending_without_terminator() {
        let mut reader = MessageReader::new();
        let (status, consumed) = feed_all(&mut reader, b"tcl:sta");

        assert_eq!(status, ReadStatus::Pending);
        assert_eq!(consumed, 7);
        assert_eq!(reader.len(), 7);
    }

    #[test]
    fn test_full_buffer_completes_message() {
        let mut reader = MessageReader::new();
        let data = [b'a'; MAX_MESSAGE_LEN + 10];
        let (status, consumed) = feed_all(&mut reader, &data);

        assert_eq!(status, ReadStatus::Full);
        assert_eq!(consumed, MAX_MESSAGE_LEN);
        assert_eq!(reader.len(), MAX_MESSAGE_LEN);
        assert_eq!(reader.feed(b'!'), ReadStatus::Full);
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut reader = MessageReader::new();
        feed_all(&mut reader, b"\r\n tcl:status \t!");
        assert_eq!(reader.text(), Ok("tcl:status"));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut reader = MessageReader::new();
        feed_all(&mut reader, &[0xFF, 0xFE, b'!']);
        assert_eq!(reader.text(), Err(ReadError::InvalidUtf8));
    }

    #[test]
    fn test_reset() {
        let mut reader = MessageReader::new();
        feed_all(&mut reader, b"abc!");
        reader.reset();
        assert!(reader.is_empty());
        assert_eq!(reader.feed(b'x'), ReadStatus::Pending);
    }
}
