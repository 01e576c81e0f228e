//! Raw color frames
//!
//! Once color streaming is enabled the host sends whole strip frames:
//!
//! - MARKER (1 byte): `*` (0x2A)
//! - PIXELS (3 * N bytes): red, green, blue per LED, nearest LED first
//!
//! There is no length field and no checksum. The host never emits the
//! marker value inside pixel data (see [`sanitize_channel`]), but the reader
//! does not depend on that: after the marker it simply counts bytes.

use heapless::Vec;

/// Byte that opens a color frame
pub const COLOR_FRAME_MARKER: u8 = b'*';

/// Largest supported strip
pub const MAX_LEDS: usize = 64;

/// Channel bytes per LED
pub const BYTES_PER_PIXEL: usize = 3;

/// Largest pixel payload (marker excluded)
pub const MAX_FRAME_BYTES: usize = MAX_LEDS * BYTES_PER_PIXEL;

/// Errors that can occur when setting up or encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// LED count exceeds [`MAX_LEDS`]
    TooManyLeds,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// Map a channel value so it never collides with the frame marker
///
/// Used by hosts before sending. 42 becomes 43, every other value is kept.
pub const fn sanitize_channel(value: u8) -> u8 {
    if value == COLOR_FRAME_MARKER {
        COLOR_FRAME_MARKER + 1
    } else {
        value
    }
}

/// Encode a frame for `pixels` into `buffer` (host side)
///
/// Channel values are passed through [`sanitize_channel`]. Returns the
/// number of bytes written.
pub fn encode_frame(pixels: &[[u8; 3]], buffer: &mut [u8]) -> Result<usize, FrameError> {
    if pixels.len() > MAX_LEDS {
        return Err(FrameError::TooManyLeds);
    }
    let frame_len = 1 + pixels.len() * BYTES_PER_PIXEL;
    if buffer.len() < frame_len {
        return Err(FrameError::BufferTooSmall);
    }

    buffer[0] = COLOR_FRAME_MARKER;
    for (chunk, pixel) in buffer[1..frame_len]
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(pixels)
    {
        for (out, &value) in chunk.iter_mut().zip(pixel) {
            *out = sanitize_channel(value);
        }
    }

    Ok(frame_len)
}

/// Collects the pixel payload that follows a frame marker
///
/// The marker itself is consumed by the caller, which is the one deciding
/// whether a `*` starts a frame or a text message.
#[derive(Debug, Clone)]
pub struct ColorFrameReader {
    buffer: Vec<u8, MAX_FRAME_BYTES>,
    expected: usize,
}

impl ColorFrameReader {
    /// Create a reader for a strip of `led_count` LEDs
    pub fn new(led_count: usize) -> Result<Self, FrameError> {
        if led_count > MAX_LEDS {
            return Err(FrameError::TooManyLeds);
        }
        Ok(Self {
            buffer: Vec::new(),
            expected: led_count * BYTES_PER_PIXEL,
        })
    }

    /// Payload length this reader waits for
    pub fn expected_len(&self) -> usize {
        self.expected
    }

    /// Number of payload bytes received so far
    pub fn received(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the whole payload has arrived
    pub fn is_complete(&self) -> bool {
        self.buffer.len() >= self.expected
    }

    /// Feed a single payload byte
    ///
    /// Returns `true` once the frame is complete. Bytes fed after that are
    /// ignored.
    pub fn feed(&mut self, byte: u8) -> bool {
        if !self.is_complete() {
            // expected never exceeds the buffer capacity
            let _ = self.buffer.push(byte);
        }
        self.is_complete()
    }

    /// Drop the partial payload and wait for a new frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Received pixels as `[red, green, blue]`
    ///
    /// A partial trailing pixel is not yielded.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.buffer
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|chunk| [chunk[0], chunk[1], chunk[2]])
    }
}
