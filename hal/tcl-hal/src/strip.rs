//! LED strip transmission primitives

/// Pixel-serial LED strip
///
/// A frame is a frame-start marker followed by one `send_pixel` call per LED,
/// nearest LED first.
pub trait PixelStrip {
    /// Error type for transmit operations
    type Error;

    /// Emit the marker that makes the next pixel land on the first LED
    fn send_frame_start(&mut self) -> Result<(), Self::Error>;

    /// Emit one already-corrected pixel
    fn send_pixel(&mut self, red: u8, green: u8, blue: u8) -> Result<(), Self::Error>;
}
