//! UART serial communication abstractions
//!
//! The firmware runs a single cooperative loop, so every call here is
//! blocking. Reads are always bounded by a timeout; a stalled host never
//! stalls the device indefinitely.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read a single byte, waiting at most `timeout_ms` milliseconds
    ///
    /// Returns `Ok(None)` when the timeout expires with nothing received.
    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error>;

    /// Read a single byte if one is already pending
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Discard everything currently pending on the receiver
    ///
    /// Returns the number of bytes thrown away.
    fn drain(&mut self) -> Result<usize, Self::Error> {
        let mut discarded = 0;
        while self.try_read_byte()?.is_some() {
            discarded += 1;
        }
        Ok(discarded)
    }
}

/// Combined UART interface
///
/// For transports where TX and RX share a single error type.
pub trait Uart: UartTx + UartRx<Error = <Self as UartTx>::Error> {}

// Blanket implementation
impl<T> Uart for T where T: UartTx + UartRx<Error = <T as UartTx>::Error> {}
