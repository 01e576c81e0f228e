//! Serial port adapter
//!
//! Wraps any blocking `embedded-io` byte stream (typically
//! `embassy_rp::uart::BufferedUart`) and adds the timeout-bounded reads the
//! dispatcher relies on. Timeouts busy-poll the receive buffer against the
//! embassy time driver.

use embassy_time::{Duration, Instant};
use embedded_io::{ErrorType, Read, ReadReady, Write};
use tcl_hal::{UartRx, UartTx};

/// Serial port with timeout-bounded reads
pub struct SerialPort<U> {
    inner: U,
}

impl<U> SerialPort<U> {
    /// Wrap a byte stream
    pub fn new(inner: U) -> Self {
        Self { inner }
    }
}

impl<U: Write> UartTx for SerialPort<U> {
    type Error = <U as ErrorType>::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<U: Read + ReadReady> UartRx for SerialPort<U> {
    type Error = <U as ErrorType>::Error;

    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        let deadline = Instant::now() + Duration::from_millis(u64::from(timeout_ms));
        loop {
            if let Some(byte) = self.try_read_byte()? {
                return Ok(Some(byte));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}
