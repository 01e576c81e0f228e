//! Serial command cycle
//!
//! One [`SerialDispatcher::pump`] call handles at most one unit of input:
//! either a text message (read up to `!` or 64 bytes) or, once the host has
//! sent `colorbegin`, a raw color frame. Every read is bounded by the
//! per-byte timeout, so a silent host costs one timeout per cycle.

use core::convert::Infallible;

use tcl_hal::{PixelStrip, Uart, UartRx, UartTx};
use tcl_protocol::{
    ColorFrameReader, FrameError, Message, MessageReader, Response, COLOR_FRAME_MARKER,
};

use crate::color::{Color, ColorPipeline};
use crate::handshake::{HandshakeProtocol, SessionState};
use crate::patterns;

/// Errors that can occur during a dispatcher cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<E, S> {
    /// Serial transport failed
    Transport(E),
    /// Strip transmit failed
    Strip(S),
    /// A response did not fit its line buffer
    Encode,
}

/// What a cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Nothing arrived before the timeout
    Idle,
    /// A text message was processed
    Message {
        /// Response lines sent, newline terminator excluded
        responses: usize,
        /// Session state afterwards
        state: SessionState,
    },
    /// A color frame was rendered
    Frame,
    /// A color frame timed out and was dropped
    FrameDropped {
        /// Payload bytes received before the timeout
        received: usize,
    },
}

/// Drives the handshake protocol from a serial transport
#[derive(Debug, Clone)]
pub struct SerialDispatcher {
    protocol: HandshakeProtocol,
    reader: MessageReader,
    frame: ColorFrameReader,
    read_timeout_ms: u32,
}

impl SerialDispatcher {
    /// Dispatcher for a strip of `led_count` LEDs
    pub fn new(led_count: usize, read_timeout_ms: u32) -> Result<Self, FrameError> {
        Ok(Self {
            protocol: HandshakeProtocol::new(),
            reader: MessageReader::new(),
            frame: ColorFrameReader::new(led_count)?,
            read_timeout_ms,
        })
    }

    /// Handshake protocol
    pub fn protocol(&self) -> &HandshakeProtocol {
        &self.protocol
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.protocol.state()
    }

    /// Forget the host and any partial input
    pub fn reset(&mut self) {
        self.protocol.reset();
        self.reader.reset();
        self.frame.reset();
    }

    /// Send the boot banner
    pub fn announce<T: UartTx>(
        &self,
        uart: &mut T,
    ) -> Result<(), DispatchError<T::Error, Infallible>> {
        let line = Response::Ready
            .encode()
            .map_err(|_| DispatchError::Encode)?;
        uart.write_blocking(line.as_bytes())
            .map_err(DispatchError::Transport)?;
        uart.flush().map_err(DispatchError::Transport)
    }

    /// Run one cycle
    pub fn pump<T, S>(
        &mut self,
        uart: &mut T,
        strip: &mut S,
        pipeline: &ColorPipeline,
    ) -> Result<Cycle, DispatchError<<T as UartTx>::Error, S::Error>>
    where
        T: Uart,
        S: PixelStrip,
    {
        let Some(first) = uart
            .read_byte_timeout(self.read_timeout_ms)
            .map_err(DispatchError::Transport)?
        else {
            return Ok(Cycle::Idle);
        };

        if first == COLOR_FRAME_MARKER && self.protocol.session().receiving_color() {
            return self.receive_frame(uart, strip, pipeline);
        }

        self.receive_message(first, uart)
    }

    fn receive_message<T: Uart, SE>(
        &mut self,
        first: u8,
        uart: &mut T,
    ) -> Result<Cycle, DispatchError<<T as UartTx>::Error, SE>> {
        self.reader.reset();
        let mut status = self.reader.feed(first);
        while !status.is_complete() {
            match uart
                .read_byte_timeout(self.read_timeout_ms)
                .map_err(DispatchError::Transport)?
            {
                Some(byte) => status = self.reader.feed(byte),
                // Process whatever arrived
                None => break,
            }
        }

        let mut sent = 0;
        if let Ok(text) = self.reader.text() {
            let reply = self.protocol.apply_message(&Message::parse(text));
            for response in self.protocol.responses(reply) {
                let line = response.encode().map_err(|_| DispatchError::Encode)?;
                uart.write_blocking(line.as_bytes())
                    .map_err(DispatchError::Transport)?;
                sent += 1;
            }
        }

        uart.write_blocking(b"\n").map_err(DispatchError::Transport)?;
        uart.flush().map_err(DispatchError::Transport)?;
        uart.drain().map_err(DispatchError::Transport)?;

        Ok(Cycle::Message {
            responses: sent,
            state: self.protocol.state(),
        })
    }

    fn receive_frame<T, S>(
        &mut self,
        uart: &mut T,
        strip: &mut S,
        pipeline: &ColorPipeline,
    ) -> Result<Cycle, DispatchError<<T as UartTx>::Error, S::Error>>
    where
        T: Uart,
        S: PixelStrip,
    {
        self.frame.reset();
        while !self.frame.is_complete() {
            match uart
                .read_byte_timeout(self.read_timeout_ms)
                .map_err(DispatchError::Transport)?
            {
                Some(byte) => {
                    self.frame.feed(byte);
                }
                None => {
                    let received = self.frame.received();
                    uart.drain().map_err(DispatchError::Transport)?;
                    return Ok(Cycle::FrameDropped { received });
                }
            }
        }

        let colors = self
            .frame
            .pixels()
            .map(|[red, green, blue]| Color::from_bytes(red, green, blue));
        patterns::render(strip, pipeline, colors).map_err(DispatchError::Strip)?;

        Ok(Cycle::Frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CalibrationParameters, ChannelCalibration};
    use crate::patterns::mock::MockStrip;
    use heapless::{Deque, Vec};

    /// Loopback-style UART: `rx` is what the host sent, `tx` what we wrote
    #[derive(Default)]
    struct MockUart {
        rx: Deque<u8, 512>,
        tx: Vec<u8, 512>,
        flushes: usize,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct UartFault;

    impl MockUart {
        fn host_sends(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.rx.push_back(byte).unwrap();
            }
        }

        fn written(&self) -> &str {
            core::str::from_utf8(&self.tx).unwrap()
        }

        fn clear_written(&mut self) {
            self.tx.clear();
        }
    }

    impl UartTx for MockUart {
        type Error = UartFault;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), UartFault> {
            self.tx.extend_from_slice(data).map_err(|_| UartFault)
        }

        fn flush(&mut self) -> Result<(), UartFault> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl UartRx for MockUart {
        type Error = UartFault;

        fn read_byte_timeout(&mut self, _timeout_ms: u32) -> Result<Option<u8>, UartFault> {
            Ok(self.rx.pop_front())
        }

        fn try_read_byte(&mut self) -> Result<Option<u8>, UartFault> {
            Ok(self.rx.pop_front())
        }
    }

    fn linear() -> ColorPipeline {
        ColorPipeline::new(CalibrationParameters::uniform(ChannelCalibration::new(
            0.0, 1.0, 1.0,
        )))
    }

    fn setup() -> (SerialDispatcher, MockUart, MockStrip) {
        (
            SerialDispatcher::new(2, 10).unwrap(),
            MockUart::default(),
            MockStrip::default(),
        )
    }

    #[test]
    fn test_idle_when_nothing_arrives() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        let cycle = dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert_eq!(cycle, Cycle::Idle);
        assert!(uart.tx.is_empty());
    }

    #[test]
    fn test_handshake_exchange() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        let pipeline = linear();

        uart.host_sends(b"tcl:handextended:Py!");
        let cycle = dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(
            cycle,
            Cycle::Message {
                responses: 1,
                state: SessionState::Connected
            }
        );
        assert_eq!(uart.written(), "tcl:handreceived:Py\n\n");

        uart.clear_written();
        uart.host_sends(b"tcl:status!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(
            uart.written(),
            "tcl:handshakeconfirmed:1\ntcl:handshakeprogram: Py\n\n"
        );
    }

    #[test]
    fn test_foreign_message_gets_only_newline() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(b"foo:bar!");
        let cycle = dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert_eq!(
            cycle,
            Cycle::Message {
                responses: 0,
                state: SessionState::Disconnected
            }
        );
        assert_eq!(uart.written(), "\n");
        assert!(!uart.written().contains("tcl:"));
    }

    #[test]
    fn test_status_before_handshake_gets_only_newline() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(b"tcl:status!");
        let cycle = dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert_eq!(
            cycle,
            Cycle::Message {
                responses: 0,
                state: SessionState::Disconnected
            }
        );
        assert_eq!(uart.written(), "\n");
        assert_eq!(uart.flushes, 1);
    }

    #[test]
    fn test_trailing_input_is_drained() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(b"tcl:handextended:Py!tcl:status!junk");
        dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert!(uart.rx.is_empty());
        assert_eq!(uart.written(), "tcl:handreceived:Py\n\n");
    }

    #[test]
    fn test_timeout_processes_partial_message() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(b"tcl:handextended:Py");
        dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert_eq!(dispatcher.state(), SessionState::Connected);
    }

    #[test]
    fn test_overlong_message_is_cut_at_capacity() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(b"tcl:handextended:");
        uart.host_sends(&[b'x'; 80]);
        uart.host_sends(b"!");
        dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();

        let name_len = 64 - "tcl:handextended:".len();
        assert_eq!(dispatcher.protocol().session().program_name().len(), name_len);
        assert!(uart.rx.is_empty());
    }

    #[test]
    fn test_color_frame_rendered_after_colorbegin() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        let pipeline = linear();

        uart.host_sends(b"tcl:handextended:Py!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        uart.host_sends(b"tcl:colorbegin!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(dispatcher.state(), SessionState::ReceivingColor);

        uart.host_sends(&[b'*', 255, 0, 43, 0, 255, 0]);
        let cycle = dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(cycle, Cycle::Frame);
        assert_eq!(strip.frames_started, 1);
        assert_eq!(strip.pixels.as_slice(), &[(255, 0, 43), (0, 255, 0)]);
    }

    #[test]
    fn test_short_frame_is_dropped() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        let pipeline = linear();

        uart.host_sends(b"tcl:handextended:Py!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        uart.host_sends(b"tcl:colorbegin!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();

        uart.host_sends(&[b'*', 1, 2, 3, 4]);
        let cycle = dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(cycle, Cycle::FrameDropped { received: 4 });
        assert_eq!(strip.frames_started, 0);
    }

    #[test]
    fn test_marker_before_colorbegin_is_text() {
        let (mut dispatcher, mut uart, mut strip) = setup();

        uart.host_sends(&[b'*', 1, 2, 3, 4, 5, 6]);
        let cycle = dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();
        assert!(matches!(cycle, Cycle::Message { responses: 0, .. }));
        assert_eq!(strip.frames_started, 0);
        assert_eq!(uart.written(), "\n");
    }

    #[test]
    fn test_text_still_accepted_while_streaming() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        let pipeline = linear();

        uart.host_sends(b"tcl:handextended:Py!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        uart.host_sends(b"tcl:colorbegin!");
        dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();

        uart.clear_written();
        uart.host_sends(b"tcl:status!");
        let cycle = dispatcher.pump(&mut uart, &mut strip, &pipeline).unwrap();
        assert_eq!(
            cycle,
            Cycle::Message {
                responses: 2,
                state: SessionState::ReceivingColor
            }
        );
    }

    #[test]
    fn test_announce() {
        let (dispatcher, mut uart, _) = setup();
        dispatcher.announce(&mut uart).unwrap();
        assert_eq!(uart.written(), "tcl:ready\n");
        assert_eq!(uart.flushes, 1);
    }

    #[test]
    fn test_reset_forgets_host() {
        let (mut dispatcher, mut uart, mut strip) = setup();
        uart.host_sends(b"tcl:handextended:Py!");
        dispatcher.pump(&mut uart, &mut strip, &linear()).unwrap();

        dispatcher.reset();
        assert_eq!(dispatcher.state(), SessionState::Disconnected);
    }
}
