//! Host session over an in-memory serial line
//!
//! Plays the host program against a [`SerialDispatcher`]: handshake,
//! status query, color streaming. Every line crossing the wire is printed,
//! device replies decoded with [`Response::parse`].
//!
//! ```text
//! cargo run -p tcl-core --example host_session
//! ```

use std::collections::VecDeque;
use std::convert::Infallible;

use tcl_core::color::ColorPipeline;
use tcl_core::dispatcher::{Cycle, DispatchError, SerialDispatcher};
use tcl_hal::{PixelStrip, UartRx, UartTx};
use tcl_protocol::{encode_frame, Command, FrameError, Response, BYTES_PER_PIXEL, MAX_LEDS};

const LED_COUNT: usize = 4;

// Fields are read through Debug when main fails
#[allow(dead_code)]
#[derive(Debug)]
enum SessionError {
    Dispatch(DispatchError<Infallible, Infallible>),
    Frame(FrameError),
    /// The device answered with something other than expected
    Unexpected(Cycle),
}

impl From<DispatchError<Infallible, Infallible>> for SessionError {
    fn from(e: DispatchError<Infallible, Infallible>) -> Self {
        SessionError::Dispatch(e)
    }
}

impl From<FrameError> for SessionError {
    fn from(e: FrameError) -> Self {
        SessionError::Frame(e)
    }
}

/// Both directions of the serial line
#[derive(Default)]
struct Line {
    to_device: VecDeque<u8>,
    to_host: Vec<u8>,
}

impl UartTx for Line {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
        self.to_host.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

impl UartRx for Line {
    type Error = Infallible;

    fn read_byte_timeout(&mut self, _timeout_ms: u32) -> Result<Option<u8>, Infallible> {
        Ok(self.to_device.pop_front())
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Infallible> {
        Ok(self.to_device.pop_front())
    }
}

/// Strip that keeps the last frame for printing
#[derive(Default)]
struct ConsoleStrip {
    frame: Vec<[u8; 3]>,
}

impl PixelStrip for ConsoleStrip {
    type Error = Infallible;

    fn send_frame_start(&mut self) -> Result<(), Infallible> {
        self.frame.clear();
        Ok(())
    }

    fn send_pixel(&mut self, red: u8, green: u8, blue: u8) -> Result<(), Infallible> {
        self.frame.push([red, green, blue]);
        Ok(())
    }
}

struct Session {
    line: Line,
    strip: ConsoleStrip,
    dispatcher: SerialDispatcher,
    pipeline: ColorPipeline,
}

impl Session {
    fn pump(&mut self) -> Result<Cycle, SessionError> {
        let cycle = self
            .dispatcher
            .pump(&mut self.line, &mut self.strip, &self.pipeline)?;
        Ok(cycle)
    }

    /// Send one command and print what comes back
    fn command(&mut self, command: Command<'_>) -> Result<(), SessionError> {
        let text = command.to_string();
        println!("host   -> {}", text);
        self.line.to_device.extend(text.bytes());

        match self.pump()? {
            Cycle::Message { .. } => {}
            other => return Err(SessionError::Unexpected(other)),
        }

        let replies = String::from_utf8_lossy(&self.line.to_host).into_owned();
        self.line.to_host.clear();
        if replies.trim().is_empty() {
            println!("device <- (terminator only)");
        }
        for line in replies.lines().filter(|line| !line.is_empty()) {
            match Response::parse(line) {
                Some(response) => println!("device <- {:<40} {:?}", line, response),
                None => println!("device <- {:<40} (not a response)", line),
            }
        }
        Ok(())
    }

    /// Stream one frame and print the corrected pixels
    fn frame(&mut self, pixels: &[[u8; 3]]) -> Result<(), SessionError> {
        let mut buffer = [0u8; 1 + MAX_LEDS * BYTES_PER_PIXEL];
        let len = encode_frame(pixels, &mut buffer)?;
        println!("host   -> frame {:?}", pixels);
        self.line.to_device.extend(&buffer[..len]);

        match self.pump()? {
            Cycle::Frame => {}
            other => return Err(SessionError::Unexpected(other)),
        }
        println!("strip  <- {:?}", self.strip.frame);
        Ok(())
    }
}

fn main() -> Result<(), SessionError> {
    let dispatcher = SerialDispatcher::new(LED_COUNT, 100)?;

    let mut line = Line::default();
    dispatcher.announce(&mut line)?;
    print!("device <- {}", String::from_utf8_lossy(&line.to_host));
    line.to_host.clear();

    let mut session = Session {
        line,
        strip: ConsoleStrip::default(),
        dispatcher,
        pipeline: ColorPipeline::default(),
    };

    // Ignored until the handshake is made
    session.command(Command::Status)?;

    session.command(Command::HandExtended {
        program: "host_session",
    })?;
    session.command(Command::Status)?;
    session.command(Command::ColorBegin)?;

    session.frame(&[[255, 0, 0], [0, 255, 0], [0, 0, 255], [42, 42, 42]])?;
    session.frame(&[[128, 128, 128]; LED_COUNT])?;

    Ok(())
}
