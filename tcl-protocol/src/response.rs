//! Device responses
//!
//! Every response is a single `\n`-terminated text line.

use core::fmt::{self, Write};

use heapless::String;

use crate::message::HEADER;
use crate::reader::MAX_MESSAGE_LEN;

/// Longest encoded response line (prefix + program name + newline)
pub const MAX_RESPONSE_LEN: usize = 32 + MAX_MESSAGE_LEN;

// Response keywords
pub const RESP_READY: &str = "ready";
pub const RESP_HAND_RECEIVED: &str = "handreceived";
pub const RESP_HANDSHAKE_CONFIRMED: &str = "handshakeconfirmed";
pub const RESP_HANDSHAKE_PROGRAM: &str = "handshakeprogram";
pub const RESP_COLOR_BEGIN_RECEIVED: &str = "colorbeginreceived";

/// A response line sent from the device to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Boot announcement
    Ready,
    /// Handshake accepted for `program`
    HandReceived { program: &'a str },
    /// Whether a handshake is in place
    HandshakeConfirmed { made: bool },
    /// Name of the program holding the session
    HandshakeProgram { program: &'a str },
    /// Color streaming enabled for `program`
    ColorBeginReceived { program: &'a str },
}

impl<'a> Response<'a> {
    /// Encode this response into a fixed-capacity line
    pub fn encode(&self) -> Result<String<MAX_RESPONSE_LEN>, fmt::Error> {
        let mut line = String::new();
        write!(line, "{}", self)?;
        Ok(line)
    }

    /// Parse a received line (host side)
    ///
    /// Trailing `\r`/`\n` are ignored. Returns `None` for lines that are
    /// not device responses.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.splitn(3, ':');

        if fields.next()? != HEADER {
            return None;
        }
        let keyword = fields.next()?;
        let value = fields.next();

        match (keyword, value) {
            (RESP_READY, None) => Some(Response::Ready),
            (RESP_HAND_RECEIVED, Some(program)) => Some(Response::HandReceived { program }),
            (RESP_HANDSHAKE_CONFIRMED, Some("1")) => {
                Some(Response::HandshakeConfirmed { made: true })
            }
            (RESP_HANDSHAKE_CONFIRMED, Some("0")) => {
                Some(Response::HandshakeConfirmed { made: false })
            }
            (RESP_HANDSHAKE_PROGRAM, Some(program)) => Some(Response::HandshakeProgram {
                program: program.strip_prefix(' ').unwrap_or(program),
            }),
            (RESP_COLOR_BEGIN_RECEIVED, Some(program)) => {
                Some(Response::ColorBeginReceived { program })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ready => writeln!(f, "{}:{}", HEADER, RESP_READY),
            Response::HandReceived { program } => {
                writeln!(f, "{}:{}:{}", HEADER, RESP_HAND_RECEIVED, program)
            }
            Response::HandshakeConfirmed { made } => {
                writeln!(f, "{}:{}:{}", HEADER, RESP_HANDSHAKE_CONFIRMED, u8::from(*made))
            }
            // The space after the colon is part of the wire format
            Response::HandshakeProgram { program } => {
                writeln!(f, "{}:{}: {}", HEADER, RESP_HANDSHAKE_PROGRAM, program)
            }
            Response::ColorBeginReceived { program } => {
                writeln!(f, "{}:{}:{}", HEADER, RESP_COLOR_BEGIN_RECEIVED, program)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lines() {
        assert_eq!(Response::Ready.encode().unwrap(), "tcl:ready\n");
        assert_eq!(
            Response::HandReceived { program: "Py" }.encode().unwrap(),
            "tcl:handreceived:Py\n"
        );
        assert_eq!(
            Response::HandshakeConfirmed { made: true }.encode().unwrap(),
            "tcl:handshakeconfirmed:1\n"
        );
        assert_eq!(
            Response::HandshakeConfirmed { made: false }.encode().unwrap(),
            "tcl:handshakeconfirmed:0\n"
        );
        assert_eq!(
            Response::HandshakeProgram { program: "Py" }.encode().unwrap(),
            "tcl:handshakeprogram: Py\n"
        );
        assert_eq!(
            Response::ColorBeginReceived { program: "Py" }.encode().unwrap(),
            "tcl:colorbeginreceived:Py\n"
        );
    }

    #[test]
    fn test_longest_program_name_fits() {
        let bytes = [b'n'; MAX_MESSAGE_LEN];
        let name = core::str::from_utf8(&bytes).unwrap();
        let line = Response::ColorBeginReceived { program: name }
            .encode()
            .unwrap();
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_parse_host_side() {
        assert_eq!(Response::parse("tcl:ready\r\n"), Some(Response::Ready));
        assert_eq!(
            Response::parse("tcl:handshakeprogram: sound2light\n"),
            Some(Response::HandshakeProgram {
                program: "sound2light"
            })
        );
        assert_eq!(
            Response::parse("tcl:handshakeconfirmed:1"),
            Some(Response::HandshakeConfirmed { made: true })
        );
        assert_eq!(Response::parse("tcl:handshakeconfirmed:yes"), None);
        assert_eq!(Response::parse("Color Channel:\t0"), None);
        assert_eq!(Response::parse(""), None);
    }
}
