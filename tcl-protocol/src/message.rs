//! Message and command parsing
//!
//! Parsing happens in two steps. [`Message::parse`] only checks the
//! structure (`header:instruction[:args]`); [`Command::from_message`] gives
//! the fields their protocol meaning.

use core::fmt;

use heapless::Vec;

use crate::tokenizer::{tokenize, TokenSet, TOKEN_CAPACITY};

/// Header every device-bound message starts with
pub const HEADER: &str = "tcl";

/// Field separator inside a message
pub const FIELD_DELIMITER: char = ':';

/// Maximum number of arguments after the instruction
pub const MAX_ARGS: usize = TOKEN_CAPACITY - 2;

// Instruction names
pub const INSTR_HAND_EXTENDED: &str = "handextended";
pub const INSTR_STATUS: &str = "status";
pub const INSTR_COLOR_BEGIN: &str = "colorbegin";

/// Structurally parsed message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message<'a> {
    /// At least a header and an instruction were present
    Recognized {
        header: &'a str,
        instruction: &'a str,
        args: Vec<&'a str, MAX_ARGS>,
    },
    /// Fewer than two fields
    Malformed,
}

impl<'a> Message<'a> {
    /// Parse raw message text (terminator already removed)
    ///
    /// Surrounding whitespace is trimmed before tokenizing.
    pub fn parse(text: &'a str) -> Self {
        Self::from_tokens(&tokenize(text.trim(), FIELD_DELIMITER))
    }

    /// Build a message from an already tokenized text
    pub fn from_tokens(tokens: &TokenSet<'a>) -> Self {
        let (Some(header), Some(instruction)) = (tokens.get(0), tokens.get(1)) else {
            return Message::Malformed;
        };

        let mut args = Vec::new();
        for arg in tokens.iter().skip(2) {
            // At most TOKEN_CAPACITY - 2 tokens remain
            let _ = args.push(arg);
        }

        Message::Recognized {
            header,
            instruction,
            args,
        }
    }
}

/// Device command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Open a session and name the host program
    HandExtended { program: &'a str },
    /// Ask for the session state
    Status,
    /// Switch the session to color streaming
    ColorBegin,
    /// Well-formed `tcl` message the device has no handler for
    Unrecognized { instruction: &'a str },
}

impl<'a> Command<'a> {
    /// Interpret a parsed message
    ///
    /// Returns `None` for malformed messages and messages with a foreign
    /// header. `handextended` needs exactly one argument; with any other
    /// arity it is reported as [`Command::Unrecognized`].
    pub fn from_message(message: &Message<'a>) -> Option<Self> {
        let Message::Recognized {
            header,
            instruction,
            args,
        } = message
        else {
            return None;
        };

        if *header != HEADER {
            return None;
        }

        Some(match *instruction {
            INSTR_HAND_EXTENDED if args.len() == 1 => Command::HandExtended { program: args[0] },
            INSTR_STATUS => Command::Status,
            INSTR_COLOR_BEGIN => Command::ColorBegin,
            other => Command::Unrecognized { instruction: other },
        })
    }

    /// Parse raw message text straight into a command
    pub fn parse(text: &'a str) -> Option<Self> {
        Self::from_message(&Message::parse(text))
    }

    /// Instruction name as it appears on the wire
    pub fn instruction(&self) -> &'a str {
        match self {
            Command::HandExtended { .. } => INSTR_HAND_EXTENDED,
            Command::Status => INSTR_STATUS,
            Command::ColorBegin => INSTR_COLOR_BEGIN,
            Command::Unrecognized { instruction } => instruction,
        }
    }
}

/// Host-side encoding, terminator included
impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", HEADER, FIELD_DELIMITER, self.instruction())?;
        if let Command::HandExtended { program } = self {
            write!(f, "{}{}", FIELD_DELIMITER, program)?;
        }
        f.write_str("!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_parse_recognized() {
        let msg = Message::parse("tcl:handextended:Py");
        match &msg {
            Message::Recognized {
                header,
                instruction,
                args,
            } => {
                assert_eq!(*header, "tcl");
                assert_eq!(*instruction, "handextended");
                assert_eq!(args.as_slice(), &["Py"]);
            }
            Message::Malformed => panic!("expected recognized message"),
        }
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let msg = Message::parse("\r\n  tcl:status \n");
        assert_eq!(Command::from_message(&msg), Some(Command::Status));
    }

    #[test]
    fn test_single_field_is_malformed() {
        assert_eq!(Message::parse("tcl"), Message::Malformed);
        assert_eq!(Message::parse(""), Message::Malformed);
        assert_eq!(Command::parse("tcl"), None);
    }

    #[test]
    fn test_foreign_header_is_not_a_command() {
        let msg = Message::parse("foo:bar");
        assert!(matches!(msg, Message::Recognized { header: "foo", .. }));
        assert_eq!(Command::from_message(&msg), None);
        assert_eq!(Command::parse("TCL:status"), None);
    }

    #[test]
    fn test_handextended_arity() {
        assert_eq!(
            Command::parse("tcl:handextended:Foo"),
            Some(Command::HandExtended { program: "Foo" })
        );
        assert_eq!(
            Command::parse("tcl:handextended"),
            Some(Command::Unrecognized {
                instruction: "handextended"
            })
        );
        assert_eq!(
            Command::parse("tcl:handextended:a:b"),
            Some(Command::Unrecognized {
                instruction: "handextended"
            })
        );
    }

    #[test]
    fn test_status_ignores_extra_args() {
        assert_eq!(Command::parse("tcl:status:now"), Some(Command::Status));
        assert_eq!(Command::parse("tcl:colorbegin:x"), Some(Command::ColorBegin));
    }

    #[test]
    fn test_unknown_instruction() {
        assert_eq!(
            Command::parse("tcl:handreceived:Py"),
            Some(Command::Unrecognized {
                instruction: "handreceived"
            })
        );
    }

    #[test]
    fn test_command_wire_format() {
        assert_eq!(
            Command::HandExtended { program: "sound2light" }.to_string(),
            "tcl:handextended:sound2light!"
        );
        assert_eq!(Command::Status.to_string(), "tcl:status!");
        assert_eq!(Command::ColorBegin.to_string(), "tcl:colorbegin!");
    }
}
