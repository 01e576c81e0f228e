//! Handshake state machine
//!
//! Text commands move the session forward and produce acknowledgments.
//! There is no way back short of a full reset.
//!
//! Handling is split in two steps: [`HandshakeProtocol::apply`] mutates the
//! session and returns the [`Reply`] owed, [`HandshakeProtocol::responses`]
//! renders that reply against the session.

use heapless::Vec;
use tcl_protocol::{Command, Message, Response};

use super::session::{HandshakeSession, SessionState};

/// Most responses a single command produces
pub const MAX_RESPONSES: usize = 2;

/// Responses to one command, in send order
pub type Responses<'a> = Vec<Response<'a>, MAX_RESPONSES>;

/// Acknowledgment owed for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Command ignored, nothing to send
    Silent,
    /// `handreceived`
    HandReceived,
    /// `handshakeconfirmed` then `handshakeprogram`
    Status,
    /// `colorbeginreceived`
    ColorBeginReceived,
}

/// Interprets host commands against a [`HandshakeSession`]
#[derive(Debug, Clone, Default)]
pub struct HandshakeProtocol {
    session: HandshakeSession,
}

impl HandshakeProtocol {
    /// Protocol with a fresh session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session
    pub fn session(&self) -> &HandshakeSession {
        &self.session
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Forget the host (full device reset)
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Apply a structurally parsed message
    ///
    /// Malformed messages and foreign headers are ignored.
    pub fn apply_message(&mut self, message: &Message<'_>) -> Reply {
        match Command::from_message(message) {
            Some(command) => self.apply(command),
            None => Reply::Silent,
        }
    }

    /// Apply one command
    ///
    /// Everything but `handextended` is ignored until a handshake is made.
    pub fn apply(&mut self, command: Command<'_>) -> Reply {
        use SessionState::*;

        match (self.session.state(), command) {
            (_, Command::HandExtended { program }) => {
                self.session.connect(program);
                Reply::HandReceived
            }
            (Connected | ReceivingColor, Command::Status) => Reply::Status,
            (Connected | ReceivingColor, Command::ColorBegin) => {
                self.session.begin_color();
                Reply::ColorBeginReceived
            }
            _ => Reply::Silent,
        }
    }

    /// Response lines for `reply`, in send order
    pub fn responses(&self, reply: Reply) -> Responses<'_> {
        let program = self.session.program_name();
        let mut responses = Vec::new();
        // At most MAX_RESPONSES pushes per arm
        match reply {
            Reply::Silent => {}
            Reply::HandReceived => {
                let _ = responses.push(Response::HandReceived { program });
            }
            Reply::Status => {
                let _ = responses.push(Response::HandshakeConfirmed {
                    made: self.session.handshake_made(),
                });
                let _ = responses.push(Response::HandshakeProgram { program });
            }
            Reply::ColorBeginReceived => {
                let _ = responses.push(Response::ColorBeginReceived { program });
            }
        }
        responses
    }
}
