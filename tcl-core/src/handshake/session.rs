//! Session state shared with the host

use heapless::String;
use tcl_protocol::MAX_MESSAGE_LEN;

/// Program name reported before any handshake
pub const DEFAULT_PROGRAM_NAME: &str = "Unknown";

/// Derived session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No handshake yet
    Disconnected,
    /// Handshake made, text commands only
    Connected,
    /// Host streams color frames
    ReceivingColor,
}

impl SessionState {
    /// Check if commands other than `handextended` are accepted
    pub fn is_connected(&self) -> bool {
        !matches!(self, SessionState::Disconnected)
    }
}

/// What the device knows about its host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandshakeSession {
    program_name: String<MAX_MESSAGE_LEN>,
    handshake_made: bool,
    receiving_color: bool,
}

impl Default for HandshakeSession {
    fn default() -> Self {
        Self::new()
    }
}

impl HandshakeSession {
    /// Fresh session, as after power-on
    pub fn new() -> Self {
        let mut session = Self {
            program_name: String::new(),
            handshake_made: false,
            receiving_color: false,
        };
        session.set_program_name(DEFAULT_PROGRAM_NAME);
        session
    }

    /// Restore the power-on defaults
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Name of the host program
    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Check if a handshake has been made
    pub fn handshake_made(&self) -> bool {
        self.handshake_made
    }

    /// Check if the host streams color frames
    pub fn receiving_color(&self) -> bool {
        self.receiving_color
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        match (self.handshake_made, self.receiving_color) {
            (false, _) => SessionState::Disconnected,
            (true, false) => SessionState::Connected,
            (true, true) => SessionState::ReceivingColor,
        }
    }

    pub(crate) fn connect(&mut self, program: &str) {
        self.handshake_made = true;
        self.set_program_name(program);
    }

    pub(crate) fn begin_color(&mut self) {
        self.receiving_color = true;
    }

    /// Store `name`, cut at a char boundary if it does not fit
    fn set_program_name(&mut self, name: &str) {
        self.program_name.clear();
        for c in name.chars() {
            if self.program_name.push(c).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let session = HandshakeSession::new();
        assert_eq!(session.program_name(), "Unknown");
        assert!(!session.handshake_made());
        assert!(!session.receiving_color());
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[test]
    fn test_state_progression() {
        let mut session = HandshakeSession::new();
        session.connect("Py");
        assert_eq!(session.state(), SessionState::Connected);
        session.begin_color();
        assert_eq!(session.state(), SessionState::ReceivingColor);
        assert!(session.state().is_connected());

        session.reset();
        assert_eq!(session, HandshakeSession::new());
    }

    #[test]
    fn test_long_name_is_cut() {
        let mut session = HandshakeSession::new();
        let bytes = [b'x'; MAX_MESSAGE_LEN + 8];
        session.connect(core::str::from_utf8(&bytes).unwrap());
        assert_eq!(session.program_name().len(), MAX_MESSAGE_LEN);
    }
}
