//! Host handshake
//!
//! A host must introduce itself with `handextended` before it may ask for
//! status or start streaming colors.

pub mod protocol;
pub mod session;

pub use protocol::{HandshakeProtocol, Reply, Responses, MAX_RESPONSES};
pub use session::{HandshakeSession, SessionState, DEFAULT_PROGRAM_NAME};
