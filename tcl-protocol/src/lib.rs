//! TCL serial protocol
//!
//! This crate defines the text protocol spoken between a host program and
//! the strip firmware over a plain serial line.
//!
//! # Protocol Overview
//!
//! Host messages are ASCII, at most 64 bytes, fields separated by `:` and
//! terminated by `!`. Device replies are `\n`-terminated lines:
//!
//! ```text
//! host   → tcl:handextended:<name>!
//! device ← tcl:handreceived:<name>\n
//! host   → tcl:status!
//! device ← tcl:handshakeconfirmed:1\n
//! device ← tcl:handshakeprogram: <name>\n
//! host   → tcl:colorbegin!
//! device ← tcl:colorbeginreceived:<name>\n
//! host   → * r g b r g b ...        (raw color frames from here on)
//! ```
//!
//! The device announces itself with `tcl:ready\n` after boot.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod color_frame;
pub mod message;
pub mod reader;
pub mod response;
pub mod tokenizer;

pub use color_frame::{
    encode_frame, sanitize_channel, ColorFrameReader, FrameError, BYTES_PER_PIXEL,
    COLOR_FRAME_MARKER, MAX_LEDS,
};
pub use message::{Command, Message, FIELD_DELIMITER, HEADER};
pub use reader::{MessageReader, ReadError, ReadStatus, MAX_MESSAGE_LEN, MESSAGE_TERMINATOR};
pub use response::{Response, MAX_RESPONSE_LEN};
pub use tokenizer::{tokenize, tokenize_with, OverflowPolicy, TokenSet, TOKEN_CAPACITY};
