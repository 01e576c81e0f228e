//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in tcl-hal for the strip hardware:
//!
//! - P9813 (Total Control Lighting) pixel strip, bit-banged over two GPIOs

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod strip;

pub use strip::p9813::{flag_byte, P9813Strip, FRAME_START_BITS};
