//! Board-agnostic core logic for the TCL strip firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Color correction pipeline and its calibration parameters
//! - Potentiometer calibration mode
//! - Host handshake state machine
//! - Serial dispatcher (one command cycle per call)
//! - Built-in strip patterns (calibration ramp, flush, error pulse)
//! - Configuration type definitions and parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod calibration;
pub mod color;
pub mod config;
pub mod dispatcher;
pub mod handshake;
pub mod patterns;
