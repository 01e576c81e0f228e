//! TCL strip hardware abstraction layer
//!
//! This crate defines the narrow hardware contracts the firmware core is
//! written against. Chip-specific crates (`tcl-hal-rp2040`) and drivers
//! (`tcl-drivers`) implement them; host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tcl-firmware)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tcl-core (dispatcher, calibration)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tcl-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tcl-hal-      │       │ tcl-drivers   │
//! │    rp2040     │       │   (P9813)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial byte transport
//! - [`analog::AnalogInput`] - Calibration potentiometers
//! - [`strip::PixelStrip`] - LED strip transmission primitives

#![no_std]
#![deny(unsafe_code)]

pub mod analog;
pub mod strip;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use analog::{AnalogInput, Pot};
pub use strip::PixelStrip;
pub use uart::{Uart, UartRx, UartTx};
