//! RP2040-specific HAL for the TCL strip firmware
//!
//! This crate provides RP2040 implementations of the shared `tcl-hal`
//! traits:
//!
//! - Serial port with per-byte read timeouts (implements `tcl_hal::Uart`)
//! - Potentiometer panel on the ADC inputs (implements `tcl_hal::AnalogInput`)

#![no_std]

pub mod adc;
pub mod uart;

pub use adc::{PotAdc, ADC_FULL_SCALE};
pub use uart::SerialPort;

// Re-export shared traits from tcl-hal for convenience
pub use tcl_hal::{AnalogInput, Pot, Uart, UartRx, UartTx};
