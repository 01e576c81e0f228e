//! Configuration types
//!
//! Board-agnostic configuration structures and the TOML parser that fills
//! them.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
