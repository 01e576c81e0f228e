//! LED strip drivers

pub mod p9813;
