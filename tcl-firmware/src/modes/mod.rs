//! Run loops for each startup mode

mod calibrate;
mod serve;

pub use calibrate::calibrate;
pub use serve::serve;

use defmt::*;
use embassy_time::{Instant, Timer};
use tcl_core::color::ColorPipeline;
use tcl_core::patterns;
use tcl_hal::PixelStrip;

/// Error pulse refresh period
const FAULT_REFRESH_MS: u64 = 20;

/// Turn every LED off
pub fn blank<S>(strip: &mut S, pipeline: &ColorPipeline, led_count: usize)
where
    S: PixelStrip,
    S::Error: core::fmt::Debug,
{
    if let Err(e) = patterns::flush(strip, pipeline, led_count) {
        warn!("Strip flush failed: {}", Debug2Format(&e));
    }
}

/// Pulse the strip red forever
pub async fn fault<S>(strip: &mut S, led_count: usize) -> !
where
    S: PixelStrip,
    S::Error: core::fmt::Debug,
{
    let pipeline = ColorPipeline::default();
    loop {
        let now_ms = Instant::now().as_millis();
        if let Err(e) = patterns::error_pulse(strip, &pipeline, led_count, now_ms) {
            warn!("Strip write failed: {}", Debug2Format(&e));
        }
        Timer::after_millis(FAULT_REFRESH_MS).await;
    }
}
