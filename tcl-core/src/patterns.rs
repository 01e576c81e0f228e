//! Strip frames rendered by the firmware itself
//!
//! Every frame is a frame-start marker followed by one corrected pixel per
//! LED.

use tcl_hal::PixelStrip;

use crate::color::{Channel, Color, ColorPipeline};

/// LEDs per step of the calibration ramp
pub const RAMP_LENGTH: usize = 10;

/// Correct and transmit one frame
pub fn render<S, I>(strip: &mut S, pipeline: &ColorPipeline, colors: I) -> Result<(), S::Error>
where
    S: PixelStrip,
    I: IntoIterator<Item = Color>,
{
    strip.send_frame_start()?;
    for color in colors {
        let rgb = pipeline.correct(color);
        strip.send_pixel(rgb.r, rgb.g, rgb.b)?;
    }
    Ok(())
}

/// Color of LED `index` in the calibration ramp
///
/// The ramp repeats every [`RAMP_LENGTH`] LEDs, climbing from off to full
/// intensity on `channel` only.
pub fn ramp_color(channel: Channel, index: usize) -> Color {
    let step = index % RAMP_LENGTH;
    Color::single(channel, step as f32 / (RAMP_LENGTH - 1) as f32)
}

/// Render the calibration ramp for `channel`
pub fn calibration_ramp<S: PixelStrip>(
    strip: &mut S,
    pipeline: &ColorPipeline,
    channel: Channel,
    led_count: usize,
) -> Result<(), S::Error> {
    render(
        strip,
        pipeline,
        (0..led_count).map(|index| ramp_color(channel, index)),
    )
}

/// Turn every LED off
pub fn flush<S: PixelStrip>(
    strip: &mut S,
    pipeline: &ColorPipeline,
    led_count: usize,
) -> Result<(), S::Error> {
    render(
        strip,
        pipeline,
        core::iter::repeat(Color::BLACK).take(led_count),
    )
}

/// Brightness of the error pulse at `now_ms`
///
/// `(0.4 * sin(2t / 500) + 0.6) ^ 10`, a sharp red throb roughly every
/// 1.6 seconds.
pub fn error_intensity(now_ms: u64) -> f32 {
    // Phase is reduced in f64 so millisecond steps survive long uptimes
    let phase = libm::fmod(2.0 * now_ms as f64 / 500.0, core::f64::consts::TAU);
    libm::powf(0.4 * libm::sin(phase) as f32 + 0.6, 10.0)
}

/// Render one frame of the red error pulse
pub fn error_pulse<S: PixelStrip>(
    strip: &mut S,
    pipeline: &ColorPipeline,
    led_count: usize,
    now_ms: u64,
) -> Result<(), S::Error> {
    let color = Color::RED.scaled(error_intensity(now_ms));
    render(strip, pipeline, core::iter::repeat(color).take(led_count))
}
