//! Perceptual color correction
//!
//! Per channel: `v' = remap(v, 0, 1, min, max)`, `v'' = v' ^ gamma`,
//! `byte = clamp(round(255 * v''), 0, 255)`.

use smart_leds::RGB8;

use super::calibration::{CalibrationParameters, Channel};
use super::Color;

/// Linear remap of `x` from `[lo_a, hi_a]` onto `[lo_b, hi_b]`
///
/// A zero-width source range maps everything to `lo_b`.
pub fn remap(x: f32, lo_a: f32, hi_a: f32, lo_b: f32, hi_b: f32) -> f32 {
    if hi_a == lo_a {
        return lo_b;
    }
    lo_b + (hi_b - lo_b) * (x - lo_a) / (hi_a - lo_a)
}

/// Gamma-correcting color pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorPipeline {
    params: CalibrationParameters,
}

impl ColorPipeline {
    /// Create a pipeline with the given calibration
    pub const fn new(params: CalibrationParameters) -> Self {
        Self { params }
    }

    /// Current calibration
    pub fn params(&self) -> &CalibrationParameters {
        &self.params
    }

    /// Mutable calibration
    pub fn params_mut(&mut self) -> &mut CalibrationParameters {
        &mut self.params
    }

    /// Correct a single channel value
    pub fn correct_channel(&self, channel: Channel, value: f32) -> u8 {
        let cal = self.params.get(channel);

        let remapped = remap(value, 0.0, 1.0, cal.min(), cal.max());
        // powf of a negative base is NaN
        let remapped = if remapped.is_nan() || remapped < 0.0 {
            0.0
        } else {
            remapped
        };

        let scaled = libm::roundf(255.0 * libm::powf(remapped, cal.gamma()));
        scaled.clamp(0.0, 255.0) as u8
    }

    /// Correct a color into strip bytes
    pub fn correct(&self, color: Color) -> RGB8 {
        RGB8::new(
            self.correct_channel(Channel::Red, color.red),
            self.correct_channel(Channel::Green, color.green),
            self.correct_channel(Channel::Blue, color.blue),
        )
    }
}
