//! Color representation and perceptual correction
//!
//! Colors are handled as float triples in perception space, nominally
//! `[0, 1]` per channel. The [`ColorPipeline`] turns them into the 8-bit
//! values the strip expects.

pub mod calibration;
pub mod pipeline;

pub use calibration::{
    CalibrationParameters, Channel, ChannelCalibration, DEFAULT_GAMMA, MAX_BLACK_POINT, MAX_GAMMA,
    MAX_WHITE_POINT, MIN_BLACK_POINT, MIN_GAMMA, MIN_WHITE_POINT,
};
pub use pipeline::{remap, ColorPipeline};

/// Float RGB color
///
/// No range is enforced here; out-of-range values are clamped by the
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);

    /// Create a color from its channels
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }

    /// Color from raw channel bytes, each mapped to `byte / 255`
    pub fn from_bytes(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
        )
    }

    /// Color with only `channel` lit at `intensity`
    pub fn single(channel: Channel, intensity: f32) -> Self {
        let mut color = Self::BLACK;
        *color.channel_mut(channel) = intensity;
        color
    }

    /// Value of one channel
    pub fn channel(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Mutable access to one channel
    pub fn channel_mut(&mut self, channel: Channel) -> &mut f32 {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        }
    }

    /// Multiply every channel by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.red * factor, self.green * factor, self.blue * factor)
    }
}
