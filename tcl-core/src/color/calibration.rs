//! Per-channel calibration parameters
//!
//! Every setter clamps into the allowed range, so a stored value is always
//! valid no matter what the potentiometers or the config file said.

/// Lowest black point
pub const MIN_BLACK_POINT: f32 = 0.0;
/// Highest black point
pub const MAX_BLACK_POINT: f32 = 0.5;
/// Lowest white point
pub const MIN_WHITE_POINT: f32 = 0.5;
/// Highest white point
pub const MAX_WHITE_POINT: f32 = 1.0;
/// Lowest gamma
pub const MIN_GAMMA: f32 = 1.0;
/// Highest gamma
pub const MAX_GAMMA: f32 = 10.0;
/// Gamma measured for the TCL strand
pub const DEFAULT_GAMMA: f32 = 3.6;

/// Color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in wire order
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Zero-based index (red = 0)
    pub const fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Channel for an index, `None` when out of range
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Channel::Red),
            1 => Some(Channel::Green),
            2 => Some(Channel::Blue),
            _ => None,
        }
    }
}

/// Clamp that maps NaN to the lower bound
fn clamp(value: f32, low: f32, high: f32) -> f32 {
    if value.is_nan() {
        low
    } else {
        value.clamp(low, high)
    }
}

/// Calibration of a single channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelCalibration {
    min: f32,
    max: f32,
    gamma: f32,
}

impl Default for ChannelCalibration {
    fn default() -> Self {
        Self {
            min: MIN_BLACK_POINT,
            max: MAX_WHITE_POINT,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl ChannelCalibration {
    /// Create a calibration, clamping every value into range
    pub fn new(min: f32, max: f32, gamma: f32) -> Self {
        let mut calibration = Self::default();
        calibration.set_min(min);
        calibration.set_max(max);
        calibration.set_gamma(gamma);
        calibration
    }

    /// Black point
    pub fn min(&self) -> f32 {
        self.min
    }

    /// White point
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Gamma exponent
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Set the black point, clamped to `[0, 0.5]`
    pub fn set_min(&mut self, min: f32) {
        self.min = clamp(min, MIN_BLACK_POINT, MAX_BLACK_POINT);
    }

    /// Set the white point, clamped to `[0.5, 1]`
    pub fn set_max(&mut self, max: f32) {
        self.max = clamp(max, MIN_WHITE_POINT, MAX_WHITE_POINT);
    }

    /// Set the gamma, clamped to `[1, 10]`
    pub fn set_gamma(&mut self, gamma: f32) {
        self.gamma = clamp(gamma, MIN_GAMMA, MAX_GAMMA);
    }
}

/// Calibration of all three channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationParameters {
    channels: [ChannelCalibration; 3],
}

impl CalibrationParameters {
    /// Same calibration on every channel
    pub const fn uniform(calibration: ChannelCalibration) -> Self {
        Self {
            channels: [calibration; 3],
        }
    }

    /// Calibration of one channel
    pub fn get(&self, channel: Channel) -> &ChannelCalibration {
        &self.channels[channel.index()]
    }

    /// Mutable calibration of one channel
    pub fn get_mut(&mut self, channel: Channel) -> &mut ChannelCalibration {
        &mut self.channels[channel.index()]
    }

    /// Replace the calibration of one channel
    pub fn set(&mut self, channel: Channel, calibration: ChannelCalibration) {
        self.channels[channel.index()] = calibration;
    }

    /// Gammas in channel order
    pub fn gammas(&self) -> [f32; 3] {
        self.channels.map(|c| c.gamma)
    }

    /// Black points in channel order
    pub fn mins(&self) -> [f32; 3] {
        self.channels.map(|c| c.min)
    }

    /// White points in channel order
    pub fn maxs(&self) -> [f32; 3] {
        self.channels.map(|c| c.max)
    }
}
