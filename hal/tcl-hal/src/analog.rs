//! Analog input abstractions
//!
//! The calibration panel carries four potentiometers, numbered from the
//! bottom-left one counter-clockwise.

/// Calibration potentiometer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pot {
    /// Bottom-left potentiometer (gamma)
    One,
    /// Second potentiometer (black point)
    Two,
    /// Third potentiometer (white point)
    Three,
    /// Fourth potentiometer (channel select)
    Four,
}

impl Pot {
    /// All potentiometers in panel order
    pub const ALL: [Pot; 4] = [Pot::One, Pot::Two, Pot::Three, Pot::Four];

    /// Zero-based panel index
    pub const fn index(self) -> usize {
        match self {
            Pot::One => 0,
            Pot::Two => 1,
            Pot::Three => 2,
            Pot::Four => 3,
        }
    }
}

/// Raw analog input reader
///
/// Takes `&mut self` because ADC conversions typically need exclusive
/// access to the converter.
pub trait AnalogInput {
    /// Error type for conversions
    type Error;

    /// Read the raw conversion result for a potentiometer
    ///
    /// Values are in `0..=full_scale()`. Implementations may return larger
    /// values on noisy hardware; callers clamp.
    fn read_raw(&mut self, pot: Pot) -> Result<u16, Self::Error>;

    /// Largest value `read_raw` produces
    fn full_scale(&self) -> u16;
}
