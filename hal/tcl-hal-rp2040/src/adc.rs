//! Potentiometer panel on the RP2040 ADC
//!
//! The four pots sit on the ADC-capable pins GPIO26 to GPIO29, pot 1 first.

use embassy_rp::adc::{self, Adc, Blocking, Channel};
use tcl_hal::{AnalogInput, Pot};

/// Full scale of the 12-bit converter
pub const ADC_FULL_SCALE: u16 = 4095;

/// Four potentiometers read through the blocking ADC driver
pub struct PotAdc<'d> {
    adc: Adc<'d, Blocking>,
    channels: [Channel<'d>; 4],
    full_scale: u16,
}

impl<'d> PotAdc<'d> {
    /// Create a panel from the ADC and one channel per pot, pot 1 first
    ///
    /// `full_scale` is the reading at the end of pot travel; pots wired to
    /// less than the reference voltage top out below [`ADC_FULL_SCALE`].
    pub fn new(adc: Adc<'d, Blocking>, channels: [Channel<'d>; 4], full_scale: u16) -> Self {
        Self {
            adc,
            channels,
            full_scale,
        }
    }
}

impl AnalogInput for PotAdc<'_> {
    type Error = adc::Error;

    fn read_raw(&mut self, pot: Pot) -> Result<u16, Self::Error> {
        self.adc.blocking_read(&mut self.channels[pot.index()])
    }

    fn full_scale(&self) -> u16 {
        self.full_scale
    }
}
