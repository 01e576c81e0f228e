//! P9813 pixel strip (Total Control Lighting)
//!
//! Two-wire synchronous protocol, data latched on the rising clock edge,
//! MSB first:
//! - Frame start: 32 zero bits
//! - Per pixel: flag byte, blue, green, red
//!
//! The flag byte is `0b11` followed by the inverted top two bits of blue,
//! green and red, which the chip uses as a checksum.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use tcl_hal::PixelStrip;

/// Zero bits that open a frame
pub const FRAME_START_BITS: usize = 32;

/// Half clock period giving a 1 MHz bit clock
pub const DEFAULT_HALF_PERIOD_NS: u32 = 500;

/// Flag byte for a pixel
pub const fn flag_byte(red: u8, green: u8, blue: u8) -> u8 {
    0xC0 | ((!blue & 0xC0) >> 2) | ((!green & 0xC0) >> 4) | ((!red & 0xC0) >> 6)
}

/// Bit-banged P9813 strip
///
/// Both pins must share an error type; on most HALs it is `Infallible`.
pub struct P9813Strip<C, D, T> {
    clock: C,
    data: D,
    delay: T,
    half_period_ns: u32,
}

impl<C, D, T> P9813Strip<C, D, T>
where
    C: OutputPin,
    D: OutputPin<Error = C::Error>,
    T: DelayNs,
{
    /// Create a new strip driver, driving both lines low
    pub fn new(mut clock: C, mut data: D, delay: T) -> Result<Self, C::Error> {
        clock.set_low()?;
        data.set_low()?;
        Ok(Self {
            clock,
            data,
            delay,
            half_period_ns: DEFAULT_HALF_PERIOD_NS,
        })
    }

    /// Use a different half clock period
    pub fn with_half_period(mut self, half_period_ns: u32) -> Self {
        self.half_period_ns = half_period_ns;
        self
    }

    /// Give the pins and delay back
    pub fn release(self) -> (C, D, T) {
        (self.clock, self.data, self.delay)
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), C::Error> {
        self.clock.set_low()?;
        self.data.set_state(PinState::from(bit))?;
        self.delay.delay_ns(self.half_period_ns);
        self.clock.set_high()?;
        self.delay.delay_ns(self.half_period_ns);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), C::Error> {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 == 1)?;
        }
        Ok(())
    }
}

impl<C, D, T> PixelStrip for P9813Strip<C, D, T>
where
    C: OutputPin,
    D: OutputPin<Error = C::Error>,
    T: DelayNs,
{
    type Error = C::Error;

    fn send_frame_start(&mut self) -> Result<(), Self::Error> {
        for _ in 0..FRAME_START_BITS / 8 {
            self.write_byte(0)?;
        }
        Ok(())
    }

    fn send_pixel(&mut self, red: u8, green: u8, blue: u8) -> Result<(), Self::Error> {
        self.write_byte(flag_byte(red, green, blue))?;
        self.write_byte(blue)?;
        self.write_byte(green)?;
        self.write_byte(red)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::vec::Vec;

    /// Shared bus recording the bits latched on each rising clock edge
    #[derive(Default)]
    struct Bus {
        clock: bool,
        data: bool,
        bits: Vec<bool>,
    }

    struct ClockPin<'a>(&'a RefCell<Bus>);
    struct DataPin<'a>(&'a RefCell<Bus>);

    impl ErrorType for ClockPin<'_> {
        type Error = Infallible;
    }

    impl ErrorType for DataPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for ClockPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().clock = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            let mut bus = self.0.borrow_mut();
            if !bus.clock {
                let bit = bus.data;
                bus.bits.push(bit);
            }
            bus.clock = true;
            Ok(())
        }
    }

    impl OutputPin for DataPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().data = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().data = true;
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn bytes(bits: &[bool]) -> Vec<u8> {
        bits.chunks(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
            .collect()
    }

    #[test]
    fn test_flag_byte() {
        assert_eq!(flag_byte(0, 0, 0), 0xFF);
        assert_eq!(flag_byte(255, 255, 255), 0xC0);
        // Red top bits set: only the red checksum bits clear
        assert_eq!(flag_byte(0xC0, 0, 0), 0xFC);
        assert_eq!(flag_byte(0, 0, 0x80), 0xDF);
    }

    #[test]
    fn test_frame_start_is_32_zero_bits() {
        let bus = RefCell::new(Bus::default());
        let mut strip = P9813Strip::new(ClockPin(&bus), DataPin(&bus), NoDelay).unwrap();

        strip.send_frame_start().unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.bits.len(), FRAME_START_BITS);
        assert!(bus.bits.iter().all(|&bit| !bit));
    }

    #[test]
    fn test_pixel_byte_order() {
        let bus = RefCell::new(Bus::default());
        let mut strip = P9813Strip::new(ClockPin(&bus), DataPin(&bus), NoDelay).unwrap();

        strip.send_pixel(0x12, 0x34, 0xF6).unwrap();

        let sent = bytes(&bus.borrow().bits);
        assert_eq!(sent, [flag_byte(0x12, 0x34, 0xF6), 0xF6, 0x34, 0x12]);
    }

    #[test]
    fn test_full_frame() {
        let bus = RefCell::new(Bus::default());
        let mut strip = P9813Strip::new(ClockPin(&bus), DataPin(&bus), NoDelay)
            .unwrap()
            .with_half_period(100);

        strip.send_frame_start().unwrap();
        strip.send_pixel(255, 0, 0).unwrap();
        strip.send_pixel(0, 0, 255).unwrap();

        let sent = bytes(&bus.borrow().bits);
        assert_eq!(
            sent,
            [0, 0, 0, 0, 0xFC, 0, 0, 255, 0xCF, 255, 0, 0]
        );
    }

    #[test]
    fn test_release_returns_parts() {
        let bus = RefCell::new(Bus::default());
        let strip = P9813Strip::new(ClockPin(&bus), DataPin(&bus), NoDelay).unwrap();
        let (_clock, _data, _delay) = strip.release();
        assert!(bus.borrow().bits.is_empty());
    }
}
