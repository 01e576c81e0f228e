//! Live calibration from the potentiometer panel
//!
//! Pot 4 picks the channel under calibration; pots 1 to 3 set its gamma,
//! black point and white point. Each tick re-reads the panel and shows a
//! ramp on the selected channel so the operator can judge the result.

use core::fmt::{self, Write};

use heapless::String;
use tcl_hal::{AnalogInput, PixelStrip, Pot};

use crate::color::{CalibrationParameters, Channel, ColorPipeline, MAX_GAMMA};
use crate::patterns;

/// Longest formatted report line, newline included
pub const MAX_REPORT_LEN: usize = 128;

/// Errors that can occur during a calibration tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError<A, S> {
    /// ADC read failed
    Analog(A),
    /// Strip transmit failed
    Strip(S),
}

/// Normalize a raw conversion into `[0, 1]`
pub fn normalize(raw: u16, full_scale: u16) -> f32 {
    if full_scale == 0 {
        return 0.0;
    }
    (f32::from(raw) / f32::from(full_scale)).min(1.0)
}

/// Channel selected by a normalized pot position
///
/// The pot travel is split in three equal bands.
pub fn select_channel(position: f32) -> Channel {
    let band = libm::floorf(3.0 * position);
    if band >= 2.0 {
        Channel::Blue
    } else if band >= 1.0 {
        Channel::Green
    } else {
        Channel::Red
    }
}

/// Operator report for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationReport {
    pub channel: Channel,
    pub params: CalibrationParameters,
}

impl CalibrationReport {
    /// Format the report as a text line
    pub fn encode(&self) -> Result<String<MAX_REPORT_LEN>, fmt::Error> {
        let mut line = String::new();
        writeln!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [g0, g1, g2] = self.params.gammas();
        let [n0, n1, n2] = self.params.mins();
        let [x0, x1, x2] = self.params.maxs();
        write!(f, "Color Channel:\t{}", self.channel.index())?;
        write!(f, " | Gammas:\t{:.2}\t{:.2}\t{:.2}", g0, g1, g2)?;
        write!(f, " | Mins:\t{:.2}\t{:.2}\t{:.2}", n0, n1, n2)?;
        write!(f, " | Maxs:\t{:.2}\t{:.2}\t{:.2}", x0, x1, x2)
    }
}

/// Calibration mode driver
#[derive(Debug, Clone)]
pub struct CalibrationController {
    channel: Channel,
    led_count: usize,
}

impl CalibrationController {
    /// Controller for a strip of `led_count` LEDs
    pub fn new(led_count: usize) -> Self {
        Self {
            channel: Channel::Red,
            led_count,
        }
    }

    /// Channel currently under calibration
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Apply normalized pot positions (pot 1 first) to `pipeline`
    pub fn apply(&mut self, pipeline: &mut ColorPipeline, positions: [f32; 4]) {
        let [gamma, black, white, select] = positions;

        self.channel = select_channel(select);
        let calibration = pipeline.params_mut().get_mut(self.channel);
        calibration.set_min(black);
        calibration.set_max(white);
        calibration.set_gamma(MAX_GAMMA * gamma);
    }

    /// Read the panel, update `pipeline` and render the ramp
    pub fn tick<A, S>(
        &mut self,
        pipeline: &mut ColorPipeline,
        adc: &mut A,
        strip: &mut S,
    ) -> Result<CalibrationReport, CalibrationError<A::Error, S::Error>>
    where
        A: AnalogInput,
        S: PixelStrip,
    {
        let full_scale = adc.full_scale();
        let mut positions = [0.0; 4];
        for pot in Pot::ALL {
            let raw = adc.read_raw(pot).map_err(CalibrationError::Analog)?;
            positions[pot.index()] = normalize(raw, full_scale);
        }

        self.apply(pipeline, positions);

        patterns::calibration_ramp(strip, pipeline, self.channel, self.led_count)
            .map_err(CalibrationError::Strip)?;

        Ok(CalibrationReport {
            channel: self.channel,
            params: *pipeline.params(),
        })
    }
}
