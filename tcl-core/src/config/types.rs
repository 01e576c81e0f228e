//! Configuration type definitions
//!
//! These types represent the device configuration. The firmware embeds it
//! as `device.toml`, parsed at boot by [`super::toml::parse_config`].

use tcl_protocol::MAX_LEDS;

use crate::color::CalibrationParameters;

/// LEDs on the reference strand
pub const DEFAULT_LED_COUNT: u16 = 50;

/// Full scale of a 10-bit converter
pub const DEFAULT_ADC_FULL_SCALE: u16 = 1023;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// More LEDs than a color frame can carry
    TooManyLeds,
    /// Baud rate of zero
    InvalidBaudrate,
    /// ADC full scale of zero
    InvalidFullScale,
}

/// What the firmware does after boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupMode {
    /// Serve the host over serial
    #[default]
    Serial,
    /// Run the potentiometer calibration loop
    Calibrate,
}

/// LED strip configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripConfig {
    /// Number of LEDs on the strip
    pub led_count: u16,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: DEFAULT_LED_COUNT,
        }
    }
}

/// Host serial link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Per-byte read timeout in milliseconds
    pub read_timeout_ms: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            read_timeout_ms: 100,
        }
    }
}

/// Calibration potentiometer panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Raw reading at the end of pot travel
    pub adc_full_scale: u16,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            adc_full_scale: DEFAULT_ADC_FULL_SCALE,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub mode: StartupMode,
    pub strip: StripConfig,
    pub serial: SerialConfig,
    pub panel: PanelConfig,
    /// Calibration in effect at boot
    pub calibration: CalibrationParameters,
}

impl DeviceConfig {
    /// Check cross-field limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if usize::from(self.strip.led_count) > MAX_LEDS {
            return Err(ConfigError::TooManyLeds);
        }
        if self.serial.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate);
        }
        if self.panel.adc_full_scale == 0 {
            return Err(ConfigError::InvalidFullScale);
        }
        Ok(())
    }

    /// Number of LEDs as a count
    pub fn led_count(&self) -> usize {
        usize::from(self.strip.led_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.led_count(), 50);
        assert_eq!(config.mode, StartupMode::Serial);
        assert_eq!(config.serial.baudrate, 115_200);
        assert_eq!(config.panel.adc_full_scale, 1023);
    }

    #[test]
    fn test_validate_limits() {
        let mut config = DeviceConfig::default();
        config.strip.led_count = 65;
        assert_eq!(config.validate(), Err(ConfigError::TooManyLeds));

        let mut config = DeviceConfig::default();
        config.serial.baudrate = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBaudrate));

        let mut config = DeviceConfig::default();
        config.panel.adc_full_scale = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFullScale));
    }
}
