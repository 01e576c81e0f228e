//! Simple TOML parser for device configuration
//!
//! This is a minimal, allocation-free parser that handles only the subset
//! needed for `device.toml`. It is NOT a general TOML parser.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] and [section.subsection] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys outside section headers

use crate::color::{CalibrationParameters, Channel, ChannelCalibration};

use super::types::{ConfigError, DeviceConfig, StartupMode};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range for its field
    InvalidValue,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Parsed configuration failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Strip,
    Serial,
    Panel,
    /// `None` applies to every channel
    Calibration(Option<Channel>),
}

/// Parse TOML configuration into a validated DeviceConfig
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

/// Remove a trailing comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(hash_pos) if line[..hash_pos].matches('"').count() % 2 == 0 => &line[..hash_pos],
        _ => line,
    }
}

/// Parse section header like "strip" or "calibration.red"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();
    let (name, sub) = match header.split_once('.') {
        Some((name, sub)) => (name.trim(), Some(sub.trim())),
        None => (header, None),
    };

    match (name, sub) {
        ("strip", None) => Ok(Section::Strip),
        ("serial", None) => Ok(Section::Serial),
        ("panel", None) => Ok(Section::Panel),
        ("calibration", None) => Ok(Section::Calibration(None)),
        ("calibration", Some(channel)) => {
            Ok(Section::Calibration(Some(parse_channel(channel)?)))
        }
        _ => Err(ParseError::InvalidSection),
    }
}

fn parse_channel(name: &str) -> Result<Channel, ParseError> {
    match name {
        "red" | "r" => Ok(Channel::Red),
        "green" | "g" => Ok(Channel::Green),
        "blue" | "b" => Ok(Channel::Blue),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, `_` separators allowed
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a float value (integers accepted)
fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_mode(value: &str) -> Result<StartupMode, ParseError> {
    match parse_string(value) {
        "serial" => Ok(StartupMode::Serial),
        "calibrate" | "calibration" => Ok(StartupMode::Calibrate),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply one calibration key to every selected channel
fn apply_calibration(
    params: &mut CalibrationParameters,
    channel: Option<Channel>,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let setter: fn(&mut ChannelCalibration, f32) = match key {
        "min" | "black_point" => ChannelCalibration::set_min,
        "max" | "white_point" => ChannelCalibration::set_max,
        "gamma" => ChannelCalibration::set_gamma,
        _ => return Ok(()), // Ignore unknown keys
    };
    let value = parse_float(value)?;

    match channel {
        Some(channel) => setter(params.get_mut(channel), value),
        None => {
            for channel in Channel::ALL {
                setter(params.get_mut(channel), value);
            }
        }
    }
    Ok(())
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "mode" {
                config.mode = parse_mode(value)?;
            }
        }
        Section::Strip => {
            if key == "led_count" {
                config.strip.led_count = parse_int(value)?;
            }
        }
        Section::Serial => match key {
            "baudrate" | "baud" => config.serial.baudrate = parse_int(value)?,
            "read_timeout_ms" | "timeout_ms" => config.serial.read_timeout_ms = parse_int(value)?,
            _ => {}
        },
        Section::Panel => {
            if key == "adc_full_scale" || key == "adc_max" {
                config.panel.adc_full_scale = parse_int(value)?;
            }
        }
        Section::Calibration(channel) => {
            apply_calibration(&mut config.calibration, channel, key, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("led_count = 50"), Some(("led_count", "50")));
        assert_eq!(
            parse_key_value("mode = \"calibrate\""),
            Some(("mode", "\"calibrate\""))
        );
        assert_eq!(parse_key_value("= 3"), None);
        assert_eq!(parse_key_value("novalue"), None);
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a = 1 # note"), "a = 1 ");
        assert_eq!(strip_comment("a = \"#1\""), "a = \"#1\"");
        assert_eq!(strip_comment("# whole line"), "");
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("strip"), Ok(Section::Strip));
        assert_eq!(
            parse_section_header("calibration"),
            Ok(Section::Calibration(None))
        );
        assert_eq!(
            parse_section_header("calibration.blue"),
            Ok(Section::Calibration(Some(Channel::Blue)))
        );
        assert_eq!(
            parse_section_header("calibration.alpha"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(parse_section_header("motor"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int::<u32>("115_200"), Ok(115_200));
        assert_eq!(parse_int::<u16>("70000"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config(""), Ok(DeviceConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# TCL strand on the living room shelf
mode = "calibrate"

[strip]
led_count = 25

[serial]
baudrate = 57_600
read_timeout_ms = 250   # slow host

[panel]
adc_full_scale = 4095

[calibration]
gamma = 2.2

[calibration.red]
min = 0.1
max = 0.9
gamma = 3
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.mode, StartupMode::Calibrate);
        assert_eq!(config.led_count(), 25);
        assert_eq!(config.serial.baudrate, 57_600);
        assert_eq!(config.serial.read_timeout_ms, 250);
        assert_eq!(config.panel.adc_full_scale, 4095);
        assert_eq!(config.calibration.gammas(), [3.0, 2.2, 2.2]);
        assert_eq!(config.calibration.mins(), [0.1, 0.0, 0.0]);
        assert_eq!(config.calibration.maxs(), [0.9, 1.0, 1.0]);
    }

    #[test]
    fn test_calibration_values_are_clamped() {
        let config = parse_config("[calibration.green]\ngamma = 40\nmin = 0.8\n").unwrap();
        let green = config.calibration.get(Channel::Green);
        assert_eq!(green.gamma(), 10.0);
        assert_eq!(green.min(), 0.5);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = parse_config("[strip]\ncolor_order = \"rgb\"\nled_count = 10\n").unwrap();
        assert_eq!(config.led_count(), 10);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_config("[strip]\nled_count = many\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_config("mode = \"party\"\n"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[wifi]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("led_count 50\n"), Err(ParseError::InvalidLine));
        assert_eq!(
            parse_config("[strip]\nled_count = 100\n"),
            Err(ParseError::Invalid(ConfigError::TooManyLeds))
        );
    }
}
