//! Build script for tcl-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pixels a single color frame can carry
const MAX_LEDS: i64 = 64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a device.toml configuration file.           ║\n\
            ║  Please create one in the tcl-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_sections(&config);
    validate_values(&config);
    validate_calibration(&config);

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a boxed list of errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// The firmware parser rejects unknown sections
fn validate_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(table) = config.as_table() {
        for (name, value) in table {
            match (name.as_str(), value) {
                ("mode", _) => {}
                ("strip" | "serial" | "panel", toml::Value::Table(_)) => {}
                ("calibration", toml::Value::Table(cal)) => {
                    for (key, value) in cal {
                        if value.is_table() && !["red", "green", "blue", "r", "g", "b"].contains(&key.as_str()) {
                            errors.push(format!("[calibration.{}] is not a channel", key));
                        }
                    }
                }
                (name, toml::Value::Table(_)) => {
                    errors.push(format!("Unknown section [{}]", name));
                }
                _ => {}
            }
        }
    }

    report("Invalid sections in device.toml", &errors);
}

/// Validate strip, serial and panel values
fn validate_values(config: &toml::Value) {
    let mut errors = Vec::new();

    if let Some(mode) = config.get("mode") {
        match mode.as_str() {
            Some("serial" | "calibrate" | "calibration") => {}
            _ => errors.push("mode must be 'serial' or 'calibrate'".to_string()),
        }
    }

    match config.get("strip").and_then(|s| s.get("led_count")) {
        Some(toml::Value::Integer(count)) if (0..=MAX_LEDS).contains(count) => {}
        Some(_) => errors.push(format!("[strip] led_count must be 0-{}", MAX_LEDS)),
        None => {}
    }

    let serial = config.get("serial");
    match serial.and_then(|s| s.get("baudrate").or_else(|| s.get("baud"))) {
        Some(toml::Value::Integer(baud)) if *baud > 0 && *baud <= i64::from(u32::MAX) => {}
        Some(_) => errors.push("[serial] baudrate must be a positive integer".to_string()),
        None => {}
    }
    match serial.and_then(|s| s.get("read_timeout_ms").or_else(|| s.get("timeout_ms"))) {
        Some(toml::Value::Integer(ms)) if *ms >= 0 && *ms <= i64::from(u32::MAX) => {}
        Some(_) => errors.push("[serial] read_timeout_ms must be a non-negative integer".to_string()),
        None => {}
    }

    let panel = config.get("panel");
    match panel.and_then(|p| p.get("adc_full_scale").or_else(|| p.get("adc_max"))) {
        Some(toml::Value::Integer(max)) if *max > 0 && *max <= i64::from(u16::MAX) => {}
        Some(_) => errors.push("[panel] adc_full_scale must be 1-65535".to_string()),
        None => {}
    }

    report("Invalid values in device.toml", &errors);
}

/// Calibration values must be numbers; out of range values are clamped
fn validate_calibration(config: &toml::Value) {
    let calibration = match config.get("calibration") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();
    let mut check = |section: &str, table: &toml::map::Map<String, toml::Value>| {
        for (key, value) in table {
            if value.is_table() {
                continue;
            }
            let known = ["min", "max", "gamma", "black_point", "white_point"].contains(&key.as_str());
            if known && !(value.is_float() || value.is_integer()) {
                errors.push(format!("[{}] {} must be a number", section, key));
            }
        }
    };

    check("calibration", calibration);
    for (channel, value) in calibration {
        if let toml::Value::Table(t) = value {
            check(&format!("calibration.{}", channel), t);
        }
    }

    report("Invalid calibration in device.toml", &errors);
}
