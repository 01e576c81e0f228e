//! TCL strip firmware
//!
//! Drives a Total Control Lighting (P9813) strand from an RP2040 board.
//! In serial mode the host negotiates a session over UART0 and then streams
//! color frames; in calibration mode four potentiometers tune the color
//! correction live.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tcl_core::calibration::CalibrationController;
use tcl_core::color::ColorPipeline;
use tcl_core::config::{parse_config, DeviceConfig, StartupMode};
use tcl_core::dispatcher::{DispatchError, SerialDispatcher};
use tcl_drivers::P9813Strip;
use tcl_hal_rp2040::{PotAdc, SerialPort};

mod modes;

/// Embedded device configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("TCL strip firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Strip lines are board-specific (CLK=GPIO2, DATA=GPIO3)
    let clock = Output::new(p.PIN_2, Level::Low);
    let data = Output::new(p.PIN_3, Level::Low);
    let mut strip = P9813Strip::new(clock, data, Delay).unwrap_or_else(|never| match never {});

    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            modes::fault(&mut strip, DeviceConfig::default().led_count()).await
        }
    };
    info!(
        "Configuration loaded: mode={}, {} LEDs, {} baud",
        config.mode,
        config.led_count(),
        config.serial.baudrate
    );

    let mut pipeline = ColorPipeline::new(config.calibration);

    // Host link on UART0 (TX=GPIO0, RX=GPIO1)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let mut serial = SerialPort::new(uart);
    info!("UART initialized for host communication");

    let dispatcher = match SerialDispatcher::new(config.led_count(), config.serial.read_timeout_ms) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Strip too long for a color frame: {}", e);
            modes::fault(&mut strip, config.led_count()).await
        }
    };

    modes::blank(&mut strip, &pipeline, config.led_count());
    match dispatcher.announce(&mut serial) {
        Ok(()) => {}
        Err(DispatchError::Transport(e)) => warn!("Failed to send ready banner: {}", e),
        Err(_) => error!("Ready banner overflow"),
    }

    match config.mode {
        StartupMode::Serial => {
            info!("Serving host");
            modes::serve(dispatcher, &mut serial, &mut strip, &pipeline).await
        }
        StartupMode::Calibrate => {
            // Pots are board-specific (GPIO26..GPIO29, pot 1 first)
            let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
            let channels = [
                Channel::new_pin(p.PIN_26, Pull::None),
                Channel::new_pin(p.PIN_27, Pull::None),
                Channel::new_pin(p.PIN_28, Pull::None),
                Channel::new_pin(p.PIN_29, Pull::None),
            ];
            let mut pots = PotAdc::new(adc, channels, config.panel.adc_full_scale);
            let controller = CalibrationController::new(config.led_count());

            info!("Calibration mode");
            modes::calibrate(controller, &mut pots, &mut serial, &mut strip, &mut pipeline).await
        }
    }
}
