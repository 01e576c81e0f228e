//! Potentiometer calibration mode

use defmt::*;
use embassy_time::{Duration, Ticker};
use tcl_core::calibration::{CalibrationController, CalibrationError};
use tcl_core::color::ColorPipeline;
use tcl_hal::{AnalogInput, PixelStrip, UartTx};

/// Panel sampling period
const CALIBRATION_PERIOD_MS: u64 = 50;

/// Track the pots until reset, reporting each tick over serial
pub async fn calibrate<A, T, S>(
    mut controller: CalibrationController,
    adc: &mut A,
    uart: &mut T,
    strip: &mut S,
    pipeline: &mut ColorPipeline,
) -> !
where
    A: AnalogInput,
    A::Error: Format,
    T: UartTx,
    T::Error: Format,
    S: PixelStrip,
    S::Error: core::fmt::Debug,
{
    let mut ticker = Ticker::every(Duration::from_millis(CALIBRATION_PERIOD_MS));

    loop {
        ticker.next().await;

        let report = match controller.tick(pipeline, adc, strip) {
            Ok(report) => report,
            Err(CalibrationError::Analog(e)) => {
                warn!("ADC read failed: {}", e);
                continue;
            }
            Err(CalibrationError::Strip(e)) => {
                warn!("Strip write failed: {}", Debug2Format(&e));
                continue;
            }
        };

        let Ok(line) = report.encode() else {
            error!("Report line overflow");
            continue;
        };
        trace!("{=str}", line.as_str());
        if let Err(e) = uart.write_blocking(line.as_bytes()) {
            warn!("Serial error: {}", e);
        }
    }
}
