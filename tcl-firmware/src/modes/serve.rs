//! Host-driven mode

use defmt::*;
use embassy_futures::yield_now;
use tcl_core::color::ColorPipeline;
use tcl_core::dispatcher::{Cycle, DispatchError, SerialDispatcher};
use tcl_hal::{PixelStrip, Uart, UartTx};

/// Serve the host until reset
pub async fn serve<T, S>(
    mut dispatcher: SerialDispatcher,
    uart: &mut T,
    strip: &mut S,
    pipeline: &ColorPipeline,
) -> !
where
    T: Uart,
    <T as UartTx>::Error: Format,
    S: PixelStrip,
    S::Error: core::fmt::Debug,
{
    loop {
        match dispatcher.pump(uart, strip, pipeline) {
            Ok(Cycle::Idle) | Ok(Cycle::Frame) => {}
            Ok(Cycle::Message { responses, state }) => {
                debug!("Message handled: {} responses, session {}", responses, state);
            }
            Ok(Cycle::FrameDropped { received }) => {
                warn!("Color frame timed out after {} bytes", received);
            }
            Err(DispatchError::Transport(e)) => warn!("Serial error: {}", e),
            Err(DispatchError::Strip(e)) => warn!("Strip write failed: {}", Debug2Format(&e)),
            Err(DispatchError::Encode) => error!("Response line overflow"),
        }

        yield_now().await;
    }
}
