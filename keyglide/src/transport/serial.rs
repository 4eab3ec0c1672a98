use embassy_time::{Duration, Timer};
use embedded_io_async::Write;

use super::StatusTransport;
use crate::error::TransportError;

/// Status transport over any serial port implementing `Write` of embedded-io-async,
/// e.g. a UART or a buffered CDC-ACM port.
pub struct SerialTransport<W: Write> {
    serial: W,
    ready: bool,
}

impl<W: Write> SerialTransport<W> {
    pub fn new(serial: W) -> Self {
        Self { serial, ready: false }
    }

    pub fn inner(&self) -> &W {
        &self.serial
    }
}

impl<W: Write> StatusTransport for SerialTransport<W> {
    async fn bring_up(&mut self, warmup: Duration) -> Result<(), TransportError> {
        Timer::after(warmup).await;
        self.ready = true;
        info!("Serial status transport ready");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        if !self.ready {
            return Err(TransportError::NotReady);
        }
        self.serial.write_all(buf).await.map_err(|_e| TransportError::Write)?;
        self.serial.flush().await.map_err(|_e| TransportError::Write)
    }
}
