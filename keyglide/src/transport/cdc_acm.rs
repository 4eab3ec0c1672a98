use embassy_time::{Duration, Timer};
use embassy_usb::class::cdc_acm::Sender;
use embassy_usb::driver::Driver;

use super::StatusTransport;
use crate::error::TransportError;

/// Status transport over the sending half of a USB CDC-ACM class.
///
/// The USB device itself is built and run by the host firmware, this only
/// writes packets to the class endpoint.
pub struct CdcAcmTransport<'d, D: Driver<'d>> {
    sender: Sender<'d, D>,
    ready: bool,
}

impl<'d, D: Driver<'d>> CdcAcmTransport<'d, D> {
    pub fn new(sender: Sender<'d, D>) -> Self {
        Self { sender, ready: false }
    }
}

impl<'d, D: Driver<'d>> StatusTransport for CdcAcmTransport<'d, D> {
    async fn bring_up(&mut self, warmup: Duration) -> Result<(), TransportError> {
        self.sender.wait_connection().await;
        Timer::after(warmup).await;
        self.ready = true;
        info!("CDC-ACM status transport ready");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        if !self.ready {
            return Err(TransportError::NotReady);
        }
        let max_packet_size = (self.sender.max_packet_size() as usize).max(1);
        for packet in buf.chunks(max_packet_size) {
            if self.sender.write_packet(packet).await.is_err() {
                // Host closed the port, wait for the next bring-up
                self.ready = false;
                return Err(TransportError::Write);
            }
        }
        // A full last packet doesn't end the transfer, terminate it with a zero-length packet
        if !buf.is_empty() && buf.len() % max_packet_size == 0 && self.sender.write_packet(&[]).await.is_err() {
            self.ready = false;
            return Err(TransportError::Write);
        }
        Ok(())
    }
}
