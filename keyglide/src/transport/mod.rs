//! Serial transports the status records are written to.
//!
//! A transport is ready only after its bring-up completed and the warm-up
//! delay elapsed. Writes before that fail with [`TransportError::NotReady`];
//! nothing is queued for later.

#[cfg(feature = "usb")]
mod cdc_acm;
mod serial;

use embassy_time::Duration;

#[cfg(feature = "usb")]
pub use cdc_acm::CdcAcmTransport;
pub use serial::SerialTransport;

use crate::error::TransportError;

/// Byte-stream sink for status records
pub trait StatusTransport {
    /// Wait until the link is up, then wait `warmup` more before marking the transport ready
    async fn bring_up(&mut self, warmup: Duration) -> Result<(), TransportError>;

    /// Whether records can be written
    fn is_ready(&self) -> bool;

    /// Write a complete record
    async fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError>;
}
