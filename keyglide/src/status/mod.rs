//! Status aggregation and broadcast.
//!
//! The [`StatusBroadcaster`] keeps the latest known value of every status
//! field and writes the whole snapshot to a serial transport whenever one of
//! them changes, and once per heartbeat period regardless. Consumers detect a
//! dead link by the missing heartbeat.

mod broadcaster;
mod snapshot;
pub mod source;
mod wpm;

pub use broadcaster::StatusBroadcaster;
pub use snapshot::{StatusRecord, StatusSnapshot};
pub use source::{SharedStatusSource, StatusSource};
pub use wpm::{KeystrokeEvent, WpmMeter};
