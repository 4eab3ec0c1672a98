//! Connection related types

use serde::{Deserialize, Serialize};

/// The transport the keyboard currently sends its reports through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionType {
    #[default]
    Usb,
    Ble,
}

impl ConnectionType {
    pub const fn is_usb(self) -> bool {
        matches!(self, ConnectionType::Usb)
    }
}
