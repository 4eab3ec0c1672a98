//! Device status services read by the broadcaster.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use keyglide_types::{ConnectionType, LedIndicator};

use crate::RawMutex;

/// Current values of the battery, lock indicator and output endpoint services.
///
/// Accessors return the value at call time, the broadcaster calls them when
/// it handles the matching change event.
pub trait StatusSource {
    /// State of charge in percent, `None` if battery reporting is disabled
    fn battery_percent(&self) -> Option<u8>;

    /// Lock indicators of the active host
    fn indicators(&self) -> LedIndicator;

    /// Transport of the selected output endpoint
    fn output(&self) -> ConnectionType;
}

impl<T: StatusSource> StatusSource for &T {
    fn battery_percent(&self) -> Option<u8> {
        (**self).battery_percent()
    }

    fn indicators(&self) -> LedIndicator {
        (**self).indicators()
    }

    fn output(&self) -> ConnectionType {
        (**self).output()
    }
}

/// Status values written by the host firmware tasks.
///
/// Setters return whether the value changed, so the writer knows whether to
/// publish the matching [`crate::event::StatusEvent`].
pub struct SharedStatusSource {
    battery: Mutex<RawMutex, Cell<Option<u8>>>,
    indicators: Mutex<RawMutex, Cell<LedIndicator>>,
    output: Mutex<RawMutex, Cell<ConnectionType>>,
}

impl Default for SharedStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStatusSource {
    pub const fn new() -> Self {
        Self {
            battery: Mutex::new(Cell::new(None)),
            indicators: Mutex::new(Cell::new(LedIndicator::new())),
            output: Mutex::new(Cell::new(ConnectionType::Usb)),
        }
    }

    pub fn set_battery(&self, percent: Option<u8>) -> bool {
        self.battery.lock(|b| b.replace(percent) != percent)
    }

    pub fn set_indicators(&self, indicators: LedIndicator) -> bool {
        self.indicators.lock(|i| i.replace(indicators) != indicators)
    }

    pub fn set_output(&self, output: ConnectionType) -> bool {
        self.output.lock(|o| o.replace(output) != output)
    }
}

impl StatusSource for SharedStatusSource {
    fn battery_percent(&self) -> Option<u8> {
        self.battery.lock(|b| b.get())
    }

    fn indicators(&self) -> LedIndicator {
        self.indicators.lock(|i| i.get())
    }

    fn output(&self) -> ConnectionType {
        self.output.lock(|o| o.get())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn setters_report_change() {
        let source = SharedStatusSource::new();
        assert_eq!(source.battery_percent(), None);
        assert!(source.set_battery(Some(82)));
        assert!(!source.set_battery(Some(82)));
        assert_eq!(source.battery_percent(), Some(82));

        assert!(source.set_indicators(LedIndicator::CAPS_LOCK));
        assert!(source.indicators().caps_lock());

        assert!(!source.set_output(ConnectionType::Usb));
        assert!(source.set_output(ConnectionType::Ble));
        assert_eq!(source.output(), ConnectionType::Ble);
    }
}
