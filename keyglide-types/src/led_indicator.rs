use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

/// Lock indicators reported by the host, bit layout defined in HID spec 11.1
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq, Serialize, Deserialize)]
pub struct LedIndicator {
    #[bits(1)]
    pub num_lock: bool,
    #[bits(1)]
    pub caps_lock: bool,
    #[bits(1)]
    pub scroll_lock: bool,
    #[bits(1)]
    pub compose: bool,
    #[bits(1)]
    pub kana: bool,
    #[bits(3)]
    _reserved: u8,
}

impl LedIndicator {
    pub const CAPS_LOCK: Self = Self::new().with_caps_lock(true);

    pub const fn new_from(num_lock: bool, caps_lock: bool, scroll_lock: bool) -> Self {
        Self::new()
            .with_num_lock(num_lock)
            .with_caps_lock(caps_lock)
            .with_scroll_lock(scroll_lock)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn host_report_bits() {
        // Output report byte from the host: caps + scroll
        let led = LedIndicator::from_bits(0b0000_0110);
        assert!(!led.num_lock());
        assert!(led.caps_lock());
        assert!(led.scroll_lock());
    }

    #[test]
    fn serialized_as_single_byte() {
        let led = LedIndicator::new_from(false, true, true);
        let mut buf = [0u8; 4];
        let bytes = postcard::to_slice(&led, &mut buf).unwrap();
        assert_eq!(bytes.len(), 1);
        let back: LedIndicator = postcard::from_bytes(bytes).unwrap();
        assert_eq!(back, led);
    }
}
