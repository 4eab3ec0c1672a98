//! Layer query service.
//!
//! Layer resolution itself belongs to the keymap of the host firmware. The
//! engines only ask whether a layer is on, which one is on top, and how it is
//! called.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;

use crate::{MAX_LAYERS, RawMutex};

/// Read access to the keymap's layer state
pub trait LayerState {
    /// Whether the layer is currently enabled
    fn is_layer_active(&self, layer: u8) -> bool;

    /// Index of the highest enabled layer
    fn highest_active_layer(&self) -> u8;

    /// Configured name of the layer, if any
    fn layer_label(&self, layer: u8) -> Option<&str>;
}

impl<T: LayerState> LayerState for &T {
    fn is_layer_active(&self, layer: u8) -> bool {
        (**self).is_layer_active(layer)
    }

    fn highest_active_layer(&self) -> u8 {
        (**self).highest_active_layer()
    }

    fn layer_label(&self, layer: u8) -> Option<&str> {
        (**self).layer_label(layer)
    }
}

/// Layer state kept as a bitmask, one bit per layer.
///
/// The keymap writes it from its own task, the engines read it from theirs.
/// The default layer starts enabled and is reported as the highest active
/// layer while no layer is enabled at all.
pub struct LayerRegistry<'a> {
    state: Mutex<RawMutex, Cell<u32>>,
    names: &'a [&'a str],
    default_layer: u8,
}

impl<'a> LayerRegistry<'a> {
    /// Create a registry with layer 0 as default layer.
    ///
    /// `names[i]` is the name of layer `i`, an empty string means unnamed.
    pub const fn new(names: &'a [&'a str]) -> Self {
        Self::with_default_layer(names, 0)
    }

    /// Create a registry with another default layer, an out of range one falls back to 0
    pub const fn with_default_layer(names: &'a [&'a str], default_layer: u8) -> Self {
        let default_layer = if (default_layer as usize) < MAX_LAYERS { default_layer } else { 0 };
        Self {
            state: Mutex::new(Cell::new(1 << default_layer)),
            names,
            default_layer,
        }
    }

    pub fn default_layer(&self) -> u8 {
        self.default_layer
    }

    /// Current layer bitmask
    pub fn state(&self) -> u32 {
        self.state.lock(|s| s.get())
    }

    /// Replace the whole layer bitmask, returns whether it changed
    pub fn set_state(&self, mask: u32) -> bool {
        self.state.lock(|s| s.replace(mask) != mask)
    }

    /// Enable a layer, returns whether the layer state changed
    pub fn activate(&self, layer: u8) -> bool {
        self.update(layer, |mask, bit| mask | bit)
    }

    /// Disable a layer, returns whether the layer state changed
    pub fn deactivate(&self, layer: u8) -> bool {
        self.update(layer, |mask, bit| mask & !bit)
    }

    /// Toggle a layer, returns whether the layer state changed
    pub fn toggle(&self, layer: u8) -> bool {
        self.update(layer, |mask, bit| mask ^ bit)
    }

    fn update(&self, layer: u8, f: impl FnOnce(u32, u32) -> u32) -> bool {
        if layer as usize >= MAX_LAYERS {
            warn!("Layer {} is out of range", layer);
            return false;
        }
        self.state.lock(|s| {
            let old = s.get();
            let new = f(old, 1 << layer);
            s.set(new);
            old != new
        })
    }
}

impl LayerState for LayerRegistry<'_> {
    fn is_layer_active(&self, layer: u8) -> bool {
        (layer as usize) < MAX_LAYERS && self.state() & (1 << layer) != 0
    }

    fn highest_active_layer(&self) -> u8 {
        let mask = self.state();
        if mask == 0 {
            self.default_layer
        } else {
            (u32::BITS - 1 - mask.leading_zeros()) as u8
        }
    }

    fn layer_label(&self, layer: u8) -> Option<&str> {
        self.names.get(layer as usize).copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const NAMES: [&str; 4] = ["BASE", "", "NUM", "NAV"];

    #[test]
    fn base_layer_on_at_start() {
        let layers = LayerRegistry::new(&NAMES);
        assert!(layers.is_layer_active(0));
        assert!(!layers.is_layer_active(1));
        assert_eq!(layers.highest_active_layer(), 0);
    }

    #[test]
    fn empty_mask_reports_default_layer() {
        let layers = LayerRegistry::with_default_layer(&NAMES, 2);
        assert!(layers.is_layer_active(2));
        assert!(!layers.is_layer_active(0));
        layers.set_state(0);
        assert_eq!(layers.highest_active_layer(), 2);
        assert_eq!(layers.layer_label(layers.highest_active_layer()), Some("NUM"));
    }

    #[test]
    fn highest_bit_wins() {
        let layers = LayerRegistry::new(&NAMES);
        assert!(layers.activate(3));
        assert!(layers.activate(2));
        assert_eq!(layers.highest_active_layer(), 3);
        assert!(layers.deactivate(3));
        assert_eq!(layers.highest_active_layer(), 2);
        assert!(!layers.deactivate(3));
    }

    #[test]
    fn toggle_and_set_state() {
        let layers = LayerRegistry::new(&NAMES);
        assert!(layers.toggle(5));
        assert!(layers.is_layer_active(5));
        assert!(layers.toggle(5));
        assert!(!layers.is_layer_active(5));
        assert!(layers.set_state(0));
        assert_eq!(layers.highest_active_layer(), 0);
        assert!(!layers.set_state(0));
    }

    #[test]
    fn out_of_range_layer_ignored() {
        let layers = LayerRegistry::new(&NAMES);
        assert!(!layers.activate(32));
        assert!(!layers.is_layer_active(32));
        assert_eq!(layers.state(), 1);
    }

    #[test]
    fn labels() {
        let layers = LayerRegistry::new(&NAMES);
        assert_eq!(layers.layer_label(3), Some("NAV"));
        assert_eq!(layers.layer_label(1), Some(""));
        assert_eq!(layers.layer_label(9), None);
    }
}
