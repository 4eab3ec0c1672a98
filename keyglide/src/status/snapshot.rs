use core::fmt::Write;

use heapless::{String, Vec};
use keyglide_types::LedIndicator;
use serde::{Deserialize, Serialize};

use crate::config::StatusSchema;
use crate::error::EncodeError;
use crate::layer::LayerState;
use crate::{LAYER_NAME_MAX_LEN, STATUS_RECORD_MAX_LEN};

/// Latest known value of every status field.
///
/// Fields no event has touched yet keep their default, the layer defaults
/// to the unnamed layer 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub layer: u8,
    pub layer_name: String<LAYER_NAME_MAX_LEN>,
    pub battery: u8,
    pub wpm: u16,
    pub caps_lock: bool,
    pub num_lock: bool,
    pub scroll_lock: bool,
    pub output_usb: bool,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        let mut layer_name = String::new();
        let _ = layer_name.push_str("L0");
        Self {
            layer: 0,
            layer_name,
            battery: 0,
            wpm: 0,
            caps_lock: false,
            num_lock: false,
            scroll_lock: false,
            output_usb: false,
        }
    }
}

/// Borrowed view of a snapshot in the binary record layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord<'a> {
    pub layer: u8,
    pub name: &'a str,
    pub battery: u8,
    pub wpm: u16,
    pub caps_lock: bool,
    pub num_lock: bool,
    pub scroll_lock: bool,
    pub output_usb: bool,
}

/// Field names of a text schema, in wire order
struct Keys {
    layer: &'static str,
    name: &'static str,
    battery: &'static str,
    wpm: &'static str,
    caps: &'static str,
    num: &'static str,
    scroll: &'static str,
    usb: &'static str,
}

const COMPACT_KEYS: Keys = Keys {
    layer: "layer",
    name: "n",
    battery: "b",
    wpm: "w",
    caps: "c",
    num: "nm",
    scroll: "s",
    usb: "u",
};

const VERBOSE_KEYS: Keys = Keys {
    layer: "layer",
    name: "name",
    battery: "bat",
    wpm: "wpm",
    caps: "caps",
    num: "num",
    scroll: "scrl",
    usb: "usb",
};

impl StatusSnapshot {
    /// Take the highest active layer and its name from the layer service.
    ///
    /// An unnamed layer is called `L<index>`, a long name is cut to
    /// [`LAYER_NAME_MAX_LEN`] bytes.
    pub fn update_layer<L: LayerState>(&mut self, layers: &L) {
        self.layer = layers.highest_active_layer();
        self.layer_name.clear();
        match layers.layer_label(self.layer) {
            Some(label) if !label.is_empty() => {
                for c in label.chars() {
                    if self.layer_name.push(c).is_err() {
                        break;
                    }
                }
            }
            // "L255" always fits
            _ => {
                let _ = write!(self.layer_name, "L{}", self.layer);
            }
        }
    }

    /// Battery level in percent, 0 when reporting is unavailable
    pub fn update_battery(&mut self, percent: Option<u8>) {
        self.battery = percent.map_or(0, |p| p.min(100));
    }

    pub fn update_indicators(&mut self, indicators: LedIndicator) {
        self.caps_lock = indicators.caps_lock();
        self.num_lock = indicators.num_lock();
        self.scroll_lock = indicators.scroll_lock();
    }

    pub fn record(&self) -> StatusRecord<'_> {
        StatusRecord {
            layer: self.layer,
            name: self.layer_name.as_str(),
            battery: self.battery,
            wpm: self.wpm,
            caps_lock: self.caps_lock,
            num_lock: self.num_lock,
            scroll_lock: self.scroll_lock,
            output_usb: self.output_usb,
        }
    }

    /// Encode the whole snapshot as one record
    pub fn encode(&self, schema: StatusSchema) -> Result<Vec<u8, STATUS_RECORD_MAX_LEN>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(schema, &mut buf)?;
        Ok(buf)
    }

    /// Encode the whole snapshot into `buf`.
    ///
    /// A record that doesn't fit fails with [`EncodeError::Overflow`], the
    /// content of `buf` must not be sent in that case.
    pub fn encode_into<const N: usize>(&self, schema: StatusSchema, buf: &mut Vec<u8, N>) -> Result<(), EncodeError> {
        buf.clear();
        match schema {
            StatusSchema::Compact => self.write_text(&COMPACT_KEYS, buf),
            StatusSchema::Verbose => self.write_text(&VERBOSE_KEYS, buf),
            StatusSchema::Postcard => self.write_postcard(buf),
        }
    }

    fn write_text<const N: usize>(&self, keys: &Keys, buf: &mut Vec<u8, N>) -> Result<(), EncodeError> {
        let mut w = RecordWriter(buf);
        write!(w, "{{\"{}\":{},\"{}\":", keys.layer, self.layer, keys.name).map_err(|_| EncodeError::Overflow)?;
        w.write_json_str(&self.layer_name).map_err(|_| EncodeError::Overflow)?;
        write!(
            w,
            ",\"{}\":{},\"{}\":{},\"{}\":{},\"{}\":{},\"{}\":{},\"{}\":{}}}\n",
            keys.battery,
            self.battery,
            keys.wpm,
            self.wpm,
            keys.caps,
            self.caps_lock as u8,
            keys.num,
            self.num_lock as u8,
            keys.scroll,
            self.scroll_lock as u8,
            keys.usb,
            self.output_usb as u8,
        )
        .map_err(|_| EncodeError::Overflow)
    }

    fn write_postcard<const N: usize>(&self, buf: &mut Vec<u8, N>) -> Result<(), EncodeError> {
        let mut raw = [0u8; STATUS_RECORD_MAX_LEN];
        let frame = postcard::to_slice_cobs(&self.record(), &mut raw).map_err(|e| match e {
            postcard::Error::SerializeBufferFull => EncodeError::Overflow,
            _ => EncodeError::Serialize,
        })?;
        buf.extend_from_slice(frame).map_err(|_| EncodeError::Overflow)
    }
}

/// `core::fmt::Write` over a fixed capacity byte buffer
struct RecordWriter<'b, const N: usize>(&'b mut Vec<u8, N>);

impl<const N: usize> RecordWriter<'_, N> {
    /// Write `s` as a quoted JSON string
    fn write_json_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_char('"')?;
        for c in s.chars() {
            match c {
                '"' => self.write_str("\\\"")?,
                '\\' => self.write_str("\\\\")?,
                c if (c as u32) < 0x20 => write!(self, "\\u{:04x}", c as u32)?,
                c => self.write_char(c)?,
            }
        }
        self.write_char('"')
    }
}

impl<const N: usize> Write for RecordWriter<'_, N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.extend_from_slice(s.as_bytes()).map_err(|_| core::fmt::Error)
    }
}
