//! # keyglide
//!
//! Glue for a split keyboard dongle. Two engines live here:
//!
//! - [`motion::MotionEngine`] turns a held key into a repeating pointer motion
//!   stream whose speed follows the active layer (25% / 100% / 200%).
//! - [`status::StatusBroadcaster`] keeps a snapshot of the keyboard status
//!   (layer, battery, lock indicators, WPM, output) and writes it as one
//!   line per update to a serial transport, plus a heartbeat every second.
//!
//! Both engines follow the same pattern: events are published from any
//! context into a channel, and a single worker future drains the channel,
//! mutates the state and performs the output. Scanning, layer resolution and
//! USB bring-up are provided by the host firmware through the traits in
//! [`layer`], [`hid`], [`status::source`] and [`transport`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod hid;
pub mod layer;
pub mod motion;
pub mod status;
pub mod transport;

pub use embassy_futures;
pub use heapless;
pub use keyglide_types as types;

/// Raw mutex used by every channel and shared cell in keyglide
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Maximum number of motion bindings handled by one engine
pub const MAX_BINDINGS: usize = 8;
/// Number of layers the layer bitmask can represent
pub const MAX_LAYERS: usize = 32;
/// Maximum length of a layer name in the status record, in bytes
pub const LAYER_NAME_MAX_LEN: usize = 31;
/// Size of the buffer a single status record is encoded into
pub const STATUS_RECORD_MAX_LEN: usize = 256;

pub(crate) const STATUS_EVENT_CHANNEL_SIZE: usize = 8;
pub(crate) const STATUS_EVENT_SUBS: usize = 4;
pub(crate) const STATUS_EVENT_PUBS: usize = 2;
pub(crate) const MOTION_EVENT_CHANNEL_SIZE: usize = 16;
pub(crate) const MOTION_REPORT_CHANNEL_SIZE: usize = 8;
pub(crate) const KEYSTROKE_EVENT_CHANNEL_SIZE: usize = 16;
