//! # keyglide types
//!
//! Plain data types shared by the keyglide engines and whatever sits on the
//! other side of the wire.
//!
//! - [`axis`] - pointer motion axes
//! - [`connection`] - output transport discriminator
//! - [`led_indicator`] - HID lock indicator states

#![no_std]

pub mod axis;
pub mod connection;
pub mod led_indicator;

pub use axis::Axis;
pub use connection::ConnectionType;
pub use led_indicator::LedIndicator;
