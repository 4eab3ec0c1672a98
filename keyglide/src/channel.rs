//! Exposed channels which carry events into the engines and reports out of them

use embassy_sync::channel::Channel;
use embassy_sync::pubsub::PubSubChannel;
pub use embassy_sync::{blocking_mutex, channel, pubsub};

use crate::event::{MotionEvent, StatusEvent};
use crate::hid::MotionReport;
use crate::status::KeystrokeEvent;
use crate::{
    KEYSTROKE_EVENT_CHANNEL_SIZE, MOTION_EVENT_CHANNEL_SIZE, MOTION_REPORT_CHANNEL_SIZE, RawMutex,
    STATUS_EVENT_CHANNEL_SIZE, STATUS_EVENT_PUBS, STATUS_EVENT_SUBS,
};

/// Channel for status change events, every status consumer subscribes on its own
pub static STATUS_EVENT_CHANNEL: PubSubChannel<
    RawMutex,
    StatusEvent,
    STATUS_EVENT_CHANNEL_SIZE,
    STATUS_EVENT_SUBS,
    STATUS_EVENT_PUBS,
> = PubSubChannel::new();
/// Channel for motion binding presses and releases
pub static MOTION_EVENT_CHANNEL: Channel<RawMutex, MotionEvent, MOTION_EVENT_CHANNEL_SIZE> = Channel::new();
/// Channel for motion reports from the motion engine to the hid writer
pub static MOTION_REPORT_CHANNEL: Channel<RawMutex, MotionReport, MOTION_REPORT_CHANNEL_SIZE> = Channel::new();
/// Channel for keystrokes feeding the typing rate meter
pub static KEYSTROKE_EVENT_CHANNEL: Channel<RawMutex, KeystrokeEvent, KEYSTROKE_EVENT_CHANNEL_SIZE> = Channel::new();
