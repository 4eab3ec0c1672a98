//! Event system for keyglide
//!
//! This module provides:
//! - The events consumed by the two engines ([`StatusEvent`], [`MotionEvent`])
//! - Publisher/subscriber traits over the embassy-sync channels they travel through
//!
//! Publishing never blocks: events can be raised from interrupt handlers, the
//! keymap task or a BLE callback. Handling happens later, on the worker that
//! owns the subscriber.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel;
use embassy_sync::pubsub::{ImmediatePublisher, Subscriber, WaitResult};

use crate::channel::{MOTION_EVENT_CHANNEL, STATUS_EVENT_CHANNEL};
use crate::motion::{AxisInput, BindingId};
use crate::{MOTION_EVENT_CHANNEL_SIZE, STATUS_EVENT_CHANNEL_SIZE, STATUS_EVENT_PUBS, STATUS_EVENT_SUBS};

/// Trait for event publishers
pub trait EventPublisher<T> {
    fn publish(&self, message: T);
}

/// Trait for event subscribers
pub trait EventSubscriber<T> {
    async fn next_event(&mut self) -> T;
}

/// Event type that has a global channel to publish to
pub trait PublishableEvent: Clone {
    type Publisher: EventPublisher<Self>;

    fn publisher() -> Self::Publisher;
}

/// Event type that has a global channel to subscribe to
pub trait SubscribableEvent: Clone {
    type Subscriber: EventSubscriber<Self>;

    fn subscriber() -> Self::Subscriber;
}

// Implementations for embassy-sync PubSubChannel
impl<'a, M: RawMutex, T: Clone, const CAP: usize, const SUBS: usize, const PUBS: usize> EventPublisher<T>
    for ImmediatePublisher<'a, M, T, CAP, SUBS, PUBS>
{
    fn publish(&self, message: T) {
        self.publish_immediate(message);
    }
}

// Implementation for embassy-sync Channel
impl<'a, M: RawMutex, T: Clone, const N: usize> EventPublisher<T> for channel::Sender<'a, M, T, N> {
    fn publish(&self, message: T) {
        if self.try_send(message).is_err() {
            error!("Send event to Channel error, channel is full");
        }
    }
}

impl<'a, M: RawMutex, T: Clone, const N: usize> EventSubscriber<T> for channel::Receiver<'a, M, T, N> {
    async fn next_event(&mut self) -> T {
        self.receive().await
    }
}

/// Something the status snapshot depends on has changed.
///
/// Except for the typing rate, events carry no payload: the broadcaster reads
/// the current value from the owning service when it handles the event, so a
/// late event never writes a stale value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusEvent {
    LayerChanged,
    BatteryChanged,
    OutputChanged,
    IndicatorsChanged,
    TypingRateChanged(u16),
    /// Events were lost, every field has to be read again.
    ///
    /// Raised by [`StatusEventSubscriber`] when the channel overflowed, hosts
    /// may publish it too after restoring a whole keyboard state.
    Resync,
}

impl PublishableEvent for StatusEvent {
    type Publisher = ImmediatePublisher<
        'static,
        crate::RawMutex,
        StatusEvent,
        STATUS_EVENT_CHANNEL_SIZE,
        STATUS_EVENT_SUBS,
        STATUS_EVENT_PUBS,
    >;

    fn publisher() -> Self::Publisher {
        STATUS_EVENT_CHANNEL.immediate_publisher()
    }
}

impl SubscribableEvent for StatusEvent {
    type Subscriber = StatusEventSubscriber;

    fn subscriber() -> Self::Subscriber {
        StatusEventSubscriber(
            STATUS_EVENT_CHANNEL
                .subscriber()
                .expect("Failed to create subscriber for StatusEvent. The 'subs' limit has been exceeded."),
        )
    }
}

/// Subscriber of the status channel.
///
/// A full channel drops its oldest event on publish. A subscriber which
/// missed events gets a single [`StatusEvent::Resync`] in their place.
pub struct StatusEventSubscriber(
    Subscriber<'static, crate::RawMutex, StatusEvent, STATUS_EVENT_CHANNEL_SIZE, STATUS_EVENT_SUBS, STATUS_EVENT_PUBS>,
);

impl EventSubscriber<StatusEvent> for StatusEventSubscriber {
    async fn next_event(&mut self) -> StatusEvent {
        match self.0.next_message().await {
            WaitResult::Message(event) => event,
            WaitResult::Lagged(n) => {
                warn!("{} status events lost", n);
                StatusEvent::Resync
            }
        }
    }
}

/// Key press or release on a motion binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionEvent {
    pub binding: BindingId,
    pub input: AxisInput,
    pub pressed: bool,
}

impl MotionEvent {
    pub const fn press(binding: BindingId, input: AxisInput) -> Self {
        Self {
            binding,
            input,
            pressed: true,
        }
    }

    pub const fn release(binding: BindingId, input: AxisInput) -> Self {
        Self {
            binding,
            input,
            pressed: false,
        }
    }
}

impl PublishableEvent for MotionEvent {
    type Publisher = channel::Sender<'static, crate::RawMutex, MotionEvent, MOTION_EVENT_CHANNEL_SIZE>;

    fn publisher() -> Self::Publisher {
        MOTION_EVENT_CHANNEL.sender()
    }
}

impl SubscribableEvent for MotionEvent {
    type Subscriber = channel::Receiver<'static, crate::RawMutex, MotionEvent, MOTION_EVENT_CHANNEL_SIZE>;

    fn subscriber() -> Self::Subscriber {
        MOTION_EVENT_CHANNEL.receiver()
    }
}

/// Publish an event (non-blocking, dropped if the channel is full)
///
/// Example: `publish_event(StatusEvent::BatteryChanged)`
pub fn publish_event<E: PublishableEvent>(e: E) {
    E::publisher().publish(e);
}
