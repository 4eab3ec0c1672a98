//! Controller traits
//!
//! A controller owns some state, receives events from one channel and
//! produces output. Every handler of a controller runs on the same future, so
//! handlers never run concurrently with each other even when the events are
//! published from different tasks or interrupts.
//!
//! ```rust,ignore
//! struct MyController { /* ... */ }
//!
//! impl Controller for MyController {
//!     type Event = StatusEvent;
//!
//!     async fn process_event(&mut self, event: StatusEvent) {
//!         // handle event
//!     }
//! }
//!
//! impl PollingController for MyController {
//!     fn interval(&self) -> Duration {
//!         Duration::from_secs(1)
//!     }
//!
//!     async fn update(&mut self) {
//!         // called every second
//!     }
//! }
//! ```

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};

use crate::event::{EventSubscriber, SubscribableEvent};

/// This trait provides the interface for event consumers.
pub trait Controller {
    /// Type of the received events.
    type Event: SubscribableEvent;

    /// Create a new event subscriber.
    fn subscriber() -> <Self::Event as SubscribableEvent>::Subscriber {
        Self::Event::subscriber()
    }

    /// Process the received event
    async fn process_event(&mut self, event: Self::Event);
}

/// The trait for polling controllers.
///
/// The polling loop alternates between waiting for events and calling
/// `update()` at the specified interval. Events don't delay the next update:
/// the period is measured from the previous update, not from the last event.
pub trait PollingController: Controller {
    /// Returns the interval between `update` calls.
    fn interval(&self) -> Duration;

    /// Update periodically, will be called according to [`Self::interval()`]
    async fn update(&mut self);

    /// Checked before every wait of [`Self::poll_until_stopped`], polling stops once it returns `false`.
    ///
    /// Controllers which can stop drive `poll_until_stopped` themselves instead of `polling_loop`.
    fn keep_polling(&self) -> bool {
        true
    }

    /// Polling loop that processes events and calls `update()` at the specified interval
    async fn polling_loop(&mut self) -> ! {
        let mut sub = Self::subscriber();
        loop {
            self.poll_until_stopped(&mut sub).await;
        }
    }

    /// Process events from `sub` and call `update()` at the specified interval
    /// until [`Self::keep_polling()`] returns `false`.
    ///
    /// Events published while not polling stay in the subscriber's queue.
    async fn poll_until_stopped(&mut self, sub: &mut <Self::Event as SubscribableEvent>::Subscriber) {
        let mut last = Instant::now();

        while self.keep_polling() {
            let elapsed = last.elapsed();

            match select(
                Timer::after(self.interval().checked_sub(elapsed).unwrap_or(Duration::MIN)),
                sub.next_event(),
            )
            .await
            {
                Either::First(_) => {
                    self.update().await;
                    last = Instant::now();
                }
                Either::Second(event) => self.process_event(event).await,
            }
        }
    }
}
