use embassy_time::Duration;

use crate::channel::KEYSTROKE_EVENT_CHANNEL;
use crate::controller::{Controller, PollingController};
use crate::event::{PublishableEvent, StatusEvent, SubscribableEvent, publish_event};
use crate::{KEYSTROKE_EVENT_CHANNEL_SIZE, RawMutex};

const CHARS_PER_WORD: u16 = 5;
const SAMPLES: u8 = 5;

/// A key of the keymap was pressed or released
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeystrokeEvent {
    pub pressed: bool,
}

impl PublishableEvent for KeystrokeEvent {
    type Publisher = embassy_sync::channel::Sender<'static, RawMutex, KeystrokeEvent, KEYSTROKE_EVENT_CHANNEL_SIZE>;

    fn publisher() -> Self::Publisher {
        KEYSTROKE_EVENT_CHANNEL.sender()
    }
}

impl SubscribableEvent for KeystrokeEvent {
    type Subscriber = embassy_sync::channel::Receiver<'static, RawMutex, KeystrokeEvent, KEYSTROKE_EVENT_CHANNEL_SIZE>;

    fn subscriber() -> Self::Subscriber {
        KEYSTROKE_EVENT_CHANNEL.receiver()
    }
}

/// Typing speed estimation in words per minute.
///
/// Counts released keys, and every second turns the count into an
/// instantaneous rate which is averaged over the last few seconds. One
/// idle second resets the average.
#[derive(Default)]
pub struct WpmMeter {
    keys_pressed: u8,
    wpm: u16,
    update_count: u8,
}

impl WpmMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wpm(&self) -> u16 {
        self.wpm
    }

    pub fn on_key_released(&mut self) {
        self.keys_pressed = self.keys_pressed.saturating_add(1);
    }

    /// Close the current one second sample, returns the new rate if it changed
    pub fn sample(&mut self) -> Option<u16> {
        self.update_count = SAMPLES.min(self.update_count + 1);

        let instant_wpm = self.keys_pressed as u16 * 60 / CHARS_PER_WORD;
        self.keys_pressed = 0;

        let avg_wpm = if instant_wpm > 0 {
            let total = self.wpm as u32 * (self.update_count - 1) as u32 + instant_wpm as u32;
            (total / self.update_count as u32) as u16
        } else {
            self.update_count = 0;
            0
        };

        if avg_wpm != self.wpm {
            self.wpm = avg_wpm;
            Some(avg_wpm)
        } else {
            None
        }
    }
}

impl Controller for WpmMeter {
    type Event = KeystrokeEvent;

    async fn process_event(&mut self, event: KeystrokeEvent) {
        if !event.pressed {
            self.on_key_released();
        }
    }
}

impl PollingController for WpmMeter {
    fn interval(&self) -> Duration {
        Duration::from_secs(1)
    }

    async fn update(&mut self) {
        if let Some(wpm) = self.sample() {
            debug!("Typing rate: {} wpm", wpm);
            publish_event(StatusEvent::TypingRateChanged(wpm));
        }
    }
}
