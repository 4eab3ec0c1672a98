use embassy_time::{Duration, Timer};

use super::snapshot::StatusSnapshot;
use super::source::StatusSource;
use crate::config::StatusConfig;
use crate::controller::{Controller, PollingController};
use crate::event::{StatusEvent, SubscribableEvent};
use crate::layer::LayerState;
use crate::transport::StatusTransport;

/// Status aggregation and broadcast engine.
///
/// Every handler updates one part of the snapshot and broadcasts the whole
/// snapshot. Nothing is written while the transport isn't ready, and the
/// updates made in the meantime are not replayed: the first broadcast after
/// bring-up carries the then-current state.
///
/// A transport that drops out, e.g. because the host closed the port, is
/// brought up again by [`StatusBroadcaster::run`], followed by a full
/// refresh.
pub struct StatusBroadcaster<'a, L: LayerState, S: StatusSource, T: StatusTransport> {
    layers: &'a L,
    source: &'a S,
    transport: T,
    config: StatusConfig,
    snapshot: StatusSnapshot,
}

impl<'a, L: LayerState, S: StatusSource, T: StatusTransport> StatusBroadcaster<'a, L, S, T> {
    pub fn new(config: &StatusConfig, layers: &'a L, source: &'a S, transport: T) -> Self {
        Self {
            layers,
            source,
            transport,
            config: *config,
            snapshot: StatusSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub async fn on_layer_changed(&mut self) {
        self.snapshot.update_layer(self.layers);
        self.broadcast().await;
    }

    pub async fn on_battery_changed(&mut self) {
        self.snapshot.update_battery(self.source.battery_percent());
        self.broadcast().await;
    }

    pub async fn on_output_changed(&mut self) {
        self.snapshot.output_usb = self.source.output().is_usb();
        self.broadcast().await;
    }

    pub async fn on_indicators_changed(&mut self) {
        self.snapshot.update_indicators(self.source.indicators());
        self.broadcast().await;
    }

    pub async fn on_typing_rate_changed(&mut self, wpm: u16) {
        self.snapshot.wpm = wpm;
        self.broadcast().await;
    }

    /// Heartbeat. Lock indicators are re-read since hosts don't always report a change.
    pub async fn on_periodic_tick(&mut self) {
        self.snapshot.update_indicators(self.source.indicators());
        self.broadcast().await;
    }

    /// Events were lost, re-read everything
    pub async fn on_resync(&mut self) {
        self.refresh_all();
        self.broadcast().await;
    }

    /// Re-read every field from the layer and status services, without broadcasting.
    ///
    /// The typing rate has no source to read from and keeps its last value.
    pub fn refresh_all(&mut self) {
        self.snapshot.update_layer(self.layers);
        self.snapshot.update_battery(self.source.battery_percent());
        self.snapshot.update_indicators(self.source.indicators());
        self.snapshot.output_usb = self.source.output().is_usb();
    }

    /// Encode the snapshot and write it to the transport.
    ///
    /// Encoding and write failures are logged and dropped, the next change
    /// or heartbeat sends the full state again.
    pub async fn broadcast(&mut self) {
        if !self.transport.is_ready() {
            return;
        }
        let record = match self.snapshot.encode(self.config.schema) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to encode status record: {:?}", e);
                return;
            }
        };
        debug!("Broadcasting status record, {} bytes", record.len());
        if let Err(e) = self.transport.write_bytes(&record).await {
            warn!("Failed to write status record: {:?}", e);
        }
    }

    /// Worker loop of the status engine.
    ///
    /// Brings the transport up, sends the full initial state, then handles
    /// status events and the heartbeat. Whenever the transport stops being
    /// ready, it's brought up again and the full state is sent once more.
    ///
    /// The subscription is taken before the first bring-up, so events
    /// published during the warm-up are handled afterwards.
    pub async fn run(&mut self) -> ! {
        let mut sub = StatusEvent::subscriber();
        loop {
            if let Err(e) = self.transport.bring_up(self.config.warmup).await {
                error!("Status transport bring-up failed: {:?}", e);
                Timer::after(self.config.heartbeat).await;
                continue;
            }
            self.refresh_all();
            self.broadcast().await;
            info!("Status broadcaster running");
            self.poll_until_stopped(&mut sub).await;
            warn!("Status transport lost, bringing it up again");
        }
    }
}

impl<L: LayerState, S: StatusSource, T: StatusTransport> Controller for StatusBroadcaster<'_, L, S, T> {
    type Event = StatusEvent;

    async fn process_event(&mut self, event: StatusEvent) {
        match event {
            StatusEvent::LayerChanged => self.on_layer_changed().await,
            StatusEvent::BatteryChanged => self.on_battery_changed().await,
            StatusEvent::OutputChanged => self.on_output_changed().await,
            StatusEvent::IndicatorsChanged => self.on_indicators_changed().await,
            StatusEvent::TypingRateChanged(wpm) => self.on_typing_rate_changed(wpm).await,
            StatusEvent::Resync => self.on_resync().await,
        }
    }
}

impl<L: LayerState, S: StatusSource, T: StatusTransport> PollingController for StatusBroadcaster<'_, L, S, T> {
    fn interval(&self) -> Duration {
        self.config.heartbeat
    }

    async fn update(&mut self) {
        self.on_periodic_tick().await
    }

    fn keep_polling(&self) -> bool {
        self.transport.is_ready()
    }
}
