pub mod common;

use common::RecordingTransport;
use embassy_futures::select::select;
use embassy_futures::{block_on, yield_now};
use embassy_time::{Duration, MockDriver};
use keyglide::channel::MOTION_REPORT_CHANNEL;
use keyglide::config::{MotionBindingConfig, StatusConfig};
use keyglide::event::{MotionEvent, StatusEvent, publish_event};
use keyglide::hid::{ChannelReporter, MotionReport};
use keyglide::layer::LayerRegistry;
use keyglide::motion::{AxisInput, BindingId, DeadlineScheduler, MotionEngine};
use keyglide::status::{SharedStatusSource, StatusBroadcaster};
use rusty_fork::rusty_fork_test;

/// Give the worker enough polls to handle everything that is due
async fn settle() {
    for _ in 0..8 {
        yield_now().await;
    }
}

rusty_fork_test! {
#[test]
fn test_motion_worker_ticks_until_release() {
    let layers = LayerRegistry::new(&[]);
    let configs = [MotionBindingConfig::fixed(3, 4, 5, -2, Duration::from_millis(10))];
    let mut engine: MotionEngine<_, _, DeadlineScheduler<1>, 1> =
        MotionEngine::new(&configs, &layers, ChannelReporter::new(), DeadlineScheduler::new()).unwrap();
    let moving = Some(MotionReport { x: 5, y: -2 });

    let driver = async {
        settle().await;
        publish_event(MotionEvent::press(BindingId(0), AxisInput::Implied));
        settle().await;
        // First tick is due right away
        assert_eq!(MOTION_REPORT_CHANNEL.try_receive().ok(), moving);
        assert!(MOTION_REPORT_CHANNEL.try_receive().is_err());

        for _ in 0..3 {
            MockDriver::get().advance(Duration::from_millis(10));
            settle().await;
            assert_eq!(MOTION_REPORT_CHANNEL.try_receive().ok(), moving);
        }

        publish_event(MotionEvent::release(BindingId(0), AxisInput::Implied));
        settle().await;
        MockDriver::get().advance(Duration::from_millis(50));
        settle().await;
        assert!(MOTION_REPORT_CHANNEL.try_receive().is_err());
    };
    block_on(select(engine.run(), driver));
}
}

rusty_fork_test! {
#[test]
fn test_motion_worker_coalesces_missed_ticks() {
    let layers = LayerRegistry::new(&[]);
    let configs = [MotionBindingConfig::fixed(3, 4, 1, 0, Duration::from_millis(10))];
    let mut engine: MotionEngine<_, _, DeadlineScheduler<1>, 1> =
        MotionEngine::new(&configs, &layers, ChannelReporter::new(), DeadlineScheduler::new()).unwrap();

    let driver = async {
        settle().await;
        publish_event(MotionEvent::press(BindingId(0), AxisInput::Implied));
        settle().await;
        assert!(MOTION_REPORT_CHANNEL.try_receive().is_ok());

        // Five periods pass without the worker being polled
        MockDriver::get().advance(Duration::from_millis(50));
        settle().await;
        assert!(MOTION_REPORT_CHANNEL.try_receive().is_ok());
        assert!(MOTION_REPORT_CHANNEL.try_receive().is_err());
    };
    block_on(select(engine.run(), driver));
}
}

rusty_fork_test! {
#[test]
fn test_status_worker_initial_state_events_and_heartbeat() {
    let layers = LayerRegistry::new(&["BASE"]);
    let source = SharedStatusSource::new();
    source.set_battery(Some(77));
    let transport = RecordingTransport::default();
    let mut broadcaster = StatusBroadcaster::new(&StatusConfig::default(), &layers, &source, transport.clone());

    let driver = async {
        settle().await;
        // Full state right after bring-up
        assert_eq!(
            transport.records(),
            ["{\"layer\":0,\"n\":\"BASE\",\"b\":77,\"w\":0,\"c\":0,\"nm\":0,\"s\":0,\"u\":1}\n"]
        );

        source.set_battery(Some(76));
        publish_event(StatusEvent::BatteryChanged);
        settle().await;
        assert_eq!(transport.records().len(), 2);

        MockDriver::get().advance(Duration::from_secs(1));
        settle().await;
        let records = transport.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1], records[2]);
        assert!(records[2].contains("\"b\":76"));
    };
    block_on(select(broadcaster.run(), driver));
}
}

rusty_fork_test! {
#[test]
fn test_status_worker_brings_transport_up_again_after_write_failure() {
    let layers = LayerRegistry::new(&["BASE"]);
    let source = SharedStatusSource::new();
    let transport = RecordingTransport::default();
    // The very first write fails and drops the link
    transport.failures.set(1);
    let mut broadcaster = StatusBroadcaster::new(&StatusConfig::default(), &layers, &source, transport.clone());

    let driver = async {
        settle().await;
        assert_eq!(transport.bring_ups.get(), 2);
        assert_eq!(transport.records().len(), 1);

        // Heartbeats keep going on the new link
        MockDriver::get().advance(Duration::from_secs(1));
        settle().await;
        let records = transport.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
        assert_eq!(transport.bring_ups.get(), 2);
    };
    block_on(select(broadcaster.run(), driver));
}
}

rusty_fork_test! {
#[test]
fn test_status_worker_recovers_from_event_burst() {
    let layers = LayerRegistry::new(&["BASE", "", "", "NAV"]);
    let source = SharedStatusSource::new();
    let transport = RecordingTransport::default();
    let mut broadcaster = StatusBroadcaster::new(&StatusConfig::default(), &layers, &source, transport.clone());

    let driver = async {
        settle().await;
        assert_eq!(transport.records().len(), 1);

        // More events than the channel holds, the layer change gets evicted
        layers.activate(3);
        publish_event(StatusEvent::LayerChanged);
        for level in 0..8 {
            source.set_battery(Some(90 - level));
            publish_event(StatusEvent::BatteryChanged);
        }
        settle().await;
        let records = transport.records();
        let last = records.last().unwrap();
        assert!(last.starts_with("{\"layer\":3,\"n\":\"NAV\",\"b\":83,"));

        MockDriver::get().advance(Duration::from_secs(1));
        settle().await;
        assert!(transport.records().last().unwrap().contains("\"layer\":3"));
    };
    block_on(select(broadcaster.run(), driver));
}
}
