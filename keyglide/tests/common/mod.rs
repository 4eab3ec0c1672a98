#![allow(dead_code)]

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_time::Duration;
use keyglide::error::TransportError;
use keyglide::hid::{MotionReport, MotionReporter};
use keyglide::motion::{BindingId, TickScheduler};
use keyglide::transport::StatusTransport;
use keyglide::types::Axis;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Reporter which keeps every flushed report
#[derive(Default)]
pub struct RecordingReporter {
    pending: MotionReport,
    pub reports: Vec<MotionReport>,
}

impl MotionReporter for RecordingReporter {
    fn set_axis_motion(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.pending.x = value,
            Axis::Y => self.pending.y = value,
        }
    }

    async fn flush_report(&mut self) {
        self.reports.push(self.pending);
    }
}

/// Scheduler which only records what the engine asked for, ticks are fired by the test
#[derive(Default)]
pub struct RecordingScheduler {
    pub started: Vec<(BindingId, Duration)>,
    pub cancelled: Vec<BindingId>,
}

impl TickScheduler for RecordingScheduler {
    fn start_repeating(&mut self, binding: BindingId, period: Duration) {
        self.started.push((binding, period));
    }

    fn cancel(&mut self, binding: BindingId) {
        self.cancelled.push(binding);
    }
}

/// Transport capturing the written records.
///
/// The write log and counters are shared so they can be inspected while a worker loop owns the transport.
/// Each pending failure makes one write fail and drops the link, like a host closing the port.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub ready: bool,
    pub writes: Rc<RefCell<Vec<Vec<u8>>>>,
    pub failures: Rc<Cell<u32>>,
    pub bring_ups: Rc<Cell<u32>>,
}

impl RecordingTransport {
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }

    pub fn records(&self) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }
}

impl StatusTransport for RecordingTransport {
    async fn bring_up(&mut self, _warmup: Duration) -> Result<(), TransportError> {
        self.bring_ups.set(self.bring_ups.get() + 1);
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn write_bytes(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            self.ready = false;
            return Err(TransportError::Write);
        }
        self.writes.borrow_mut().push(buf.to_vec());
        Ok(())
    }
}
