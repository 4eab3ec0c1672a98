//! Output transport for pointer motion.

use keyglide_types::Axis;
use usbd_hid::descriptor::MouseReport;

use crate::channel::MOTION_REPORT_CHANNEL;

/// Two-axis pointer motion, one report per tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionReport {
    pub x: i16,
    pub y: i16,
}

impl From<MotionReport> for MouseReport {
    /// The boot mouse report has 8-bit axes, larger motion saturates.
    fn from(report: MotionReport) -> Self {
        let saturate = |v: i16| v.clamp(i8::MIN as i16, i8::MAX as i16) as i8;
        MouseReport {
            buttons: 0,
            x: saturate(report.x),
            y: saturate(report.y),
            wheel: 0,
            pan: 0,
        }
    }
}

/// Sink of pointer motion reports.
///
/// Both axes are set before the report is flushed, so a diagonal movement is
/// never split across two reports.
pub trait MotionReporter {
    /// Set the motion of one axis in the pending report
    fn set_axis_motion(&mut self, axis: Axis, value: i16);

    /// Send the pending report
    async fn flush_report(&mut self);
}

/// Reporter which hands finished reports to [`MOTION_REPORT_CHANNEL`],
/// where the USB or BLE hid writer picks them up.
#[derive(Default)]
pub struct ChannelReporter {
    pending: MotionReport,
}

impl ChannelReporter {
    pub const fn new() -> Self {
        Self {
            pending: MotionReport { x: 0, y: 0 },
        }
    }
}

impl MotionReporter for ChannelReporter {
    fn set_axis_motion(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.pending.x = value,
            Axis::Y => self.pending.y = value,
        }
    }

    async fn flush_report(&mut self) {
        if MOTION_REPORT_CHANNEL.try_send(self.pending).is_err() {
            warn!("Motion report channel is full, dropping {:?}", self.pending);
        }
    }
}
