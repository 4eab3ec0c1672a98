use embassy_time::{Duration, Instant};

use super::binding::BindingId;

/// Timer service for motion bindings.
///
/// Each binding has at most one schedule: starting a binding that is
/// already scheduled replaces its schedule.
pub trait TickScheduler {
    /// Tick the binding every `period`, the first tick is due immediately
    fn start_repeating(&mut self, binding: BindingId, period: Duration);

    /// Stop ticking the binding
    fn cancel(&mut self, binding: BindingId);
}

#[derive(Clone, Copy, Debug)]
struct Schedule {
    next: Instant,
    period: Duration,
}

/// Scheduler keeping one deadline per binding, polled by the engine's worker loop.
pub struct DeadlineScheduler<const N: usize> {
    schedules: [Option<Schedule>; N],
}

impl<const N: usize> Default for DeadlineScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DeadlineScheduler<N> {
    pub const fn new() -> Self {
        Self { schedules: [None; N] }
    }

    pub fn is_scheduled(&self, binding: BindingId) -> bool {
        matches!(self.schedules.get(binding.index()), Some(Some(_)))
    }

    /// The binding with the earliest deadline
    pub fn next_due(&self) -> Option<(BindingId, Instant)> {
        self.schedules
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (BindingId(i as u8), s.next)))
            .min_by_key(|(_, next)| *next)
    }

    /// Move the deadline of a binding that just fired to its next period.
    ///
    /// Periods missed because the worker was busy are skipped instead of
    /// being fired back to back.
    pub fn advance(&mut self, binding: BindingId, now: Instant) {
        if let Some(Some(schedule)) = self.schedules.get_mut(binding.index()) {
            let mut next = schedule.next + schedule.period;
            if next <= now {
                next = now + schedule.period;
            }
            schedule.next = next;
        }
    }

    fn start_at(&mut self, binding: BindingId, period: Duration, now: Instant) {
        match self.schedules.get_mut(binding.index()) {
            Some(slot) => *slot = Some(Schedule { next: now, period }),
            None => error!("Cannot schedule binding {}, only {} slots", binding.0, N),
        }
    }
}

impl<const N: usize> TickScheduler for DeadlineScheduler<N> {
    fn start_repeating(&mut self, binding: BindingId, period: Duration) {
        self.start_at(binding, period, Instant::now());
    }

    fn cancel(&mut self, binding: BindingId) {
        if let Some(slot) = self.schedules.get_mut(binding.index()) {
            *slot = None;
        }
    }
}
