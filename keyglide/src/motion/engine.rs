use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use heapless::Vec;
use keyglide_types::Axis;

use super::binding::{AxisInput, BindingId, MotionBinding, TimerCommand};
use super::scheduler::{DeadlineScheduler, TickScheduler};
use crate::config::MotionBindingConfig;
use crate::error::ConfigError;
use crate::event::{EventSubscriber, MotionEvent, SubscribableEvent};
use crate::hid::MotionReporter;
use crate::layer::LayerState;

/// Motion behavior engine.
///
/// Owns the runtime state of every motion binding. Presses and releases only
/// update that state and the binding's timer, the motion report is produced
/// by the timer tick. All three handlers are meant to run on one worker,
/// see [`MotionEngine::run`].
pub struct MotionEngine<'a, L: LayerState, R: MotionReporter, S: TickScheduler, const N: usize> {
    bindings: Vec<MotionBinding, N>,
    layers: &'a L,
    reporter: R,
    scheduler: S,
}

impl<'a, L: LayerState, R: MotionReporter, S: TickScheduler, const N: usize> MotionEngine<'a, L, R, S, N> {
    /// Create the engine, binding `i` of `configs` gets `BindingId(i)`.
    ///
    /// Fails if any binding config is invalid or if there are more than `N` bindings.
    pub fn new(configs: &[MotionBindingConfig], layers: &'a L, reporter: R, scheduler: S) -> Result<Self, ConfigError> {
        let mut bindings = Vec::new();
        for (i, config) in configs.iter().enumerate() {
            config.validate(i as u8)?;
            bindings
                .push(MotionBinding::new(*config))
                .map_err(|_| ConfigError::TooManyBindings { count: configs.len() })?;
        }
        info!("Motion engine created with {} bindings", bindings.len());
        Ok(Self {
            bindings,
            layers,
            reporter,
            scheduler,
        })
    }

    pub fn binding(&self, id: BindingId) -> Option<&MotionBinding> {
        self.bindings.get(id.index())
    }

    pub fn is_active(&self, id: BindingId) -> bool {
        self.binding(id).is_some_and(|b| b.is_active())
    }

    pub fn velocity(&self, id: BindingId) -> Option<[i16; 2]> {
        self.binding(id).map(|b| b.velocity())
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Key of a motion binding pressed
    pub fn on_press(&mut self, id: BindingId, input: AxisInput) {
        let Some(binding) = self.bindings.get_mut(id.index()) else {
            error!("Press on unknown motion binding {}", id.0);
            return;
        };
        match binding.press(input) {
            Some(TimerCommand::Start) => {
                info!("Motion binding {} active", id.0);
                self.scheduler.start_repeating(id, binding.config().tick_interval);
            }
            Some(_) => {}
            None => debug!("Motion binding {} ignores press {:?}", id.0, input),
        }
    }

    /// Key of a motion binding released
    pub fn on_release(&mut self, id: BindingId, input: AxisInput) {
        let Some(binding) = self.bindings.get_mut(id.index()) else {
            error!("Release on unknown motion binding {}", id.0);
            return;
        };
        match binding.release(input) {
            Some(TimerCommand::Cancel) => {
                debug!("Motion binding {} idle", id.0);
                self.scheduler.cancel(id);
            }
            Some(_) => {}
            None => debug!("Motion binding {} ignores release {:?}", id.0, input),
        }
    }

    /// Timer tick of a binding, emits one motion report.
    ///
    /// A tick that fires after the binding went idle is a no-op.
    pub async fn on_tick(&mut self, id: BindingId) {
        let Some(motion) = self.bindings.get(id.index()).and_then(|b| b.motion(self.layers)) else {
            return;
        };
        debug!("Motion binding {} tick: {:?}", id.0, motion);
        self.reporter.set_axis_motion(Axis::X, motion.x);
        self.reporter.set_axis_motion(Axis::Y, motion.y);
        self.reporter.flush_report().await;
    }

    /// Dispatch a press or release event
    pub fn process_event(&mut self, event: MotionEvent) {
        if event.pressed {
            self.on_press(event.binding, event.input);
        } else {
            self.on_release(event.binding, event.input);
        }
    }
}

impl<'a, L: LayerState, R: MotionReporter, const N: usize> MotionEngine<'a, L, R, DeadlineScheduler<N>, N> {
    /// Worker loop of the motion engine.
    ///
    /// Waits for whichever comes first, the next [`MotionEvent`] or the
    /// earliest binding deadline, and runs the matching handler. Presses,
    /// releases and ticks are therefore never handled concurrently.
    pub async fn run(&mut self) -> ! {
        let mut sub = MotionEvent::subscriber();
        info!("Motion engine running");
        loop {
            let due = self.scheduler.next_due();
            let deadline = async {
                match due {
                    Some((_, at)) => Timer::at(at).await,
                    None => core::future::pending::<()>().await,
                }
            };
            match select(sub.next_event(), deadline).await {
                Either::First(event) => self.process_event(event),
                Either::Second(_) => {
                    if let Some((id, _)) = due {
                        self.scheduler.advance(id, Instant::now());
                        self.on_tick(id).await;
                    }
                }
            }
        }
    }
}
