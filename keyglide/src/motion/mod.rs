//! Repeating motion behavior.
//!
//! A motion binding keeps moving the pointer while its key is held. Every
//! tick the motion vector is recomputed from the held velocity and the layer
//! state, so switching to the slow or the fast layer changes the speed of a
//! movement already in progress.

mod binding;
mod engine;
mod scale;
mod scheduler;

pub use binding::{AxisInput, BindingId, MotionBinding, TimerCommand};
pub use engine::MotionEngine;
pub use scale::{ScaleTier, scale_axis};
pub use scheduler::{DeadlineScheduler, TickScheduler};
