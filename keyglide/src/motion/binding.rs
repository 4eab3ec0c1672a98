use keyglide_types::Axis;

use super::scale::{ScaleTier, scale_axis};
use crate::config::{AxisParam, MotionBindingConfig, MotionMode};
use crate::hid::MotionReport;
use crate::layer::LayerState;

/// Index of a motion binding in the engine's binding table
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BindingId(pub u8);

impl BindingId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Parameter of a key press or release on a motion binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisInput {
    /// No parameter, for fixed vector bindings
    Implied,
    /// Axis input code, the magnitude comes from the config
    Code(u16),
    /// Axis input code with a signed magnitude
    CodeWithMagnitude(u16, i16),
}

/// What the engine has to do with the binding's timer after an input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerCommand {
    /// The binding just became active, start ticking
    Start,
    /// The last held axis was released, stop ticking
    Cancel,
    /// Leave the timer as it is
    Keep,
}

/// Runtime state of one motion binding.
///
/// `Idle --press--> Active --tick--> Active --release(last axis)--> Idle`.
/// The timer of the binding runs iff `active` is set.
#[derive(Clone, Copy, Debug)]
pub struct MotionBinding {
    config: MotionBindingConfig,
    active: bool,
    /// Held velocity per axis, indexed by [`Axis::index`]
    velocity: [i16; 2],
}

impl MotionBinding {
    pub const fn new(config: MotionBindingConfig) -> Self {
        Self {
            config,
            active: false,
            velocity: [0; 2],
        }
    }

    pub fn config(&self) -> &MotionBindingConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn velocity(&self) -> [i16; 2] {
        self.velocity
    }

    /// Record the velocity requested by a key press.
    ///
    /// Returns `None` if the input doesn't address this binding, the state is
    /// left untouched in that case.
    pub fn press(&mut self, input: AxisInput) -> Option<TimerCommand> {
        match (self.config.mode, input) {
            (MotionMode::Fixed { x, y }, AxisInput::Implied) => self.velocity = [x, y],
            (MotionMode::PerAxis { .. }, _) => {
                let (axis, magnitude) = self.resolve_axis(input)?;
                self.velocity[axis.index()] = magnitude?;
            }
            _ => return None,
        }

        if self.active {
            Some(TimerCommand::Keep)
        } else {
            self.active = true;
            Some(TimerCommand::Start)
        }
    }

    /// Clear the velocity of the released axis.
    ///
    /// The binding goes idle once no axis has a velocity left. Returns `None`
    /// if the input doesn't address this binding.
    pub fn release(&mut self, input: AxisInput) -> Option<TimerCommand> {
        match (self.config.mode, input) {
            (MotionMode::Fixed { .. }, AxisInput::Implied) => self.velocity = [0; 2],
            (MotionMode::PerAxis { .. }, _) => {
                let (axis, _) = self.resolve_axis(input)?;
                self.velocity[axis.index()] = 0;
            }
            _ => return None,
        }

        if self.active && self.velocity == [0; 2] {
            self.active = false;
            Some(TimerCommand::Cancel)
        } else {
            Some(TimerCommand::Keep)
        }
    }

    /// Motion for one tick under the current layer state.
    ///
    /// Returns `None` if the binding is idle, which is the case for a tick
    /// that was already dispatched when the last axis got released.
    pub fn motion<L: LayerState>(&self, layers: &L) -> Option<MotionReport> {
        if !self.active {
            return None;
        }
        let tier = ScaleTier::resolve(layers, self.config.slow_layer, self.config.fast_layer);
        Some(MotionReport {
            x: scale_axis(self.velocity[Axis::X.index()] as i32, tier),
            y: scale_axis(self.velocity[Axis::Y.index()] as i32, tier),
        })
    }

    /// Map a per-axis input to its axis and magnitude.
    ///
    /// The magnitude is `None` when the input shape doesn't match the
    /// configured [`AxisParam`], such a press is ignored while a release still
    /// clears the axis.
    fn resolve_axis(&self, input: AxisInput) -> Option<(Axis, Option<i16>)> {
        let MotionMode::PerAxis { x_code, y_code, param } = self.config.mode else {
            return None;
        };
        let (code, magnitude) = match (input, param) {
            (AxisInput::Code(code), AxisParam::Implied { magnitude }) => (code, Some(magnitude)),
            (AxisInput::CodeWithMagnitude(code, magnitude), AxisParam::Explicit) => (code, Some(magnitude)),
            (AxisInput::Code(code), AxisParam::Explicit) | (AxisInput::CodeWithMagnitude(code, _), _) => (code, None),
            (AxisInput::Implied, _) => return None,
        };
        let axis = if code == x_code {
            Axis::X
        } else if code == y_code {
            Axis::Y
        } else {
            return None;
        };
        Some((axis, magnitude))
    }
}
