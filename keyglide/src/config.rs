use embassy_time::Duration;

use crate::error::ConfigError;
use crate::{MAX_BINDINGS, MAX_LAYERS};

/// The config struct for keyglide.
///
/// There are 2 types of configs:
/// 1. `MotionBindingConfig`: one entry per repeating motion binding in the keymap.
/// 2. `StatusConfig`: configuration of the serial status broadcast.
///
/// Built once at startup and handed to the engines by reference.
#[derive(Clone, Copy, Debug)]
pub struct KeyglideConfig<'a> {
    pub bindings: &'a [MotionBindingConfig],
    pub status: StatusConfig,
}

impl Default for KeyglideConfig<'_> {
    fn default() -> Self {
        Self {
            bindings: &[],
            status: StatusConfig::default(),
        }
    }
}

impl KeyglideConfig<'_> {
    /// Validate every binding and the status config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bindings.len() > MAX_BINDINGS {
            return Err(ConfigError::TooManyBindings {
                count: self.bindings.len(),
            });
        }
        for (i, binding) in self.bindings.iter().enumerate() {
            binding.validate(i as u8)?;
        }
        self.status.validate()
    }
}

/// Config of one repeating motion binding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionBindingConfig {
    /// Motion is scaled to 25% while this layer is active
    pub slow_layer: u8,
    /// Motion is scaled to 200% while this layer is active, unless the slow layer is active too
    pub fast_layer: u8,
    /// Interval between two motion reports while the key is held
    pub tick_interval: Duration,
    pub mode: MotionMode,
}

impl MotionBindingConfig {
    /// Binding which moves the pointer by a fixed vector while held
    pub const fn fixed(slow_layer: u8, fast_layer: u8, x: i16, y: i16, tick_interval: Duration) -> Self {
        Self {
            slow_layer,
            fast_layer,
            tick_interval,
            mode: MotionMode::Fixed { x, y },
        }
    }

    /// Two-axis binding, the pressed key selects the axis by its input code
    pub const fn per_axis(
        slow_layer: u8,
        fast_layer: u8,
        x_code: u16,
        y_code: u16,
        param: AxisParam,
        tick_interval: Duration,
    ) -> Self {
        Self {
            slow_layer,
            fast_layer,
            tick_interval,
            mode: MotionMode::PerAxis { x_code, y_code, param },
        }
    }

    pub fn validate(&self, binding: u8) -> Result<(), ConfigError> {
        if self.tick_interval.as_ticks() == 0 {
            error!("Motion binding {} has a zero tick interval", binding);
            return Err(ConfigError::ZeroTickInterval { binding });
        }
        for layer in [self.slow_layer, self.fast_layer] {
            if layer as usize >= MAX_LAYERS {
                error!("Motion binding {} uses layer {} out of range", binding, layer);
                return Err(ConfigError::LayerOutOfRange { binding, layer });
            }
        }
        if self.slow_layer == self.fast_layer {
            error!("Motion binding {} uses layer {} as both slow and fast layer", binding, self.slow_layer);
            return Err(ConfigError::SameScaleLayer {
                binding,
                layer: self.slow_layer,
            });
        }
        if let MotionMode::PerAxis { x_code, y_code, .. } = self.mode {
            if x_code == y_code {
                error!("Motion binding {} uses input code {} for both axes", binding, x_code);
                return Err(ConfigError::DuplicateAxisCode { binding, code: x_code });
            }
        }
        Ok(())
    }
}

/// How a motion binding derives its velocity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// Both axes move by a configured vector, the key press carries no parameter
    Fixed { x: i16, y: i16 },
    /// Each press addresses one axis by input code, X and Y can be held independently
    PerAxis { x_code: u16, y_code: u16, param: AxisParam },
}

/// Where the magnitude of a per-axis press comes from.
///
/// Keymaps in the wild bind the two-axis behavior either with the axis code
/// alone or with the axis code plus a signed magnitude. Which one a deployment
/// uses is fixed here, presses of the other shape are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisParam {
    /// The press carries only the axis code and moves by this magnitude
    Implied { magnitude: i16 },
    /// The press carries the axis code and its own signed magnitude
    Explicit,
}

impl Default for AxisParam {
    fn default() -> Self {
        AxisParam::Implied {
            magnitude: DEFAULT_AXIS_MAGNITUDE,
        }
    }
}

/// Per-tick movement of a per-axis binding with an implied magnitude
pub const DEFAULT_AXIS_MAGNITUDE: i16 = 10;

/// Configurations for the status broadcast
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusConfig {
    /// Period of the heartbeat broadcast
    pub heartbeat: Duration,
    /// Delay between transport bring-up and the first write
    pub warmup: Duration,
    pub schema: StatusSchema,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            heartbeat: Duration::from_secs(1),
            warmup: Duration::from_millis(1000),
            schema: StatusSchema::Compact,
        }
    }
}

impl StatusConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.as_ticks() == 0 {
            error!("Status heartbeat period is zero");
            return Err(ConfigError::ZeroHeartbeat);
        }
        Ok(())
    }
}

/// Layout of the status record on the wire.
///
/// The consumer parses records by field name, so a deployment must stick to
/// one schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusSchema {
    /// `{"layer":3,"n":"NAV","b":82,"w":0,"c":1,"nm":0,"s":0,"u":0}\n`
    #[default]
    Compact,
    /// `{"layer":3,"name":"NAV","bat":82,"wpm":0,"caps":1,"num":0,"scrl":0,"usb":0}\n`
    Verbose,
    /// postcard encoded record, COBS framed and terminated by `0x00`
    Postcard,
}
