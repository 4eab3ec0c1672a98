use crate::layer::LayerState;

/// Speed tier selected by the layer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScaleTier {
    Slow,
    Normal,
    Fast,
}

impl ScaleTier {
    /// Pick the tier for the current layer state, the slow layer wins over the fast one
    pub fn resolve<L: LayerState>(layers: &L, slow_layer: u8, fast_layer: u8) -> Self {
        if layers.is_layer_active(slow_layer) {
            ScaleTier::Slow
        } else if layers.is_layer_active(fast_layer) {
            ScaleTier::Fast
        } else {
            ScaleTier::Normal
        }
    }

    pub const fn percent(self) -> i32 {
        match self {
            ScaleTier::Slow => 25,
            ScaleTier::Normal => 100,
            ScaleTier::Fast => 200,
        }
    }
}

/// Scale one axis of a held velocity.
///
/// The division truncates toward zero, but a non-zero velocity never scales
/// down to zero: a held key always moves the pointer by at least one unit.
/// The result saturates to the `i16` range.
pub fn scale_axis(velocity: i32, tier: ScaleTier) -> i16 {
    if velocity == 0 {
        return 0;
    }
    let mut scaled = velocity.saturating_mul(tier.percent()) / 100;
    if scaled == 0 {
        scaled = velocity.signum();
    }
    scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layer::LayerRegistry;

    #[test]
    fn tier_resolution() {
        let layers = LayerRegistry::new(&[]);
        assert_eq!(ScaleTier::resolve(&layers, 5, 6), ScaleTier::Normal);
        layers.activate(6);
        assert_eq!(ScaleTier::resolve(&layers, 5, 6), ScaleTier::Fast);
        layers.activate(5);
        assert_eq!(ScaleTier::resolve(&layers, 5, 6), ScaleTier::Slow);
    }

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(scale_axis(10, ScaleTier::Slow), 2);
        assert_eq!(scale_axis(-10, ScaleTier::Slow), -2);
        assert_eq!(scale_axis(7, ScaleTier::Fast), 14);
        assert_eq!(scale_axis(-7, ScaleTier::Normal), -7);
    }

    #[test]
    fn small_velocity_never_stalls() {
        assert_eq!(scale_axis(1, ScaleTier::Slow), 1);
        assert_eq!(scale_axis(3, ScaleTier::Slow), 1);
        assert_eq!(scale_axis(-3, ScaleTier::Slow), -1);
        assert_eq!(scale_axis(0, ScaleTier::Fast), 0);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(scale_axis(i16::MAX as i32, ScaleTier::Fast), i16::MAX);
        assert_eq!(scale_axis(i16::MIN as i32, ScaleTier::Fast), i16::MIN);
        assert_eq!(scale_axis(i32::MAX, ScaleTier::Fast), i16::MAX);
    }
}
