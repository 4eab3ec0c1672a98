//! Pointer motion axes.

use serde::{Deserialize, Serialize};

/// One axis of a two-axis pointer motion vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X = 0,
    Y = 1,
}

impl Axis {
    /// Index of the axis in a `[_; 2]` vector
    pub const fn index(self) -> usize {
        self as usize
    }
}
