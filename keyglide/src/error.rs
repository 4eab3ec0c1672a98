//! Error types.
//!
//! None of these ever escalate past the engine that produced them: a bad
//! binding is refused when the engine is built, a record that doesn't fit is
//! dropped, and transport failures are swallowed until the next heartbeat.

/// Invalid static configuration, detected when the configuration is loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A motion binding has a zero tick interval
    ZeroTickInterval { binding: u8 },
    /// A per-axis binding uses the same input code for both axes
    DuplicateAxisCode { binding: u8, code: u16 },
    /// The slow and the fast layer of a binding are the same layer
    SameScaleLayer { binding: u8, layer: u8 },
    /// A layer index doesn't fit in the layer bitmask
    LayerOutOfRange { binding: u8, layer: u8 },
    /// More bindings than the engine has slots for
    TooManyBindings { count: usize },
    /// The status heartbeat period is zero
    ZeroHeartbeat,
}

/// Status record encoding failed, the record is dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The record doesn't fit into the record buffer
    Overflow,
    /// The binary serializer failed
    Serialize,
}

/// Failures of the status transport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Bring-up hasn't completed yet, or the link went away
    NotReady,
    /// The underlying serial write failed
    Write,
}
