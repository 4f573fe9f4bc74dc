//! telemetry/mod.rs
//! Byte and chunk counters, stage timers and immutable snapshots for the
//! encrypt/decrypt entry points.
//!
//! Counters are shared between the outermost API call and the packet layer
//! doing the work through a cloneable [`Telemetry`] handle.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
