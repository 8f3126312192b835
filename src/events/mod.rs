//! Wire contract for the screening pipeline's event channel.
//!
//! The pipeline multiplexes many named runs (and, within each, named steps)
//! over one message-oriented connection. Records are JSON objects with a
//! `type` discriminant; run/step correlation uses string-encoded composite
//! keys rather than structured envelopes. Everything fragile about that
//! encoding is isolated here: [`WireEvent`] gives the typed decoding and
//! [`StepKey`]/[`RunErrorKey`] translate the composite keys before anything
//! reaches the fold logic in [`crate::tracker`].

mod keys;
mod wire;

pub use keys::{KEY_DELIMITER, RunErrorKey, StepKey};
pub use wire::{DecodeError, WireEvent, decode_event};
