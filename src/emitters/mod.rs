//! # Source Emitters
//!
//! Concrete [`Emitter`](crate::Emitter) implementations. Delimited text is
//! the one origin shipped today; the contract in [`crate::emitter`] is what
//! downstream stages depend on.

pub mod csv_emitter;

pub use csv_emitter::*;
