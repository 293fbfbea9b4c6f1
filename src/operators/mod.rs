//! # Operator Executors
//!
//! Executors that consume an upstream item stream and run an operation over
//! it. The binary reduction executor, the stateful fold stage at the heart
//! of a pipeline, lives here.

pub mod binary_op;

pub use binary_op::*;
