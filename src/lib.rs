//! # StreamFold
//!
//! Concurrent stateful reduction for streaming pipelines in pure Rust.
//!
//! StreamFold provides the execution core of a streaming dataflow pipeline:
//! bounded, ordered item streams connect stages; a cancellation context is
//! threaded through every stage; source emitters parse external origins into
//! item streams; and the binary reduction executor folds every item into a
//! single accumulator across a configurable worker pool.
//!
//! ## Key Features
//!
//! - **Exactly-once emission**: every run produces one final accumulator
//!   value and then closes its output, under completion and cancellation
//!   alike
//! - **Single-owner folding**: workers fan out upstream consumption, but all
//!   folds happen sequentially in one accumulator-owning task
//! - **Cooperative cancellation**: every blocking point races the
//!   cancellation context
//! - **Drop-and-log error policy**: a failed fold never corrupts the
//!   accumulator; the item is dropped and reported
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use streamfold::{BinaryOpExecutor, BinaryOpFn, Context, stream};
//!
//! # async fn demo() -> Result<(), streamfold::ConfigError> {
//! let (tx, rx) = stream::channel(16);
//! tokio::spawn(async move {
//!   for n in 1..=3i64 {
//!     if tx.send(n).await.is_err() {
//!       break;
//!     }
//!   }
//! });
//!
//! let mut executor = BinaryOpExecutor::<i64, i64>::new(Context::new());
//! executor.set_operation(BinaryOpFn::new(|state: &i64, item| Ok(state + item)));
//! executor.set_input(rx);
//! let mut output = executor.output();
//! executor.run()?;
//!
//! assert_eq!(output.recv().await, Some(6));
//! # Ok(())
//! # }
//! ```

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Cooperative cancellation context threaded through every stage.
pub mod context;
/// Injected plain-text logging capability.
pub mod diagnostics;
/// Source emitter contract.
pub mod emitter;
/// Concrete source emitters (delimited text).
pub mod emitters;
/// Error taxonomy: configuration, setup, and per-item processing errors.
pub mod error;
/// Binary fold operation trait and closure adapter.
pub mod operation;
/// Operator executors; the binary reduction executor lives here.
pub mod operators;
/// Bounded, ordered item streams and bridges to `futures` streams.
pub mod stream;

pub use context::Context;
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use emitter::Emitter;
pub use emitters::{CsvEmitter, CsvReadConfig};
pub use error::{ConfigError, OpenError, ProcessingError};
pub use operation::{BinaryOpFn, BinaryOperation};
pub use operators::{BinaryOpExecutor, RunState};
pub use stream::{ItemReceiver, ItemSender};

#[cfg(test)]
mod context_test;
#[cfg(test)]
mod error_test;
