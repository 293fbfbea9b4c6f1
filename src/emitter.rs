//! # Source Emitter Contract
//!
//! A source emitter originates items from an external origin, such as a
//! file or an in-memory reader, and parses them into an item stream for
//! downstream stages.
//!
//! Emitters are configured fluently before [`open`](Emitter::open); options
//! are inert once production has started. `open` begins asynchronous
//! production and returns only immediate setup failures (a missing source,
//! an unopenable file). Runtime per-item failures are logged and skipped,
//! never surfaced through `open`. The output stream closes exactly once:
//! when the source is exhausted or when the supplied context is cancelled.

use async_trait::async_trait;
use crate::context::Context;
use crate::error::OpenError;
use crate::stream::ItemReceiver;

/// A source stage that produces items into an item stream.
#[async_trait]
pub trait Emitter {
  /// The item type this emitter produces.
  type Item: Send + 'static;

  /// Begins asynchronous production into the output stream.
  ///
  /// Returns an error only for immediate setup failures; per-item runtime
  /// failures are reported through diagnostics and skipped.
  async fn open(&mut self, ctx: &Context) -> Result<(), OpenError>;

  /// Takes the receiving half of the output stream.
  ///
  /// May be called before or after [`open`](Emitter::open), but only once.
  ///
  /// # Panics
  ///
  /// Panics if called more than once.
  fn output(&mut self) -> ItemReceiver<Self::Item>;
}
