//! # Binary Operations
//!
//! The fold capability applied by the reduction executor: a binary operation
//! takes the current accumulator state and one item and produces the next
//! state, or a [`ProcessingError`] when the item cannot be folded.
//!
//! Failure is signalled exclusively through the `Err` arm. The executor only
//! ever assigns `Ok` states to its accumulator, so a failed fold can never
//! corrupt it.
//!
//! ## Example
//!
//! ```rust
//! use streamfold::{BinaryOpFn, ProcessingError};
//!
//! // Sum non-negative numbers, rejecting anything else.
//! let op = BinaryOpFn::new(|state: &i64, item: i64| {
//!   if item < 0 {
//!     return Err(ProcessingError::new(format!("negative item: {item}")));
//!   }
//!   Ok(state + item)
//! });
//! # let _ = op;
//! ```

use async_trait::async_trait;
use crate::context::Context;
use crate::error::ProcessingError;

/// A binary fold operation `(state, item) -> new state`.
///
/// The executor passes a child [`Context`] derived from its own, so
/// long-running operations can observe cancellation mid-fold. Returning
/// `Err` drops the item: the executor reports the error and keeps the
/// previous state.
///
/// When the executor runs with concurrency above 1, items reach the fold in
/// no guaranteed global order; the operation must tolerate reordering (for
/// example by being associative and commutative), or the executor must stay
/// at concurrency 1.
#[async_trait]
pub trait BinaryOperation<T, S>: Send + Sync {
  /// Folds `item` into `state`, producing the next state.
  async fn apply(&self, ctx: &Context, state: &S, item: T) -> Result<S, ProcessingError>;
}

/// Adapter turning a plain closure into a [`BinaryOperation`].
///
/// Covers the common case of a synchronous, context-free fold; implement
/// [`BinaryOperation`] directly when the fold needs to await or to observe
/// cancellation.
pub struct BinaryOpFn<F> {
  f: F,
}

impl<F> BinaryOpFn<F> {
  /// Wraps `f` as a binary operation.
  #[must_use]
  pub fn new(f: F) -> Self {
    Self { f }
  }
}

#[async_trait]
impl<T, S, F> BinaryOperation<T, S> for BinaryOpFn<F>
where
  T: Send + 'static,
  S: Send + Sync + 'static,
  F: Fn(&S, T) -> Result<S, ProcessingError> + Send + Sync,
{
  async fn apply(&self, _ctx: &Context, state: &S, item: T) -> Result<S, ProcessingError> {
    (self.f)(state, item)
  }
}
