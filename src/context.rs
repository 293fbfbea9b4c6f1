//! # Cancellation Context
//!
//! Cooperative cancellation handle threaded from the pipeline owner down into
//! every stage. A context carries a one-shot "done" signal: once cancelled it
//! stays cancelled, and every clone and child observes the same signal.
//!
//! Stages never decide *when* to cancel; they only react. Every blocking
//! point in an executor or emitter races its work against
//! [`Context::cancelled`] and winds down promptly when the signal fires.
//!
//! ## Example
//!
//! ```rust
//! use streamfold::Context;
//!
//! let ctx = Context::new();
//! let child = ctx.child();
//!
//! ctx.cancel();
//! assert!(ctx.is_cancelled());
//! assert!(child.is_cancelled());
//! ```

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Cancellation handle shared by every stage of a pipeline run.
///
/// Cloning shares the same signal. [`Context::child`] derives a handle that
/// observes this context's cancellation but can also be cancelled on its own
/// without affecting the parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
  token: CancellationToken,
}

impl Context {
  /// Creates a root context that is not yet cancelled.
  #[must_use]
  pub fn new() -> Self {
    Self {
      token: CancellationToken::new(),
    }
  }

  /// Derives a child context.
  ///
  /// The child is cancelled whenever this context is cancelled; cancelling
  /// the child leaves this context untouched.
  #[must_use]
  pub fn child(&self) -> Self {
    Self {
      token: self.token.child_token(),
    }
  }

  /// Signals cancellation to every holder of this context and its children.
  pub fn cancel(&self) {
    self.token.cancel();
  }

  /// Returns `true` once cancellation has been signalled.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.token.is_cancelled()
  }

  /// Completes when cancellation is signalled.
  ///
  /// Completes immediately if the context is already cancelled.
  pub async fn cancelled(&self) {
    self.token.cancelled().await;
  }

  /// Cancels this context once `timeout` has elapsed.
  ///
  /// Spawns the timer task immediately and returns; must be called within a
  /// Tokio runtime.
  pub fn cancel_after(&self, timeout: Duration) {
    let token = self.token.clone();
    tokio::spawn(async move {
      tokio::time::sleep(timeout).await;
      token.cancel();
    });
  }
}
