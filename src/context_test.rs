//! # Cancellation Context Test Suite
//!
//! Covers signal propagation to clones and children, child isolation from
//! the parent, waking of pending waiters, and the deadline helper.

use crate::context::Context;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_context_starts_uncancelled() {
  let ctx = Context::new();
  assert!(!ctx.is_cancelled());
}

#[tokio::test]
async fn test_context_cancel_reaches_clones_and_children() {
  let ctx = Context::new();
  let clone = ctx.clone();
  let child = ctx.child();
  let grandchild = child.child();

  ctx.cancel();

  assert!(ctx.is_cancelled());
  assert!(clone.is_cancelled());
  assert!(child.is_cancelled());
  assert!(grandchild.is_cancelled());
}

#[tokio::test]
async fn test_context_child_cancel_leaves_parent_untouched() {
  let ctx = Context::new();
  let child = ctx.child();

  child.cancel();

  assert!(child.is_cancelled());
  assert!(!ctx.is_cancelled());
}

#[tokio::test]
async fn test_context_cancelled_wakes_pending_waiters() {
  let ctx = Context::new();
  let waiter = ctx.child();

  let handle = tokio::spawn(async move {
    waiter.cancelled().await;
  });

  ctx.cancel();

  timeout(Duration::from_secs(1), handle)
    .await
    .expect("waiter should wake after cancel")
    .expect("waiter task should not panic");
}

#[tokio::test]
async fn test_context_cancelled_completes_immediately_when_already_cancelled() {
  let ctx = Context::new();
  ctx.cancel();

  timeout(Duration::from_millis(100), ctx.cancelled())
    .await
    .expect("already-cancelled context should complete at once");
}

#[tokio::test]
async fn test_context_cancel_after_fires_deadline() {
  let ctx = Context::new();
  ctx.cancel_after(Duration::from_millis(20));

  assert!(!ctx.is_cancelled());

  timeout(Duration::from_secs(1), ctx.cancelled())
    .await
    .expect("deadline should cancel the context");
  assert!(ctx.is_cancelled());
}
