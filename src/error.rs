//! # Error Types
//!
//! Error taxonomy for the reduction executor and source emitters:
//!
//! - **Configuration errors** fail `run` synchronously before anything is
//!   spawned ([`ConfigError`]).
//! - **Setup errors** surface from an emitter's `open` ([`OpenError`]).
//! - **Per-item processing errors** ([`ProcessingError`]) are absorbed by
//!   the executor's drop-and-log policy and never propagate out of a run.
//!
//! Cancellation is deliberately absent here: it is a normal termination
//! mode, observable through the executor's cancelled flag, not an error.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Configuration error returned synchronously by
/// [`BinaryOpExecutor::run`](crate::BinaryOpExecutor::run).
#[derive(Debug, Error)]
pub enum ConfigError {
  /// No input stream was wired before `run`, or a previous run consumed it.
  #[error("no input stream set")]
  MissingInput,
  /// `run` was already called on this executor.
  #[error("executor already ran")]
  AlreadyRan,
}

/// Setup error returned by an emitter's [`open`](crate::Emitter::open).
#[derive(Debug, Error)]
pub enum OpenError {
  /// No source was supplied, or `open` already consumed it.
  #[error("no source set")]
  MissingSource,
  /// The source could not be opened.
  #[error("failed to open source: {0}")]
  Io(#[from] std::io::Error),
}

/// Failure produced by a binary operation for a single item.
///
/// A `ProcessingError` never becomes accumulator state: the executor
/// reports it through diagnostics, drops the item, and keeps the previous
/// state. The timestamp records the moment of failure so reports line up
/// with surrounding log output.
#[derive(Debug, Clone)]
pub struct ProcessingError {
  message: String,
  timestamp: DateTime<Utc>,
}

impl ProcessingError {
  /// Creates a processing error stamped with the current time.
  #[must_use]
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      timestamp: Utc::now(),
    }
  }

  /// The failure description.
  #[must_use]
  pub fn message(&self) -> &str {
    &self.message
  }

  /// When the failure occurred.
  #[must_use]
  pub fn timestamp(&self) -> DateTime<Utc> {
    self.timestamp
  }
}

impl fmt::Display for ProcessingError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "processing error: {}", self.message)
  }
}

impl std::error::Error for ProcessingError {}
