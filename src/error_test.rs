//! # Error Types Test Suite
//!
//! Covers display formatting for the configuration and setup errors, the
//! io conversion and source chain, and the processing error's message,
//! timestamp, and `std::error::Error` integration.

use chrono::Utc;
use crate::error::{ConfigError, OpenError, ProcessingError};
use std::error::Error;

#[test]
fn test_config_error_display() {
  assert_eq!(ConfigError::MissingInput.to_string(), "no input stream set");
  assert_eq!(ConfigError::AlreadyRan.to_string(), "executor already ran");
}

#[test]
fn test_open_error_display_missing_source() {
  assert_eq!(OpenError::MissingSource.to_string(), "no source set");
}

#[test]
fn test_open_error_from_io() {
  let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone.csv");
  let err = OpenError::from(io);

  assert!(matches!(err, OpenError::Io(_)));
  let display = err.to_string();
  assert!(display.contains("failed to open source"));
  assert!(display.contains("gone.csv"));
}

#[test]
fn test_open_error_io_exposes_source() {
  let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
  let err = OpenError::from(io);

  let source = err.source().expect("io variant should chain its source");
  assert!(source.to_string().contains("locked"));
}

#[test]
fn test_processing_error_message() {
  let err = ProcessingError::new("bad record");
  assert_eq!(err.message(), "bad record");
}

#[test]
fn test_processing_error_display() {
  let err = ProcessingError::new("bad record");
  assert_eq!(err.to_string(), "processing error: bad record");
}

#[test]
fn test_processing_error_timestamp_is_current() {
  let before = Utc::now();
  let err = ProcessingError::new("late");
  let after = Utc::now();

  assert!(err.timestamp() >= before);
  assert!(err.timestamp() <= after);
}

#[test]
fn test_processing_error_clone_preserves_fields() {
  let err = ProcessingError::new("original");
  let cloned = err.clone();

  assert_eq!(cloned.message(), err.message());
  assert_eq!(cloned.timestamp(), err.timestamp());
}

#[test]
fn test_processing_error_is_std_error() {
  let err = ProcessingError::new("boxed");
  let dyn_err: &dyn Error = &err;
  assert!(dyn_err.source().is_none());
}
