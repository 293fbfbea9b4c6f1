//! # Diagnostics
//!
//! Plain-text logging capability injected into the reduction executor at
//! construction time. Keeping the capability explicit (rather than pulled
//! from ambient state) lets tests swap in a recording implementation and
//! assert on exactly what a run reported.
//!
//! The default implementation forwards to [`tracing`] with a `component`
//! field identifying the stage.

use tracing::{error, info, warn};

/// Logging capability used by pipeline components.
///
/// Implementations must be safe to call from multiple tasks at once.
pub trait Diagnostics: Send + Sync {
  /// Records an informational lifecycle event (startup, shutdown).
  fn info(&self, message: &str);

  /// Records a non-fatal misconfiguration or degraded mode.
  fn warn(&self, message: &str);

  /// Records an absorbed failure, such as a dropped item.
  fn error(&self, message: &str);
}

/// [`Diagnostics`] implementation backed by the [`tracing`] macros.
///
/// Every event carries a `component` field naming the emitting stage.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
  component: String,
}

impl TracingDiagnostics {
  /// Creates a diagnostics sink labelled with `component`.
  #[must_use]
  pub fn new(component: impl Into<String>) -> Self {
    Self {
      component: component.into(),
    }
  }
}

impl Diagnostics for TracingDiagnostics {
  fn info(&self, message: &str) {
    info!(component = %self.component, "{}", message);
  }

  fn warn(&self, message: &str) {
    warn!(component = %self.component, "{}", message);
  }

  fn error(&self, message: &str) {
    error!(component = %self.component, "{}", message);
  }
}
