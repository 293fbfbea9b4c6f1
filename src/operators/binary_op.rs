//! # Binary Reduction Executor
//!
//! Folds every item from an upstream stream into a single accumulator using
//! a caller-supplied [`BinaryOperation`], optionally fanning upstream
//! consumption across a fixed pool of workers, and emits exactly one final
//! accumulator value before closing its output.
//!
//! ## Execution model
//!
//! Workers never touch the accumulator. Each worker pulls items from the
//! shared input and hands them to the coordinator through an internal funnel
//! channel; the coordinator owns the accumulator outright and performs every
//! fold sequentially. "One fold at a time" is therefore structural, not a
//! locking discipline, while upstream consumption still fans out.
//!
//! Items are folded in arrival order with respect to a single worker, but
//! there is no total order across workers above concurrency 1. Use an
//! order-insensitive operation there, or keep concurrency at 1.
//!
//! A fold that returns `Err` is reported through diagnostics and the item
//! is dropped; the accumulator keeps its previous value. Cancellation is a
//! normal termination mode: the run is marked cancelled, and the final
//! emission still happens with whatever the accumulator held at that
//! moment. The emit-then-close step runs on every exit path, including a
//! panicking operation.
//!
//! ## Example
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
//! assert_eq!(output.recv().await, None);
//! # Ok(())
//! # }
//! ```

use crate::context::Context;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::ConfigError;
use crate::operation::BinaryOperation;
use crate::stream::{self, ItemReceiver, ItemSender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use tokio::sync::{Mutex, mpsc};

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_COMPLETED: u8 = 2;
const STATE_CANCELLED: u8 = 3;
const STATE_CLOSED: u8 = 4;

/// Lifecycle of a single executor run.
///
/// `Idle → Running → {Completed | Cancelled} → Closed`; there is no
/// transition out of `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
  /// Configured but not yet running.
  Idle,
  /// Coordinator and workers are active.
  Running,
  /// Input was exhausted and every fold finished.
  Completed,
  /// The cancellation context fired before input was exhausted.
  Cancelled,
  /// The final value was emitted and the output stream closed.
  Closed,
}

fn decode_state(raw: u8) -> RunState {
  match raw {
    STATE_RUNNING => RunState::Running,
    STATE_COMPLETED => RunState::Completed,
    STATE_CANCELLED => RunState::Cancelled,
    STATE_CLOSED => RunState::Closed,
    _ => RunState::Idle,
  }
}

/// Concurrent stateful-reduction executor.
///
/// Configure with the `set_*` methods, take [`output`](Self::output), then
/// start the run with [`run`](Self::run). See the [module docs](self) for
/// the execution model and ordering guarantees.
pub struct BinaryOpExecutor<T, S>
where
  T: Send + 'static,
  S: Default + Send + Sync + 'static,
{
  ctx: Context,
  operation: Option<Arc<dyn BinaryOperation<T, S>>>,
  initial_state: Option<S>,
  concurrency: usize,
  input: Option<ItemReceiver<T>>,
  output_tx: Option<ItemSender<S>>,
  output_rx: Option<ItemReceiver<S>>,
  diagnostics: Arc<dyn Diagnostics>,
  run_state: Arc<AtomicU8>,
  cancelled: Arc<AtomicBool>,
}

impl<T, S> BinaryOpExecutor<T, S>
where
  T: Send + 'static,
  S: Default + Send + Sync + 'static,
{
  /// Creates an executor bound to `ctx`, with concurrency 1 and a
  /// [`TracingDiagnostics`] sink.
  #[must_use]
  pub fn new(ctx: Context) -> Self {
    let (output_tx, output_rx) = stream::channel(stream::DEFAULT_CAPACITY);
    let diagnostics: Arc<dyn Diagnostics> = Arc::new(TracingDiagnostics::new("binary_op"));
    diagnostics.info("component initialized");
    Self {
      ctx,
      operation: None,
      initial_state: None,
      concurrency: 1,
      input: None,
      output_tx: Some(output_tx),
      output_rx: Some(output_rx),
      diagnostics,
      run_state: Arc::new(AtomicU8::new(STATE_IDLE)),
      cancelled: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Replaces the diagnostics sink.
  #[must_use]
  pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
    self.diagnostics = Arc::new(diagnostics);
    self
  }

  /// Installs the binary operation folded over incoming items.
  ///
  /// Running without one degrades to a pass-through: items are consumed,
  /// the state never changes, and the unchanged state is still emitted
  /// once the input closes. The degraded mode is reported as a warning.
  pub fn set_operation(&mut self, op: impl BinaryOperation<T, S> + 'static) {
    self.operation = Some(Arc::new(op));
  }

  /// Seeds the accumulator used for the first fold.
  ///
  /// When never called, the accumulator starts as `S::default()`.
  pub fn set_initial_state(&mut self, state: S) {
    self.initial_state = Some(state);
  }

  /// Sets the worker count; values below 1 clamp to 1.
  ///
  /// Fixed once [`run`](Self::run) starts. Above 1, items reach the fold
  /// in no guaranteed global order; the operation must tolerate
  /// reordering.
  pub fn set_concurrency(&mut self, concurrency: usize) {
    self.concurrency = concurrency.max(1);
  }

  /// Wires the upstream item stream.
  pub fn set_input(&mut self, input: ItemReceiver<T>) {
    self.input = Some(input);
  }

  /// Takes the output stream.
  ///
  /// Exactly one value is emitted per run (the final accumulator), after
  /// which the stream closes.
  ///
  /// # Panics
  ///
  /// Panics if called more than once.
  pub fn output(&mut self) -> ItemReceiver<S> {
    self.output_rx.take().expect("output stream already taken")
  }

  /// Current lifecycle state of the run.
  #[must_use]
  pub fn state(&self) -> RunState {
    decode_state(self.run_state.load(Ordering::SeqCst))
  }

  /// Returns `true` once the run has observed cancellation rather than
  /// input exhaustion. Remains readable after shutdown.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }

  /// Starts the background coordinator and returns immediately.
  ///
  /// Fails synchronously only for configuration mistakes (no input wired,
  /// or a repeated `run`); a rejected call spawns nothing and leaves the
  /// wiring untouched. Every runtime failure is absorbed: failed folds
  /// are reported and their items dropped, and cancellation still
  /// produces the single final emission.
  ///
  /// Must be called within a Tokio runtime.
  pub fn run(&mut self) -> Result<(), ConfigError> {
    let input = self.input.take().ok_or(ConfigError::MissingInput)?;
    if self
      .run_state
      .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::SeqCst, Ordering::SeqCst)
      .is_err()
    {
      self.input = Some(input);
      return Err(ConfigError::AlreadyRan);
    }
    let output_tx = self.output_tx.take().ok_or(ConfigError::AlreadyRan)?;

    if self.operation.is_none() {
      self
        .diagnostics
        .warn("no operation configured; passing items through unchanged");
    }
    self.diagnostics.info("execution started");

    let ctx = self.ctx.clone();
    let operation = self.operation.clone();
    let initial = self.initial_state.take().unwrap_or_default();
    let concurrency = self.concurrency;
    let diagnostics = self.diagnostics.clone();
    let run_state = self.run_state.clone();
    let cancelled = self.cancelled.clone();

    tokio::spawn(async move {
      let (funnel_tx, mut funnel_rx) = mpsc::channel::<T>(concurrency);
      let shared_input = Arc::new(Mutex::new(input));
      for _ in 0..concurrency {
        tokio::spawn(worker_loop(
          ctx.clone(),
          Arc::clone(&shared_input),
          funnel_tx.clone(),
          Arc::clone(&cancelled),
        ));
      }
      // The coordinator's own handle must go, or the funnel never closes.
      drop(funnel_tx);

      let shutdown_diagnostics = diagnostics.clone();
      let shutdown_state = run_state.clone();
      // Emit-then-close runs when this guard drops, on every exit path
      // out of the fold loop, including an unwinding operation. The
      // try_send cannot hit a full buffer: the guard is the channel's
      // only writer and the capacity is nonzero.
      let mut acc = scopeguard::guard((initial, output_tx), move |(state, output)| {
        if output.try_send(state).is_err() {
          shutdown_diagnostics.warn("output receiver dropped before final emission");
        }
        shutdown_state.store(STATE_CLOSED, Ordering::SeqCst);
        shutdown_diagnostics.info("shutting down component");
      });

      let op_ctx = ctx.child();
      let was_cancelled = loop {
        let item = tokio::select! {
          _ = ctx.cancelled() => break true,
          item = funnel_rx.recv() => match item {
            Some(item) => item,
            None => break false,
          },
        };
        if let Some(op) = operation.as_ref() {
          let outcome = tokio::select! {
            _ = ctx.cancelled() => break true,
            outcome = op.apply(&op_ctx, &acc.0, item) => outcome,
          };
          match outcome {
            Ok(next) => acc.0 = next,
            Err(err) => diagnostics.error(&format!("operation failed; item dropped: {err}")),
          }
        }
        // Without an operation the item is consumed and the state stands.
      };

      // A worker that saw cancellation may close the funnel before the
      // coordinator polls; the flag records those exits.
      if was_cancelled || cancelled.load(Ordering::SeqCst) {
        cancelled.store(true, Ordering::SeqCst);
        run_state.store(STATE_CANCELLED, Ordering::SeqCst);
        diagnostics.info("execution cancelled");
      } else {
        run_state.store(STATE_COMPLETED, Ordering::SeqCst);
      }
    });

    Ok(())
  }
}

/// Pulls items from the shared input and forwards them into the funnel
/// until the input closes, the funnel closes, or cancellation fires.
/// Cancellation exits record the shared flag before the worker's funnel
/// sender drops; the coordinator's completion path consults it.
///
/// The input lock is held only for one `recv`, never across the funnel
/// send, so workers interleave on the upstream instead of convoying.
async fn worker_loop<T: Send + 'static>(
  ctx: Context,
  input: Arc<Mutex<ItemReceiver<T>>>,
  funnel: mpsc::Sender<T>,
  cancelled: Arc<AtomicBool>,
) {
  loop {
    let item = {
      let mut receiver = tokio::select! {
        _ = ctx.cancelled() => {
          cancelled.store(true, Ordering::SeqCst);
          break;
        }
        guard = input.lock() => guard,
      };
      tokio::select! {
        _ = ctx.cancelled() => {
          cancelled.store(true, Ordering::SeqCst);
          break;
        }
        item = receiver.recv() => match item {
          Some(item) => item,
          None => break,
        },
      }
    };
    tokio::select! {
      _ = ctx.cancelled() => {
        cancelled.store(true, Ordering::SeqCst);
        break;
      }
      sent = funnel.send(item) => {
        if sent.is_err() {
          break;
        }
      }
    }
  }
}
