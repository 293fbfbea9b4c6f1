//! # CSV Emitter
//!
//! Source emitter that parses delimited text into typed records. Each
//! record is deserialized into the caller's type via `serde` and forwarded
//! onto the output stream; parsing runs on a blocking task so the async
//! runtime never stalls on file I/O.
//!
//! Per-record parse failures are logged with the component name and
//! skipped; only setup failures (missing source, unopenable file) surface
//! from [`open`](crate::Emitter::open). Cancellation is honored between
//! records and while waiting on a full output buffer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use streamfold::{Context, CsvEmitter, Emitter};
//!
//! #[derive(Debug, Deserialize)]
//! struct Reading {
//!   sensor: String,
//!   value: f64,
//! }
//!
//! # async fn demo() -> Result<(), streamfold::OpenError> {
//! let mut emitter = CsvEmitter::<Reading>::from_path("readings.csv").with_delimiter(b';');
//! let mut records = emitter.output();
//! emitter.open(&Context::new()).await?;
//!
//! while let Some(reading) = records.recv().await {
//!   println!("{} = {}", reading.sensor, reading.value);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use crate::context::Context;
use crate::emitter::Emitter;
use crate::error::OpenError;
use crate::stream::{self, ItemReceiver, ItemSender};
use csv::Trim;
use serde::de::DeserializeOwned;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info};

/// Poll interval while the output buffer stays full.
const SEND_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Configuration for CSV reading behavior.
#[derive(Debug, Clone)]
pub struct CsvReadConfig {
  /// Whether the first record is a header row.
  pub has_headers: bool,
  /// The delimiter character (default: comma).
  pub delimiter: u8,
  /// The comment character; records starting with it are skipped
  /// (`None` means no comments).
  pub comment: Option<u8>,
  /// Whether to allow records with varying field counts.
  pub flexible: bool,
  /// Whether to trim whitespace from fields.
  pub trim: bool,
  /// The quote character (default: double quote).
  pub quote: u8,
  /// Whether double quotes are used for escaping.
  pub double_quote: bool,
}

impl Default for CsvReadConfig {
  fn default() -> Self {
    Self {
      has_headers: true,
      delimiter: b',',
      comment: None,
      flexible: false,
      trim: false,
      quote: b'"',
      double_quote: true,
    }
  }
}

impl CsvReadConfig {
  /// Sets whether the first record is a header row.
  #[must_use]
  pub fn with_headers(mut self, has_headers: bool) -> Self {
    self.has_headers = has_headers;
    self
  }

  /// Sets the delimiter character.
  #[must_use]
  pub fn with_delimiter(mut self, delimiter: u8) -> Self {
    self.delimiter = delimiter;
    self
  }

  /// Sets the comment character.
  #[must_use]
  pub fn with_comment(mut self, comment: Option<u8>) -> Self {
    self.comment = comment;
    self
  }

  /// Sets whether to allow records with varying field counts.
  #[must_use]
  pub fn with_flexible(mut self, flexible: bool) -> Self {
    self.flexible = flexible;
    self
  }

  /// Sets whether to trim whitespace from fields.
  #[must_use]
  pub fn with_trim(mut self, trim: bool) -> Self {
    self.trim = trim;
    self
  }
}

enum CsvSource {
  Path(PathBuf),
  Reader(Box<dyn Read + Send>),
}

/// Source emitter that reads delimited text and deserializes each record
/// into `T`.
///
/// Construct with [`from_path`](Self::from_path) or
/// [`from_reader`](Self::from_reader), apply options fluently, then
/// [`open`](crate::Emitter::open). Options are inert after opening.
pub struct CsvEmitter<T>
where
  T: DeserializeOwned + Send + 'static,
{
  source: Option<CsvSource>,
  /// CSV parsing configuration, snapshotted when `open` is called.
  pub config: CsvReadConfig,
  name: String,
  output_tx: Option<ItemSender<T>>,
  output_rx: Option<ItemReceiver<T>>,
}

impl<T> CsvEmitter<T>
where
  T: DeserializeOwned + Send + 'static,
{
  fn new(source: CsvSource) -> Self {
    let (output_tx, output_rx) = stream::channel(stream::DEFAULT_CAPACITY);
    Self {
      source: Some(source),
      config: CsvReadConfig::default(),
      name: "csv_emitter".to_string(),
      output_tx: Some(output_tx),
      output_rx: Some(output_rx),
    }
  }

  /// Creates an emitter reading the file at `path`.
  #[must_use]
  pub fn from_path(path: impl Into<PathBuf>) -> Self {
    Self::new(CsvSource::Path(path.into()))
  }

  /// Creates an emitter reading from an already-open reader.
  #[must_use]
  pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
    Self::new(CsvSource::Reader(Box::new(reader)))
  }

  /// Sets whether the first record is a header row (default: `true`).
  #[must_use]
  pub fn with_headers(mut self, has_headers: bool) -> Self {
    self.config.has_headers = has_headers;
    self
  }

  /// Sets the delimiter character (default: comma).
  #[must_use]
  pub fn with_delimiter(mut self, delimiter: u8) -> Self {
    self.config.delimiter = delimiter;
    self
  }

  /// Sets the comment character; records starting with it are skipped.
  #[must_use]
  pub fn with_comment(mut self, comment: Option<u8>) -> Self {
    self.config.comment = comment;
    self
  }

  /// Sets whether to allow records with varying field counts.
  #[must_use]
  pub fn with_flexible(mut self, flexible: bool) -> Self {
    self.config.flexible = flexible;
    self
  }

  /// Sets whether to trim whitespace from fields.
  #[must_use]
  pub fn with_trim(mut self, trim: bool) -> Self {
    self.config.trim = trim;
    self
  }

  /// Sets the component name used in log output.
  #[must_use]
  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// The component name used in log output.
  #[must_use]
  pub fn name(&self) -> &str {
    &self.name
  }
}

#[async_trait]
impl<T> Emitter for CsvEmitter<T>
where
  T: DeserializeOwned + Send + 'static,
{
  type Item = T;

  async fn open(&mut self, ctx: &Context) -> Result<(), OpenError> {
    let source = self.source.take().ok_or(OpenError::MissingSource)?;
    let output_tx = self.output_tx.take().ok_or(OpenError::MissingSource)?;

    let reader: Box<dyn Read + Send> = match source {
      CsvSource::Path(path) => {
        let file = tokio::fs::File::open(&path).await?;
        Box::new(BufReader::new(file.into_std().await))
      }
      CsvSource::Reader(reader) => reader,
    };

    let config = self.config.clone();
    let name = self.name.clone();
    let ctx = ctx.clone();
    info!(component = %name, "execution started");

    tokio::task::spawn_blocking(move || {
      let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(config.has_headers)
        .delimiter(config.delimiter)
        .comment(config.comment)
        .flexible(config.flexible)
        .trim(if config.trim { Trim::All } else { Trim::None })
        .quote(config.quote)
        .double_quote(config.double_quote)
        .from_reader(reader);

      for result in csv_reader.deserialize::<T>() {
        if ctx.is_cancelled() {
          info!(component = %name, "cancelled; stopping read");
          break;
        }
        match result {
          Ok(record) => {
            if !forward_record(&output_tx, &ctx, &name, record) {
              break;
            }
          }
          Err(e) => {
            error!(
              component = %name,
              error = %e,
              "failed to parse record; skipping"
            );
          }
        }
      }
      // Dropping the sender here closes the output stream, once, on
      // every path out of the loop.
    });

    Ok(())
  }

  fn output(&mut self) -> ItemReceiver<T> {
    self.output_rx.take().expect("output stream already taken")
  }
}

/// Forwards one record into the output, retrying while the buffer is full
/// and polling cancellation between attempts. Returns `false` when
/// production should stop: the receiver is gone or cancellation fired.
fn forward_record<T>(output_tx: &ItemSender<T>, ctx: &Context, name: &str, record: T) -> bool {
  let mut pending = record;
  loop {
    match output_tx.try_send(pending) {
      Ok(()) => return true,
      Err(TrySendError::Full(record)) => {
        if ctx.is_cancelled() {
          info!(component = %name, "cancelled; stopping read");
          return false;
        }
        pending = record;
        thread::sleep(SEND_RETRY_DELAY);
      }
      Err(TrySendError::Closed(_)) => return false,
    }
  }
}
