//! # Item Streams
//!
//! Bounded, ordered channels carrying typed items between pipeline stages.
//! Dropping every sender closes the stream, and that closure is the
//! end-of-data signal: a stage that sees `None` from its receiver knows the
//! upstream is exhausted, not merely slow.
//!
//! The aliases here are thin: an item stream is a `tokio` mpsc channel, so
//! backpressure comes from the bounded capacity and ordering is the
//! per-sender FIFO guarantee of the underlying channel. Bridges to and from
//! [`futures::Stream`] are provided for code that composes with stream
//! combinators.
//!
//! ## Example
//!
//! ```rust
//! use streamfold::stream;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (tx, mut rx) = stream::channel(8);
//! tx.send("first").await.unwrap();
//! drop(tx);
//!
//! assert_eq!(rx.recv().await, Some("first"));
//! assert_eq!(rx.recv().await, None);
//! # }
//! ```

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Default capacity for item streams created by emitters and executors.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Sending half of an item stream.
pub type ItemSender<T> = mpsc::Sender<T>;

/// Receiving half of an item stream.
pub type ItemReceiver<T> = mpsc::Receiver<T>;

/// Creates a bounded item stream.
///
/// # Panics
///
/// Panics if `capacity` is zero, matching the underlying channel.
#[must_use]
pub fn channel<T>(capacity: usize) -> (ItemSender<T>, ItemReceiver<T>) {
  mpsc::channel(capacity)
}

/// Forwards a [`futures::Stream`] into a bounded item stream.
///
/// Spawns a forwarding task that drains `source` and stops as soon as the
/// returned receiver is dropped. Must be called within a Tokio runtime.
pub fn from_stream<S>(source: S) -> ItemReceiver<S::Item>
where
  S: Stream + Send + 'static,
  S::Item: Send + 'static,
{
  let (tx, rx) = mpsc::channel(DEFAULT_CAPACITY);
  tokio::spawn(async move {
    let mut source = Box::pin(source);
    while let Some(item) = source.next().await {
      if tx.send(item).await.is_err() {
        break;
      }
    }
  });
  rx
}

/// Wraps an item stream receiver as a [`futures::Stream`].
#[must_use]
pub fn into_stream<T>(receiver: ItemReceiver<T>) -> ReceiverStream<T> {
  ReceiverStream::new(receiver)
}
