//! Tandem: blocking bounded channels with cooperative shutdown.
//!
//! # Overview
//!
//! Tandem provides an in-process, thread-safe, bounded FIFO channel for
//! ordinary OS threads. Any number of producers and consumers may operate
//! on the same channel concurrently; all synchronization happens through a
//! single lock-protected state block, so the ordering guarantees are easy
//! to state and easy to test.
//!
//! # Core Guarantees
//!
//! - **FIFO delivery**: items are never reordered; serialized sends are
//!   received in exactly the order they were enqueued
//! - **Bounded buffering**: the buffer never holds more than the configured
//!   capacity; full channels apply backpressure by blocking senders
//! - **Cooperative shutdown**: [`Channel::close`] is idempotent, wakes every
//!   blocked sender and receiver, and leaves buffered items receivable
//!   until drained
//! - **No missed wakeups**: every blocking operation is a predicate-recheck
//!   loop under the channel's lock, so a notification can never be lost
//!   between the check and the wait
//!
//! # Module Structure
//!
//! - [`sync`]: the [`Monitor`] lock and [`Condition`] wait/notify primitive
//! - [`channel`]: the bounded [`Channel`], including the capacity-0
//!   rendezvous mode
//! - [`error`]: typed error values (`Closed`, `Full`, `Empty`)
//! - [`test_utils`]: tracing-based logging helpers for tests
//!
//! # Example
//!
//! ```
//! use tandem::Channel;
//!
//! let ch = Channel::new(2);
//! ch.send(1).unwrap();
//! ch.send(2).unwrap();
//! assert_eq!(ch.recv().unwrap(), 1);
//! ch.close();
//! assert_eq!(ch.recv().unwrap(), 2);
//! assert!(ch.recv().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod channel;
pub mod error;
pub mod sync;
pub mod test_utils;

// Re-exports for convenient access to core types
pub use channel::Channel;
pub use error::{Error, ErrorKind, Recoverability, RecvError, Result, SendError};
pub use sync::{Condition, Monitor, MonitorGuard};
