//! In-memory implementations of the pub/sub provider contract.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// A provider that fans out to subscribers synchronously at post time.
pub mod callback;

/// A provider that queues at post time and delivers on poll.
pub mod polling;

/// Per-topic FIFO queues backing the polling provider.
pub mod queue_store;
