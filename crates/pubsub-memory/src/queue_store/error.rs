use courier_pubsub::provider::ProviderError;
use thiserror::Error;

/// Error type for the memory queue store.
#[derive(Debug, Error)]
pub enum Error {
    /// The per-topic capacity bound was reached.
    #[error("queue for topic `{topic}` is full (capacity {capacity})")]
    QueueFull {
        /// The topic whose queue is full.
        topic: String,

        /// The configured per-topic capacity.
        capacity: usize,
    },
}

impl ProviderError for Error {}
