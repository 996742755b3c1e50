use courier_pubsub::provider::ProviderError;
use thiserror::Error;

/// Error type for the in-memory callback provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Subscriptions are reserved for future work on this provider.
    #[error("the in-memory callback provider does not support subscriptions")]
    SubscribeUnsupported,
}

impl ProviderError for Error {}
