use courier_pubsub::provider::ProviderError;
use thiserror::Error;

/// Error type for the NATS provider.
#[derive(Debug, Error)]
pub enum Error {
    /// No topic with the given name is registered.
    #[error("no topic named `{0}` is registered")]
    UnknownTopic(String),

    /// The topic's provider-local name is not a usable subject.
    #[error("`{0}` is not a valid subject")]
    InvalidSubject(String),

    /// The broker rejected the subscription.
    #[error("failed to subscribe to subject `{subject}`: {source}")]
    Subscribe {
        /// The subject the subscription was requested for.
        subject: String,

        /// The broker client failure.
        #[source]
        source: async_nats::SubscribeError,
    },
}

impl ProviderError for Error {}
