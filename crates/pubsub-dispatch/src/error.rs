use thiserror::Error;

/// Error type for dispatch and the pub/sub entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// No topic with the given name is registered.
    #[error("no topic named `{0}` is registered")]
    UnknownTopic(String),

    /// A provider configuration declares a kind no implementation
    /// handles.
    #[error("provider `{provider}` declares unknown kind `{kind}`")]
    UnknownProviderKind {
        /// The name of the misconfigured provider.
        provider: String,

        /// The unrecognized kind string.
        kind: String,
    },

    /// A broker-backed provider configuration has no connection url.
    #[error("provider `{provider}` has no connection url configured")]
    MissingUrl {
        /// The name of the misconfigured provider.
        provider: String,
    },

    /// Connecting a broker-backed provider failed.
    #[error("failed to connect provider `{provider}`: {source}")]
    Connect {
        /// The name of the provider being connected.
        provider: String,

        /// The connection failure.
        #[source]
        source: async_nats::ConnectError,
    },

    /// The in-memory callback provider failed.
    #[error(transparent)]
    CallbackProvider(#[from] courier_pubsub_memory::callback::Error),

    /// The in-memory polling provider failed.
    #[error(transparent)]
    PollingProvider(#[from] courier_pubsub_memory::queue_store::Error),

    /// The NATS provider failed.
    #[error(transparent)]
    NatsProvider(#[from] courier_pubsub_nats::provider::Error),

    /// Installing a subscription failed.
    #[error("failed to subscribe to topic `{topic}`: {source}")]
    Subscribe {
        /// The topic the subscription was requested for.
        topic: String,

        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}
