use crate::message::TopicMessage;
use crate::topic::Subscriber;

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for delivery into subscriber fan-out.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No topic with the given name is registered.
    #[error("no topic named `{0}` is registered")]
    UnknownTopic(String),

    /// A message batch could not be encoded for a process run.
    #[error("failed to encode message batch for topic `{topic}`")]
    Encode {
        /// The topic the batch was delivered for.
        topic: String,

        /// The encoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// A custom receiver failed.
    #[error("receiver `{subscriber}` failed for topic `{topic}`")]
    Receiver {
        /// The topic the batch was delivered for.
        topic: String,

        /// The name of the failing subscriber.
        subscriber: String,

        /// The receiver's failure.
        #[source]
        source: anyhow::Error,
    },

    /// A process run failed.
    #[error("process `{process}` failed for subscriber `{subscriber}` on topic `{topic}`")]
    Process {
        /// The topic the batch was delivered for.
        topic: String,

        /// The name of the failing subscriber.
        subscriber: String,

        /// The name of the process that failed.
        process: String,

        /// The run failure.
        #[source]
        source: anyhow::Error,
    },
}

/// The seam between providers and subscriber fan-out.
///
/// Providers hand batches they have retrieved (drained from a queue,
/// received from the broker) to a deliverer; the implementation resolves
/// the topic's subscribers and invokes them.
#[async_trait]
pub trait Deliverer: Debug + Send + Sync + 'static {
    /// Delivers a batch to every subscriber of the topic, in
    /// configuration order.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber failure; subscribers after the
    /// failing one are not invoked in that call.
    async fn deliver(
        &self,
        topic_name: &str,
        messages: Vec<TopicMessage>,
    ) -> Result<(), DeliveryError>;

    /// Delivers a batch to exactly one subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriber's receiver or process failed.
    async fn deliver_to(
        &self,
        topic_name: &str,
        subscriber: &Subscriber,
        messages: Vec<TopicMessage>,
    ) -> Result<(), DeliveryError>;
}
