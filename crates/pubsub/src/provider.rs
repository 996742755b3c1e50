use crate::message::TopicMessage;
use crate::result::TopicPostResult;
use crate::topic::Subscriber;

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;

/// Marker trait for provider errors.
pub trait ProviderError: Error + Send + Sync + 'static {}

/// Marker trait for provider options.
pub trait ProviderOptions: Clone + Debug + Send + Sync + 'static {}

/// A pluggable transport implementation for topic messages.
///
/// One provider instance serves every topic bound to its configuration;
/// post requests spanning several topics on the same provider arrive as
/// a single call.
#[async_trait]
pub trait Provider
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the provider.
    type Error: ProviderError;

    /// The options for the provider.
    type Options: ProviderOptions;

    /// Creates a named provider instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider could not be constructed.
    async fn new(name: String, options: Self::Options) -> Result<Self, Self::Error>;

    /// The name of the provider configuration this instance serves.
    fn name(&self) -> &str;

    /// Posts a batch of messages, returning one result per message in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns an error only when the call as a whole cannot be made;
    /// per-message failures are reported in the results instead.
    async fn post(&self, messages: Vec<TopicMessage>) -> Result<Vec<TopicPostResult>, Self::Error>;

    /// Installs a push subscription for one subscriber of the topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription could not be installed.
    async fn subscribe(&self, topic_name: String, subscriber: Subscriber)
    -> Result<(), Self::Error>;
}

/// Capability extension for providers that deliver on an external poll
/// trigger rather than pushing.
#[async_trait]
pub trait PollingProvider: Provider {
    /// Drains pending messages for the topic and fans them out.
    ///
    /// # Errors
    ///
    /// Returns an error if the pending messages could not be drained;
    /// fan-out failures are logged, not returned.
    async fn poll(&self, topic_name: String) -> Result<(), Self::Error>;
}
