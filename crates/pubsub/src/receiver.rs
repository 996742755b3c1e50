use crate::message::TopicMessage;

use std::fmt::Debug;

use async_trait::async_trait;

/// Custom subscriber code invoked with a batch of topic messages.
///
/// The host resolves its configured code references to `Receiver`
/// instances when it builds the topic registry; this subsystem only
/// calls them.
#[async_trait]
pub trait Receiver: Debug + Send + Sync + 'static {
    /// Handles a batch of messages delivered to this receiver.
    ///
    /// # Errors
    ///
    /// Returns an error per the receiver's own contract; callers decide
    /// whether the error is propagated or logged.
    async fn receive(&self, messages: Vec<TopicMessage>) -> anyhow::Result<()>;
}
