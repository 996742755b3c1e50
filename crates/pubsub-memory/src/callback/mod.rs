mod error;

pub use error::Error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use courier_pubsub::deliverer::Deliverer;
use courier_pubsub::message::TopicMessage;
use courier_pubsub::provider::{Provider, ProviderOptions};
use courier_pubsub::result::TopicPostResult;
use courier_pubsub::topic::Subscriber;
use tracing::warn;

/// Failure reported for every message of a topic group whose fan-out
/// failed.
const DELIVERY_FAILED: &str = "Failed to deliver topic messages to subscribers";

/// Options for the in-memory callback provider.
#[derive(Clone, Debug)]
pub struct MemoryCallbackProviderOptions {
    /// The deliverer invoked synchronously at post time.
    pub deliverer: Arc<dyn Deliverer>,
}
impl ProviderOptions for MemoryCallbackProviderOptions {}

/// An in-process provider that fans a posted batch out to subscribers
/// synchronously, with no durable storage in between.
///
/// Isolation is per topic group: a fan-out failure fails every message
/// of that topic in the call, while other topics in the same call are
/// unaffected.
#[derive(Clone, Debug)]
pub struct MemoryCallbackProvider {
    name: String,
    deliverer: Arc<dyn Deliverer>,
}

#[async_trait]
impl Provider for MemoryCallbackProvider {
    type Error = Error;

    type Options = MemoryCallbackProviderOptions;

    async fn new(name: String, options: Self::Options) -> Result<Self, Self::Error> {
        Ok(Self {
            name,
            deliverer: options.deliverer,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn post(&self, messages: Vec<TopicMessage>) -> Result<Vec<TopicPostResult>, Self::Error> {
        let total = messages.len();
        let mut slots: Vec<Option<TopicPostResult>> = (0..total).map(|_| None).collect();

        // Group by topic, preserving first-appearance order of topics and
        // relative message order within each group.
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<(usize, TopicMessage)>> = HashMap::new();
        for (index, message) in messages.into_iter().enumerate() {
            if !groups.contains_key(&message.topic_name) {
                order.push(message.topic_name.clone());
            }
            groups
                .entry(message.topic_name.clone())
                .or_default()
                .push((index, message));
        }

        for topic_name in order {
            let group = groups.remove(&topic_name).unwrap_or_default();
            let batch: Vec<TopicMessage> =
                group.iter().map(|(_, message)| message.clone()).collect();

            match self.deliverer.deliver(&topic_name, batch).await {
                Ok(()) => {
                    for (index, message) in group {
                        slots[index] = Some(TopicPostResult::success(message));
                    }
                }
                Err(error) => {
                    warn!(topic = %topic_name, provider = %self.name, %error, "failed to deliver topic group");
                    for (index, message) in group {
                        slots[index] = Some(TopicPostResult::failure(message, DELIVERY_FAILED));
                    }
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    async fn subscribe(
        &self,
        _topic_name: String,
        _subscriber: Subscriber,
    ) -> Result<(), Self::Error> {
        Err(Error::SubscribeUnsupported)
    }
}
