use crate::queue_store::{Error, MemoryQueueStore};

use std::sync::Arc;

use async_trait::async_trait;
use courier_pubsub::deliverer::Deliverer;
use courier_pubsub::message::TopicMessage;
use courier_pubsub::provider::{PollingProvider, Provider, ProviderOptions};
use courier_pubsub::result::TopicPostResult;
use courier_pubsub::topic::Subscriber;
use tracing::{debug, warn};

/// Options for the in-memory polling provider.
#[derive(Clone, Debug)]
pub struct MemoryPollingProviderOptions {
    /// The queue store holding pending payloads.
    pub store: Arc<MemoryQueueStore>,

    /// The deliverer invoked with drained batches.
    pub deliverer: Arc<dyn Deliverer>,
}
impl ProviderOptions for MemoryPollingProviderOptions {}

/// An in-process pull provider: post queues payloads per topic, poll
/// drains them and fans them out.
#[derive(Clone, Debug)]
pub struct MemoryPollingProvider {
    name: String,
    store: Arc<MemoryQueueStore>,
    deliverer: Arc<dyn Deliverer>,
}

#[async_trait]
impl Provider for MemoryPollingProvider {
    type Error = Error;

    type Options = MemoryPollingProviderOptions;

    async fn new(name: String, options: Self::Options) -> Result<Self, Self::Error> {
        Ok(Self {
            name,
            store: options.store,
            deliverer: options.deliverer,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Queues each message independently; one rejected message never
    /// blocks its siblings.
    async fn post(&self, messages: Vec<TopicMessage>) -> Result<Vec<TopicPostResult>, Self::Error> {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            match self.store.enqueue(&message.topic_name, message.payload.clone()) {
                Ok(()) => results.push(TopicPostResult::success(message)),
                Err(error) => {
                    warn!(topic = %message.topic_name, %error, "failed to queue message");
                    results.push(TopicPostResult::failure(message, error.to_string()));
                }
            }
        }
        Ok(results)
    }

    /// Polled delivery is driven by topic configuration; there is no
    /// per-subscriber setup to install.
    async fn subscribe(
        &self,
        topic_name: String,
        _subscriber: Subscriber,
    ) -> Result<(), Self::Error> {
        debug!(topic = %topic_name, provider = %self.name, "polling provider delivers from configuration; nothing to install");
        Ok(())
    }
}

#[async_trait]
impl PollingProvider for MemoryPollingProvider {
    async fn poll(&self, topic_name: String) -> Result<(), Self::Error> {
        let payloads = self.store.drain(&topic_name, None);
        if payloads.is_empty() {
            return Ok(());
        }

        let messages: Vec<TopicMessage> = payloads
            .into_iter()
            .map(|payload| TopicMessage::new(topic_name.clone(), payload))
            .collect();
        let count = messages.len();

        if let Err(error) = self.deliverer.deliver(&topic_name, messages).await {
            warn!(topic = %topic_name, count, %error, "failed to deliver drained messages");
        }
        Ok(())
    }
}
