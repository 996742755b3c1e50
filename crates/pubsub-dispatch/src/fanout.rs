use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use courier_pubsub::deliverer::{Deliverer, DeliveryError};
use courier_pubsub::message::TopicMessage;
use courier_pubsub::process::{FrontendBehavior, MESSAGES_INPUT, ProcessRunner};
use courier_pubsub::registry::TopicRegistry;
use courier_pubsub::topic::Subscriber;
use tracing::{debug, warn};

/// Fans message batches out to a topic's subscribers in configuration
/// order.
///
/// A subscriber failure propagates and halts delivery to subscribers
/// later in the order for that call; single-subscriber delivery paths
/// catch and log instead.
#[derive(Debug)]
pub struct SubscriberFanout {
    registry: Arc<dyn TopicRegistry>,
    runner: Arc<dyn ProcessRunner>,
}

impl SubscriberFanout {
    /// Creates a fan-out over the given registry and process runner.
    #[must_use]
    pub fn new(registry: Arc<dyn TopicRegistry>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { registry, runner }
    }
}

#[async_trait]
impl Deliverer for SubscriberFanout {
    async fn deliver(
        &self,
        topic_name: &str,
        messages: Vec<TopicMessage>,
    ) -> Result<(), DeliveryError> {
        let topic = self
            .registry
            .topic(topic_name)
            .await
            .ok_or_else(|| DeliveryError::UnknownTopic(topic_name.to_owned()))?;

        for subscriber in &topic.subscribers {
            self.deliver_to(topic_name, subscriber, messages.clone())
                .await?;
        }
        Ok(())
    }

    async fn deliver_to(
        &self,
        topic_name: &str,
        subscriber: &Subscriber,
        messages: Vec<TopicMessage>,
    ) -> Result<(), DeliveryError> {
        if let Some(receiver) = &subscriber.receiver {
            debug!(topic = %topic_name, subscriber = %subscriber.name, count = messages.len(), "invoking receiver");
            receiver
                .receive(messages)
                .await
                .map_err(|source| DeliveryError::Receiver {
                    topic: topic_name.to_owned(),
                    subscriber: subscriber.name.clone(),
                    source,
                })
        } else if let Some(process) = &subscriber.process_name {
            let batch =
                serde_json::to_value(&messages).map_err(|source| DeliveryError::Encode {
                    topic: topic_name.to_owned(),
                    source,
                })?;
            let inputs = HashMap::from([(MESSAGES_INPUT.to_owned(), batch)]);
            debug!(topic = %topic_name, subscriber = %subscriber.name, process = %process, "running subscriber process");
            self.runner
                .run_process(process, inputs, FrontendBehavior::Skip)
                .await
                .map_err(|source| DeliveryError::Process {
                    topic: topic_name.to_owned(),
                    subscriber: subscriber.name.clone(),
                    process: process.clone(),
                    source,
                })
        } else {
            warn!(topic = %topic_name, subscriber = %subscriber.name, "subscriber has neither a receiver nor a process; skipping");
            Ok(())
        }
    }
}
