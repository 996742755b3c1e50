mod error;

pub use error::Error;

use std::sync::Arc;

use async_nats::Client;
use async_trait::async_trait;
use bytes::Bytes;
use courier_pubsub::deliverer::Deliverer;
use courier_pubsub::message::TopicMessage;
use courier_pubsub::provider::{Provider, ProviderOptions};
use courier_pubsub::registry::TopicRegistry;
use courier_pubsub::result::TopicPostResult;
use courier_pubsub::topic::Subscriber;
use dashmap::DashMap;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Options for the NATS provider.
#[derive(Clone, Debug)]
pub struct NatsProviderOptions {
    /// The connected NATS client to use.
    pub client: Client,

    /// The registry resolving topics to their wire subjects.
    pub registry: Arc<dyn TopicRegistry>,

    /// The deliverer invoked from the delivery task.
    pub deliverer: Arc<dyn Deliverer>,
}
impl ProviderOptions for NatsProviderOptions {}

/// A NATS-backed push provider.
///
/// Publishing to a subject fans the message out to every active
/// subscription on it, so the subject plays the role of a fanout
/// exchange named by the topic's provider-local name. Subjects need no
/// declaration; repeat posts to the same subject cannot conflict.
#[derive(Clone, Debug)]
pub struct NatsProvider {
    name: String,
    client: Client,
    registry: Arc<dyn TopicRegistry>,
    deliverer: Arc<dyn Deliverer>,
    subscriptions: Arc<DashMap<String, watch::Sender<()>>>,
}

fn validate_subject(subject: &str) -> Result<(), Error> {
    if subject.is_empty()
        || subject.contains(char::is_whitespace)
        || subject.contains('*')
        || subject.contains('>')
    {
        return Err(Error::InvalidSubject(subject.to_owned()));
    }
    Ok(())
}

impl NatsProvider {
    async fn subject_for(&self, topic_name: &str) -> Result<String, Error> {
        let topic = self
            .registry
            .topic(topic_name)
            .await
            .ok_or_else(|| Error::UnknownTopic(topic_name.to_owned()))?;
        validate_subject(&topic.topic_name)?;
        Ok(topic.topic_name)
    }
}

#[async_trait]
impl Provider for NatsProvider {
    type Error = Error;

    type Options = NatsProviderOptions;

    async fn new(name: String, options: Self::Options) -> Result<Self, Self::Error> {
        Ok(Self {
            name,
            client: options.client,
            registry: options.registry,
            deliverer: options.deliverer,
            subscriptions: Arc::new(DashMap::new()),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn post(&self, messages: Vec<TopicMessage>) -> Result<Vec<TopicPostResult>, Self::Error> {
        let mut results = Vec::with_capacity(messages.len());
        for message in messages {
            let subject = match self.subject_for(&message.topic_name).await {
                Ok(subject) => subject,
                Err(error) => {
                    warn!(topic = %message.topic_name, %error, "cannot resolve subject for message");
                    results.push(TopicPostResult::failure(message, error.to_string()));
                    continue;
                }
            };

            match self
                .client
                .publish(subject.clone(), Bytes::from(message.payload.clone()))
                .await
            {
                Ok(()) => {
                    debug!(subject = %subject, "published message");
                    results.push(TopicPostResult::success(message));
                }
                Err(error) => {
                    warn!(subject = %subject, %error, "failed to publish message");
                    results.push(TopicPostResult::failure(
                        message,
                        format!("failed to publish to subject `{subject}`: {error}"),
                    ));
                }
            }
        }
        Ok(results)
    }

    /// Installs an independent consumer delivering to exactly the one
    /// subscriber that requested this subscription.
    ///
    /// Returns once the consumer is registered. A later subscribe on the
    /// same topic replaces the registry entry, which also stops the
    /// previous delivery task.
    async fn subscribe(
        &self,
        topic_name: String,
        subscriber: Subscriber,
    ) -> Result<(), Self::Error> {
        let subject = self.subject_for(&topic_name).await?;

        let mut messages = self
            .client
            .subscribe(subject.clone())
            .await
            .map_err(|source| Error::Subscribe {
                subject: subject.clone(),
                source,
            })?;

        let (stop_sender, mut stop_receiver) = watch::channel(());
        let deliverer = self.deliverer.clone();
        let topic = topic_name.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop_receiver.changed() => break,
                    message = messages.next() => {
                        let Some(message) = message else { break };
                        let payload = String::from_utf8_lossy(&message.payload).into_owned();
                        let batch = vec![TopicMessage::new(topic.clone(), payload)];
                        if let Err(error) = deliverer.deliver_to(&topic, &subscriber, batch).await {
                            error!(topic = %topic, subscriber = %subscriber.name, %error, "failed to deliver received message");
                        }
                    }
                }
            }
        });

        if self
            .subscriptions
            .insert(topic_name.clone(), stop_sender)
            .is_some()
        {
            debug!(topic = %topic_name, provider = %self.name, "replaced existing subscription; previous delivery task stopped");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_dotted_subjects() {
        assert!(validate_subject("orders").is_ok());
        assert!(validate_subject("orders.created").is_ok());
    }

    #[test]
    fn rejects_wildcards_and_whitespace() {
        assert!(validate_subject("orders.*").is_err());
        assert!(validate_subject("orders.>").is_err());
        assert!(validate_subject("orders created").is_err());
        assert!(validate_subject("").is_err());
    }
}
