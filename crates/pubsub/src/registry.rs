use crate::config::ProviderConfig;
use crate::topic::Topic;

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

/// Resolves topic names to topic and provider configuration.
///
/// Absence of a topic or provider is a first-class, non-exceptional
/// case; posting handles it per message.
#[async_trait]
pub trait TopicRegistry: Debug + Send + Sync + 'static {
    /// Looks up a topic by its globally unique name.
    async fn topic(&self, name: &str) -> Option<Topic>;

    /// Looks up the provider configuration of the named topic.
    async fn topic_provider(&self, name: &str) -> Option<ProviderConfig>;
}

/// A fixed registry built from literal topic and provider definitions.
#[derive(Clone, Debug, Default)]
pub struct StaticTopicRegistry {
    topics: HashMap<String, Topic>,
    providers: HashMap<String, ProviderConfig>,
}

impl StaticTopicRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider configuration, replacing any previous one with
    /// the same name.
    #[must_use]
    pub fn with_provider(mut self, config: ProviderConfig) -> Self {
        self.providers.insert(config.name.clone(), config);
        self
    }

    /// Adds a topic, replacing any previous one with the same name.
    #[must_use]
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topics.insert(topic.name.clone(), topic);
        self
    }
}

#[async_trait]
impl TopicRegistry for StaticTopicRegistry {
    async fn topic(&self, name: &str) -> Option<Topic> {
        self.topics.get(name).cloned()
    }

    async fn topic_provider(&self, name: &str) -> Option<ProviderConfig> {
        let topic = self.topics.get(name)?;
        self.providers.get(&topic.provider_name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::Subscriber;

    fn registry() -> StaticTopicRegistry {
        StaticTopicRegistry::new()
            .with_provider(ProviderConfig::new("queues", "memory-polling"))
            .with_topic(
                Topic::new("orders", "queues", "orders")
                    .with_subscriber(Subscriber::for_process("handler", "HandleOrder")),
            )
    }

    #[tokio::test]
    async fn resolves_registered_topic() {
        let topic = registry().topic("orders").await.unwrap();
        assert_eq!(topic.provider_name, "queues");
        assert_eq!(topic.subscribers.len(), 1);
    }

    #[tokio::test]
    async fn resolves_provider_through_topic() {
        let config = registry().topic_provider("orders").await.unwrap();
        assert_eq!(config.name, "queues");
        assert_eq!(config.kind, "memory-polling");
    }

    #[tokio::test]
    async fn missing_topic_is_none() {
        assert!(registry().topic("payments").await.is_none());
        assert!(registry().topic_provider("payments").await.is_none());
    }
}
