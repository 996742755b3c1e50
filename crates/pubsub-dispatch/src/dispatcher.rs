use crate::error::Error;

use std::collections::HashMap;
use std::sync::Arc;

use courier_pubsub::config::{ProviderConfig, ProviderKind};
use courier_pubsub::deliverer::Deliverer;
use courier_pubsub::message::TopicMessage;
use courier_pubsub::provider::{PollingProvider, Provider};
use courier_pubsub::registry::TopicRegistry;
use courier_pubsub::result::TopicPostResult;
use courier_pubsub::topic::Subscriber;
use courier_pubsub_memory::callback::{MemoryCallbackProvider, MemoryCallbackProviderOptions};
use courier_pubsub_memory::polling::{MemoryPollingProvider, MemoryPollingProviderOptions};
use courier_pubsub_memory::queue_store::MemoryQueueStore;
use courier_pubsub_nats::provider::{NatsProvider, NatsProviderOptions};
use tokio::sync::Mutex;
use tracing::debug;

/// The concrete provider implementations the dispatcher can resolve.
#[derive(Clone, Debug)]
pub enum ProviderHandle {
    /// In-memory synchronous fan-out at post time.
    Callback(MemoryCallbackProvider),

    /// In-memory queues drained on poll.
    Polling(MemoryPollingProvider),

    /// NATS-backed push delivery.
    Nats(NatsProvider),
}

impl ProviderHandle {
    /// Posts a batch through the underlying provider.
    ///
    /// # Errors
    ///
    /// Returns the underlying provider's error when the call as a whole
    /// fails; per-message failures are reported in the results.
    pub async fn post(&self, messages: Vec<TopicMessage>) -> Result<Vec<TopicPostResult>, Error> {
        match self {
            Self::Callback(provider) => provider.post(messages).await.map_err(Error::from),
            Self::Polling(provider) => provider.post(messages).await.map_err(Error::from),
            Self::Nats(provider) => provider.post(messages).await.map_err(Error::from),
        }
    }

    /// Installs a subscription through the underlying provider.
    ///
    /// # Errors
    ///
    /// Returns the underlying provider's error if the subscription could
    /// not be installed.
    pub async fn subscribe(&self, topic_name: String, subscriber: Subscriber) -> Result<(), Error> {
        match self {
            Self::Callback(provider) => provider
                .subscribe(topic_name, subscriber)
                .await
                .map_err(Error::from),
            Self::Polling(provider) => provider
                .subscribe(topic_name, subscriber)
                .await
                .map_err(Error::from),
            Self::Nats(provider) => provider
                .subscribe(topic_name, subscriber)
                .await
                .map_err(Error::from),
        }
    }
}

/// The polling capability of a resolved provider.
#[derive(Clone, Debug)]
pub enum PollerHandle {
    /// The in-memory polling provider.
    MemoryPolling(MemoryPollingProvider),
}

impl PollerHandle {
    /// Drains and delivers pending messages for the topic.
    ///
    /// # Errors
    ///
    /// Returns the underlying provider's error if draining failed.
    pub async fn poll(&self, topic_name: String) -> Result<(), Error> {
        match self {
            Self::MemoryPolling(provider) => provider.poll(topic_name).await.map_err(Error::from),
        }
    }
}

/// A provider resolved for a configuration.
///
/// The polling capability is captured once here, at resolution time;
/// callers never probe the provider per call.
#[derive(Clone, Debug)]
pub struct ResolvedProvider {
    /// The provider to post and subscribe through.
    pub provider: ProviderHandle,

    /// The polling capability, present only for pull-style providers.
    pub poller: Option<PollerHandle>,
}

/// Resolves provider configurations to cached provider instances, keyed
/// by provider name.
#[derive(Debug)]
pub struct ProviderDispatcher {
    registry: Arc<dyn TopicRegistry>,
    deliverer: Arc<dyn Deliverer>,
    store: Arc<MemoryQueueStore>,
    providers: Mutex<HashMap<String, ResolvedProvider>>,
}

impl ProviderDispatcher {
    /// Creates a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(
        registry: Arc<dyn TopicRegistry>,
        deliverer: Arc<dyn Deliverer>,
        store: Arc<MemoryQueueStore>,
    ) -> Self {
        Self {
            registry,
            deliverer,
            store,
            providers: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves the provider instance for a configuration, constructing
    /// and caching it on first use. Broker-backed kinds connect here.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown provider kind, missing connection
    /// parameters, or a failed broker connection.
    pub async fn resolve(&self, config: &ProviderConfig) -> Result<ResolvedProvider, Error> {
        let mut providers = self.providers.lock().await;
        if let Some(resolved) = providers.get(&config.name) {
            return Ok(resolved.clone());
        }

        let kind = config
            .kind
            .parse::<ProviderKind>()
            .map_err(|_| Error::UnknownProviderKind {
                provider: config.name.clone(),
                kind: config.kind.clone(),
            })?;

        let resolved = match kind {
            ProviderKind::MemoryCallback => {
                let provider = MemoryCallbackProvider::new(
                    config.name.clone(),
                    MemoryCallbackProviderOptions {
                        deliverer: self.deliverer.clone(),
                    },
                )
                .await?;
                ResolvedProvider {
                    provider: ProviderHandle::Callback(provider),
                    poller: None,
                }
            }
            ProviderKind::MemoryPolling => {
                let provider = MemoryPollingProvider::new(
                    config.name.clone(),
                    MemoryPollingProviderOptions {
                        store: self.store.clone(),
                        deliverer: self.deliverer.clone(),
                    },
                )
                .await?;
                ResolvedProvider {
                    provider: ProviderHandle::Polling(provider.clone()),
                    poller: Some(PollerHandle::MemoryPolling(provider)),
                }
            }
            ProviderKind::Nats => {
                let url = config.url.clone().ok_or_else(|| Error::MissingUrl {
                    provider: config.name.clone(),
                })?;
                let client =
                    async_nats::connect(url)
                        .await
                        .map_err(|source| Error::Connect {
                            provider: config.name.clone(),
                            source,
                        })?;
                let provider = NatsProvider::new(
                    config.name.clone(),
                    NatsProviderOptions {
                        client,
                        registry: self.registry.clone(),
                        deliverer: self.deliverer.clone(),
                    },
                )
                .await?;
                ResolvedProvider {
                    provider: ProviderHandle::Nats(provider),
                    poller: None,
                }
            }
        };

        debug!(provider = %config.name, kind = %kind, "resolved provider");
        providers.insert(config.name.clone(), resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fanout::SubscriberFanout;

    use std::collections::HashMap as StdHashMap;

    use async_trait::async_trait;
    use courier_pubsub::process::{FrontendBehavior, ProcessRunner};
    use courier_pubsub::registry::StaticTopicRegistry;
    use serde_json::Value;

    #[derive(Debug)]
    struct NoopRunner;

    #[async_trait]
    impl ProcessRunner for NoopRunner {
        async fn run_process(
            &self,
            _name: &str,
            _inputs: StdHashMap<String, Value>,
            _frontend: FrontendBehavior,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn dispatcher() -> ProviderDispatcher {
        let registry = Arc::new(StaticTopicRegistry::new());
        let deliverer = Arc::new(SubscriberFanout::new(registry.clone(), Arc::new(NoopRunner)));
        ProviderDispatcher::new(registry, deliverer, Arc::new(MemoryQueueStore::new()))
    }

    #[tokio::test]
    async fn unknown_kind_is_a_resolution_error() {
        let error = dispatcher()
            .resolve(&ProviderConfig::new("signals", "smoke-signals"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("smoke-signals"));
    }

    #[tokio::test]
    async fn nats_kind_requires_a_url() {
        let error = dispatcher()
            .resolve(&ProviderConfig::new("broker", "nats"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("no connection url"));
    }

    #[tokio::test]
    async fn memory_polling_carries_the_poll_capability() {
        let resolved = dispatcher()
            .resolve(&ProviderConfig::new("queues", "memory-polling"))
            .await
            .unwrap();
        assert!(resolved.poller.is_some());

        let resolved = dispatcher()
            .resolve(&ProviderConfig::new("callbacks", "memory-callback"))
            .await
            .unwrap();
        assert!(resolved.poller.is_none());
    }
}
