use crate::dispatcher::ProviderDispatcher;
use crate::error::Error;
use crate::fanout::SubscriberFanout;

use std::collections::HashMap;
use std::sync::Arc;

use courier_pubsub::config::ProviderConfig;
use courier_pubsub::deliverer::Deliverer;
use courier_pubsub::message::TopicMessage;
use courier_pubsub::process::ProcessRunner;
use courier_pubsub::registry::TopicRegistry;
use courier_pubsub::result::TopicPostResult;
use courier_pubsub::topic::Subscriber;
use courier_pubsub_memory::queue_store::MemoryQueueStore;
use tracing::warn;

/// Failure reported for a message whose topic or provider is not
/// registered.
const UNRECOGNIZED_TOPIC: &str = "Unrecognized topic name";

/// Failure synthesized for an input a provider returned no result for.
const MISSING_RESULT: &str = "Result of topic post could not be found.";

/// Matches provider results back to input positions and synthesizes a
/// failure for any position left without one, so the output always has
/// one entry per input, in input order.
fn reassemble(
    request: Vec<TopicMessage>,
    slots: Vec<Option<TopicPostResult>>,
) -> Vec<TopicPostResult> {
    request
        .into_iter()
        .zip(slots)
        .map(|(message, slot)| {
            slot.unwrap_or_else(|| TopicPostResult::failure(message, MISSING_RESULT))
        })
        .collect()
}

/// The topic-based pub/sub entry points: post, poll, and subscribe.
#[derive(Clone, Debug)]
pub struct TopicService {
    registry: Arc<dyn TopicRegistry>,
    dispatcher: Arc<ProviderDispatcher>,
}

impl TopicService {
    /// Creates a service over the given registry, process runner, and
    /// queue store. The store is owned by the host and shared here.
    #[must_use]
    pub fn new(
        registry: Arc<dyn TopicRegistry>,
        runner: Arc<dyn ProcessRunner>,
        store: Arc<MemoryQueueStore>,
    ) -> Self {
        let fanout: Arc<dyn Deliverer> = Arc::new(SubscriberFanout::new(registry.clone(), runner));
        let dispatcher = Arc::new(ProviderDispatcher::new(registry.clone(), fanout, store));
        Self {
            registry,
            dispatcher,
        }
    }

    /// Posts a batch of messages that may span topics and providers.
    ///
    /// Messages whose topic or provider cannot be resolved fail
    /// individually without any provider being called. The rest are
    /// grouped by provider name, preserving relative order, and each
    /// group is submitted in one provider call; a failed call fails
    /// every message of its group. The output always contains exactly
    /// one result per input message, in input order.
    pub async fn post(&self, request: Vec<TopicMessage>) -> Vec<TopicPostResult> {
        let total = request.len();
        let mut slots: Vec<Option<TopicPostResult>> = (0..total).map(|_| None).collect();

        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, (ProviderConfig, Vec<(usize, TopicMessage)>)> =
            HashMap::new();

        for (index, message) in request.iter().enumerate() {
            let Some(config) = self.registry.topic_provider(&message.topic_name).await else {
                slots[index] = Some(TopicPostResult::failure(
                    message.clone(),
                    format!("{UNRECOGNIZED_TOPIC} `{}`", message.topic_name),
                ));
                continue;
            };
            let entry = groups.entry(config.name.clone()).or_insert_with(|| {
                order.push(config.name.clone());
                (config, Vec::new())
            });
            entry.1.push((index, message.clone()));
        }

        for provider_name in order {
            let Some((config, group)) = groups.remove(&provider_name) else {
                continue;
            };
            let batch: Vec<TopicMessage> =
                group.iter().map(|(_, message)| message.clone()).collect();

            let outcome = match self.dispatcher.resolve(&config).await {
                Ok(resolved) => resolved.provider.post(batch).await,
                Err(error) => Err(error),
            };

            match outcome {
                Ok(results) => {
                    let mut results = results.into_iter();
                    for (index, _) in &group {
                        if let Some(result) = results.next() {
                            slots[*index] = Some(result);
                        }
                    }
                }
                Err(error) => {
                    warn!(provider = %provider_name, %error, "provider call failed; failing its whole group");
                    for (index, message) in group {
                        slots[index] = Some(TopicPostResult::failure(message, error.to_string()));
                    }
                }
            }
        }

        reassemble(request, slots)
    }

    /// Triggers a pull pass for the topic.
    ///
    /// Never fails: resolution problems are logged and swallowed, a
    /// provider without the polling capability is a silent no-op, and
    /// poll errors are logged and swallowed, so a best-effort scheduler
    /// loop can call this unconditionally.
    pub async fn poll(&self, topic_name: &str) {
        let Some(topic) = self.registry.topic(topic_name).await else {
            warn!(topic = %topic_name, "poll requested for unknown topic");
            return;
        };
        let Some(config) = self.registry.topic_provider(topic_name).await else {
            warn!(topic = %topic_name, "poll requested for topic with unknown provider");
            return;
        };

        match self.dispatcher.resolve(&config).await {
            Err(error) => {
                warn!(topic = %topic_name, %error, "could not resolve provider for poll");
            }
            Ok(resolved) => {
                let Some(poller) = resolved.poller else {
                    return;
                };
                if let Err(error) = poller.poll(topic.name).await {
                    warn!(topic = %topic_name, %error, "poll failed");
                }
            }
        }
    }

    /// Installs a push subscription for one subscriber of the topic.
    ///
    /// # Errors
    ///
    /// Unlike poll, failures here are propagated, wrapped with the topic
    /// name: subscription setup is normally a one-time startup step
    /// where silent failure would leave the system undelivering.
    pub async fn subscribe(&self, topic_name: &str, subscriber: Subscriber) -> Result<(), Error> {
        let topic = self
            .registry
            .topic(topic_name)
            .await
            .ok_or_else(|| Error::UnknownTopic(topic_name.to_owned()))?;
        let config = self
            .registry
            .topic_provider(topic_name)
            .await
            .ok_or_else(|| Error::UnknownTopic(topic_name.to_owned()))?;

        let resolved =
            self.dispatcher
                .resolve(&config)
                .await
                .map_err(|source| Error::Subscribe {
                    topic: topic_name.to_owned(),
                    source: Box::new(source),
                })?;
        resolved
            .provider
            .subscribe(topic.name, subscriber)
            .await
            .map_err(|source| Error::Subscribe {
                topic: topic_name.to_owned(),
                source: Box::new(source),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use courier_pubsub::process::FrontendBehavior;
    use courier_pubsub::receiver::Receiver;
    use courier_pubsub::registry::StaticTopicRegistry;
    use courier_pubsub::topic::Topic;
    use serde_json::Value;
    use tracing_test::traced_test;

    #[derive(Debug)]
    struct NoopRunner;

    #[async_trait]
    impl ProcessRunner for NoopRunner {
        async fn run_process(
            &self,
            _name: &str,
            _inputs: HashMap<String, Value>,
            _frontend: FrontendBehavior,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct CapturingReceiver {
        batches: Arc<Mutex<Vec<Vec<TopicMessage>>>>,
    }

    #[async_trait]
    impl Receiver for CapturingReceiver {
        async fn receive(&self, messages: Vec<TopicMessage>) -> anyhow::Result<()> {
            self.batches.lock().unwrap().push(messages);
            Ok(())
        }
    }

    fn fixture() -> (
        TopicService,
        Arc<MemoryQueueStore>,
        Arc<Mutex<Vec<Vec<TopicMessage>>>>,
    ) {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let receiver = Arc::new(CapturingReceiver {
            batches: batches.clone(),
        });

        let registry = Arc::new(
            StaticTopicRegistry::new()
                .with_provider(ProviderConfig::new("queues", "memory-polling"))
                .with_provider(ProviderConfig::new("callbacks", "memory-callback"))
                .with_provider(ProviderConfig::new("signals", "smoke-signals"))
                .with_provider(ProviderConfig::new("broker", "nats").with_url("nats://127.0.0.1:9"))
                .with_topic(
                    Topic::new("orders", "queues", "orders")
                        .with_subscriber(Subscriber::with_receiver("capture", receiver)),
                )
                .with_topic(Topic::new("payments", "queues", "payments"))
                .with_topic(Topic::new("alerts", "callbacks", "alerts"))
                .with_topic(Topic::new("junk", "signals", "junk"))
                .with_topic(Topic::new("remote", "broker", "remote")),
        );

        let store = Arc::new(MemoryQueueStore::new());
        let service = TopicService::new(registry, Arc::new(NoopRunner), store.clone());
        (service, store, batches)
    }

    #[tokio::test]
    async fn post_preserves_input_order_and_length() {
        let (service, store, _batches) = fixture();

        let request = vec![
            TopicMessage::new("orders", "m1"),
            TopicMessage::new("nowhere", "m2"),
            TopicMessage::new("payments", "m3"),
            TopicMessage::new("junk", "m4"),
        ];
        let results = service.post(request.clone()).await;

        assert_eq!(results.len(), request.len());
        for (result, message) in results.iter().zip(&request) {
            assert_eq!(result.message, *message);
        }

        assert!(!results[0].had_error);
        assert!(results[1].had_error);
        assert!(
            results[1]
                .error_message
                .as_deref()
                .unwrap()
                .contains("Unrecognized topic name")
        );
        assert!(!results[2].had_error);
        assert!(results[3].had_error);
        assert!(
            results[3]
                .error_message
                .as_deref()
                .unwrap()
                .contains("unknown kind")
        );

        assert_eq!(store.drain("orders", None), vec!["m1"]);
        assert_eq!(store.drain("payments", None), vec!["m3"]);
    }

    #[tokio::test]
    async fn unknown_topic_calls_no_provider() {
        let (service, store, _batches) = fixture();

        let results = service
            .post(vec![TopicMessage::new("nowhere", "m1")])
            .await;

        assert!(results[0].had_error);
        assert_eq!(store.len("orders"), 0);
        assert_eq!(store.len("payments"), 0);
    }

    #[tokio::test]
    async fn grouping_by_provider_preserves_relative_order() {
        let (service, store, _batches) = fixture();

        let results = service
            .post(vec![
                TopicMessage::new("orders", "a"),
                TopicMessage::new("payments", "x"),
                TopicMessage::new("orders", "b"),
            ])
            .await;

        assert!(results.iter().all(|result| !result.had_error));
        assert_eq!(store.drain("orders", None), vec!["a", "b"]);
        assert_eq!(store.drain("payments", None), vec!["x"]);
    }

    #[test]
    fn reassembly_synthesizes_missing_results() {
        let request = vec![
            TopicMessage::new("orders", "a"),
            TopicMessage::new("orders", "b"),
        ];
        let slots = vec![
            Some(TopicPostResult::success(request[0].clone())),
            None,
        ];

        let results = reassemble(request, slots);

        assert!(!results[0].had_error);
        assert!(results[1].had_error);
        assert_eq!(
            results[1].error_message.as_deref().unwrap(),
            "Result of topic post could not be found."
        );
    }

    #[tokio::test]
    async fn post_then_poll_delivers_to_subscribers() {
        let (service, _store, batches) = fixture();

        service
            .post(vec![
                TopicMessage::new("orders", "a"),
                TopicMessage::new("orders", "b"),
            ])
            .await;
        service.poll("orders").await;

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        let payloads: Vec<&str> = batches[0].iter().map(|m| m.payload.as_str()).collect();
        assert_eq!(payloads, vec!["a", "b"]);
    }

    #[tokio::test]
    #[traced_test]
    async fn poll_of_unknown_topic_is_swallowed() {
        let (service, _store, _batches) = fixture();

        service.poll("nowhere").await;

        assert!(logs_contain("unknown topic"));
    }

    #[tokio::test]
    async fn poll_of_push_only_provider_is_a_silent_no_op() {
        let (service, _store, batches) = fixture();

        service.poll("alerts").await;

        assert!(batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscribe_to_unknown_topic_errors() {
        let (service, _store, _batches) = fixture();

        let error = service
            .subscribe("nowhere", Subscriber::unbound("listener"))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::UnknownTopic(_)));
    }

    #[tokio::test]
    async fn subscribe_on_polling_provider_succeeds() {
        let (service, _store, _batches) = fixture();

        service
            .subscribe("orders", Subscriber::unbound("listener"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscribe_failure_is_wrapped_with_topic_context() {
        let (service, _store, _batches) = fixture();

        let error = service
            .subscribe("alerts", Subscriber::unbound("listener"))
            .await
            .unwrap_err();

        let rendered = error.to_string();
        assert!(rendered.contains("alerts"));
        assert!(rendered.contains("does not support"));
    }

    #[tokio::test]
    async fn subscribe_against_unreachable_broker_names_the_topic() {
        let (service, _store, _batches) = fixture();

        let error = service
            .subscribe("remote", Subscriber::unbound("listener"))
            .await
            .unwrap_err();

        let rendered = error.to_string();
        assert!(rendered.contains("remote"));
        assert!(matches!(error, Error::Subscribe { .. }));
    }
}
