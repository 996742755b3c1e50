use crate::receiver::Receiver;

use std::sync::Arc;

/// A named logical channel through which messages flow.
///
/// Bound to exactly one provider; `topic_name` is the provider-local
/// identifier (the wire subject for broker-backed providers), while
/// `name` is the globally unique registry key.
#[derive(Clone, Debug)]
pub struct Topic {
    /// The globally unique name of the topic.
    pub name: String,

    /// The name of the provider configuration this topic is bound to.
    pub provider_name: String,

    /// The provider-local identifier for this topic.
    pub topic_name: String,

    /// The subscribers of this topic, in delivery order.
    pub subscribers: Vec<Subscriber>,
}

impl Topic {
    /// Creates a new topic with no subscribers.
    pub fn new(
        name: impl Into<String>,
        provider_name: impl Into<String>,
        topic_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            provider_name: provider_name.into(),
            topic_name: topic_name.into(),
            subscribers: Vec::new(),
        }
    }

    /// Appends a subscriber, preserving delivery order.
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Subscriber) -> Self {
        self.subscribers.push(subscriber);
        self
    }
}

/// A registered consumer of a topic's messages.
///
/// Exactly one of `receiver`/`process_name` should be set; a subscriber
/// with neither is inert and is skipped with a warning at delivery time.
#[derive(Clone, Debug)]
pub struct Subscriber {
    /// The name of the subscriber, unique within its topic.
    pub name: String,

    /// The named process to run for each delivered batch.
    pub process_name: Option<String>,

    /// The custom receiver to invoke for each delivered batch.
    pub receiver: Option<Arc<dyn Receiver>>,

    /// An optional schedule hint for polled topics; carried as data only.
    pub schedule: Option<String>,
}

impl Subscriber {
    /// Creates a subscriber backed by custom receiver code.
    pub fn with_receiver(name: impl Into<String>, receiver: Arc<dyn Receiver>) -> Self {
        Self {
            name: name.into(),
            process_name: None,
            receiver: Some(receiver),
            schedule: None,
        }
    }

    /// Creates a subscriber that runs a named process per batch.
    pub fn for_process(name: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            process_name: Some(process_name.into()),
            receiver: None,
            schedule: None,
        }
    }

    /// Creates a subscriber with no delivery target.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            process_name: None,
            receiver: None,
            schedule: None,
        }
    }

    /// Attaches a schedule hint.
    #[must_use]
    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }
}
