//! Abstract interface for topic-based publish/subscribe messaging.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Provider configurations select a transport implementation by kind.
pub mod config;

/// Deliverers push retrieved message batches into subscriber fan-out.
pub mod deliverer;

/// Topic messages are the atomic unit: a topic name plus a payload.
pub mod message;

/// Process runners execute named processes for process-style subscribers.
pub mod process;

/// Providers are pluggable transports satisfying post/subscribe, optionally poll.
pub mod provider;

/// Receivers are custom code invoked with a batch of topic messages.
pub mod receiver;

/// Registries resolve topic names to topic and provider configuration.
pub mod registry;

/// Per-message results reported back from a post.
pub mod result;

/// Topics bind a provider and an ordered subscriber list to a name.
pub mod topic;
