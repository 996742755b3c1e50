//! Provider dispatch, subscriber fan-out, and the pub/sub entry points.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Resolves provider configurations to provider instances.
pub mod dispatcher;

/// Error types for dispatch and the entry points.
pub mod error;

/// Delivers message batches to a topic's subscribers.
pub mod fanout;

/// The post, poll, and subscribe entry points.
pub mod service;

pub use dispatcher::{PollerHandle, ProviderDispatcher, ProviderHandle, ResolvedProvider};
pub use error::Error;
pub use fanout::SubscriberFanout;
pub use service::TopicService;
