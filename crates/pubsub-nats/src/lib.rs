//! NATS-backed implementation of the pub/sub provider contract.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// The broker-backed push provider.
pub mod provider;
