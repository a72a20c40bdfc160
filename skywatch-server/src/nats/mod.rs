//! NATS-backed alert notifier.

pub mod publisher;

pub use publisher::NatsPublisher;
