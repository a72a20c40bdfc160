//! Data models for Skywatch server.

pub mod stored;

pub use stored::StoredReading;
