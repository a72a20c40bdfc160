//! Ingest and query handlers.

pub mod ingest;
pub mod query;

pub use ingest::IngestHandler;
pub use query::QueryHandler;
