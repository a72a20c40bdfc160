//! ClickHouse-backed record store.

pub mod store;

pub use store::ClickHouseStore;
