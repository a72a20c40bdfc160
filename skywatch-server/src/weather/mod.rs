//! Weather service client.

pub mod client;

pub use client::OpenWeatherClient;
