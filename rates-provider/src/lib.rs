//! # Rates Provider
//!
//! Outbound HTTP adapter for the Frankfurter exchange rate API.
//!
//! [`FrankfurterClient`] implements the `ExchangeRateProvider` port: it
//! translates domain requests into upstream HTTP calls, pushes every call
//! through one owned resilience pipeline, decodes successful bodies, and
//! classifies failures into the provider error taxonomy.

mod client;
mod config;
mod dto;

pub use client::FrankfurterClient;
pub use config::ProviderConfig;
