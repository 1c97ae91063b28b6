//! # Rates Types
//!
//! Domain types and port traits for the currency conversion service.
//! This crate has ZERO external IO dependencies - only data structures,
//! the result envelope, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Result payloads (converted amounts, rate tables, history pages)
//! - `ports/` - Trait definitions that provider adapters must implement
//! - `result` - The `ServiceResult<T>` envelope shared by every operation
//! - `error` - The provider-failure taxonomy

pub mod domain;
pub mod error;
pub mod ports;
pub mod result;

// Re-export commonly used types
pub use domain::{CurrencyConvertResult, ExchangeRateResult, HistoricalExchangeRateResult};
pub use error::ProviderError;
pub use ports::ExchangeRateProvider;
pub use result::ServiceResult;
