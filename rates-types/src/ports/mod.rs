//! Port traits (interfaces for adapters).
//!
//! The service layer depends on these traits, not concrete implementations.

mod exchange;

pub use exchange::ExchangeRateProvider;
