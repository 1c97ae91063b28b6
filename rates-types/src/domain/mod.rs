//! Domain payloads for the conversion operations.

pub mod history;
pub mod rates;

pub use history::HistoricalExchangeRateResult;
pub use rates::{CurrencyConvertResult, ExchangeRateResult};
