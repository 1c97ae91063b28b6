//! Exchange rate provider port.
//!
//! Implementations translate these operations into upstream HTTP calls;
//! tests substitute in-memory fakes. Every operation accepts a cancellation
//! token and reports failure through the envelope rather than panicking.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::domain::{CurrencyConvertResult, ExchangeRateResult, HistoricalExchangeRateResult};
use crate::result::ServiceResult;

/// Port trait for upstream exchange rate providers.
#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Converts `amount` from one currency to another at the latest rate.
    async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
        cancel: &CancellationToken,
    ) -> ServiceResult<CurrencyConvertResult>;

    /// Fetches the latest rates for all symbols relative to `base_currency`.
    async fn get_exchange_rate(
        &self,
        base_currency: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<ExchangeRateResult>;

    /// Fetches the `[from, to]` date range of rates for `base_currency` and
    /// returns the requested page of the date-ascending series.
    async fn get_exchange_rate_history(
        &self,
        base_currency: &str,
        from: NaiveDate,
        to: NaiveDate,
        page_index: usize,
        page_size: usize,
        cancel: &CancellationToken,
    ) -> ServiceResult<HistoricalExchangeRateResult>;
}
