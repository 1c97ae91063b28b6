//! Currency Converter Application Service
//!
//! Orchestrates provider operations behind business policy. Contains NO
//! transport logic - rejections here never reach the network.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use rates_types::{
    CurrencyConvertResult, ExchangeRateProvider, ExchangeRateResult,
    HistoricalExchangeRateResult, ProviderError, ServiceResult,
};

/// Currency codes the service refuses to convert, in either direction.
const EXCLUDED_CURRENCIES: [&str; 4] = ["TRY", "PLN", "THB", "MXN"];

const EXCLUDED_CURRENCIES_DETAILS: &str = "TRY, PLN, THB, and MXN currencies are not allowed.";
const INCORRECT_DATE_RANGE_DETAILS: &str = "Incorrect date range.";

/// Application service for conversion operations.
///
/// Generic over `P: ExchangeRateProvider` - the adapter is injected at
/// compile time, so tests run against an in-memory provider.
pub struct CurrencyConverterService<P: ExchangeRateProvider> {
    provider: P,
}

impl<P: ExchangeRateProvider> CurrencyConverterService<P> {
    /// Creates a new service in front of the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Converts `amount` between two currencies at the latest rate.
    ///
    /// Conversions involving an excluded currency fail immediately, without
    /// calling the provider. Comparison is case-sensitive: currency codes
    /// are uppercase by contract.
    pub async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
        cancel: &CancellationToken,
    ) -> ServiceResult<CurrencyConvertResult> {
        if is_excluded(from_currency) || is_excluded(to_currency) {
            debug!(from_currency, to_currency, "rejected excluded currency");
            return ProviderError::PolicyRejected(EXCLUDED_CURRENCIES_DETAILS.into()).into();
        }
        self.provider
            .convert(from_currency, to_currency, amount, cancel)
            .await
    }

    /// Latest rates for all symbols relative to `base_currency`. Pure
    /// delegation, no policy.
    pub async fn get_exchange_rate(
        &self,
        base_currency: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<ExchangeRateResult> {
        self.provider.get_exchange_rate(base_currency, cancel).await
    }

    /// One page of the historical rate series for `[from, to]`.
    ///
    /// An inverted date range fails immediately, without calling the
    /// provider.
    pub async fn get_exchange_rate_history(
        &self,
        base_currency: &str,
        from: NaiveDate,
        to: NaiveDate,
        page_index: usize,
        page_size: usize,
        cancel: &CancellationToken,
    ) -> ServiceResult<HistoricalExchangeRateResult> {
        if from > to {
            debug!(%from, %to, "rejected inverted date range");
            return ProviderError::PolicyRejected(INCORRECT_DATE_RANGE_DETAILS.into()).into();
        }
        self.provider
            .get_exchange_rate_history(base_currency, from, to, page_index, page_size, cancel)
            .await
    }
}

fn is_excluded(currency: &str) -> bool {
    EXCLUDED_CURRENCIES.contains(&currency)
}
