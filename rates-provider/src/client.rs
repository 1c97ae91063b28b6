//! Frankfurter API client.

use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

use rates_resilience::{PipelineConfig, PipelineError, ResiliencePipeline};
use rates_types::{
    CurrencyConvertResult, ExchangeRateProvider, ExchangeRateResult, HistoricalExchangeRateResult,
    ProviderError, ServiceResult,
};

use crate::config::ProviderConfig;
use crate::dto::{HistoricalRatesResponse, LatestRatesResponse};

/// HTTP client for the Frankfurter exchange rate API.
///
/// Owns one `reqwest::Client` and one [`ResiliencePipeline`]; every upstream
/// call goes through the pipeline, sharing its limiter and breaker state
/// across concurrent callers.
pub struct FrankfurterClient {
    http: reqwest::Client,
    base_url: String,
    pipeline: ResiliencePipeline,
}

/// 408 and 429 are the only statuses treated as transient, mirroring the
/// breaker's failure classifier. Other non-2xx statuses are deterministic
/// application errors and must not consume retry budget or trip the circuit.
fn transient_status(response: &reqwest::Response) -> bool {
    matches!(
        response.status(),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS
    )
}

impl FrankfurterClient {
    /// Creates a client with the default pipeline policies.
    pub fn new(config: ProviderConfig) -> Self {
        let pipeline = PipelineConfig {
            attempt_timeout: config.attempt_timeout,
            ..PipelineConfig::default()
        };
        Self::with_pipeline(config, pipeline)
    }

    /// Creates a client with explicit pipeline policies.
    pub fn with_pipeline(config: ProviderConfig, pipeline: PipelineConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pipeline: ResiliencePipeline::new(pipeline),
        }
    }

    /// Issues one GET through the pipeline, rebuilding the request for every
    /// retry attempt.
    async fn fetch(
        &self,
        path_and_query: &str,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let url = url.as_str();
        let http = &self.http;

        self.pipeline
            .execute(cancel, transient_status, move || {
                let request = http.get(url);
                async move {
                    request
                        .send()
                        .await
                        .map_err(|err| PipelineError::Transport(err.to_string()))
                }
            })
            .await
            .map_err(map_pipeline_error)
    }

    /// Maps the delivered status and body into a decoded payload or a
    /// classified failure.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|err| {
                warn!(%err, "failed to decode upstream body");
                ProviderError::Decode
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(ProviderError::NotFound)
        } else {
            warn!(%status, "upstream returned a non-success status");
            Err(ProviderError::Upstream)
        }
    }

    async fn fetch_latest(
        &self,
        path_and_query: &str,
        cancel: &CancellationToken,
    ) -> Result<LatestRatesResponse, ProviderError> {
        let response = self.fetch(path_and_query, cancel).await?;
        Self::decode(response).await
    }
}

fn map_pipeline_error(err: PipelineError) -> ProviderError {
    match err {
        PipelineError::Throttled => ProviderError::Throttled,
        PipelineError::CircuitOpen => ProviderError::CircuitOpen,
        PipelineError::Timeout(_) => ProviderError::Timeout,
        PipelineError::Transport(details) => ProviderError::Transport(details),
        PipelineError::Cancelled => ProviderError::Cancelled,
    }
}

#[async_trait::async_trait]
impl ExchangeRateProvider for FrankfurterClient {
    #[instrument(skip(self, cancel))]
    async fn convert(
        &self,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
        cancel: &CancellationToken,
    ) -> ServiceResult<CurrencyConvertResult> {
        let path = format!("/v1/latest?base={from_currency}&symbols={to_currency}");
        match self.fetch_latest(&path, cancel).await {
            Ok(body) => match body.rates.into_values().next() {
                Some(rate) => ServiceResult::ok(CurrencyConvertResult {
                    converted_amount: amount * rate,
                }),
                // A 2xx body without the requested symbol is malformed.
                None => ProviderError::Decode.into(),
            },
            Err(err) => err.into(),
        }
    }

    #[instrument(skip(self, cancel))]
    async fn get_exchange_rate(
        &self,
        base_currency: &str,
        cancel: &CancellationToken,
    ) -> ServiceResult<ExchangeRateResult> {
        let path = format!("/v1/latest?base={base_currency}");
        match self.fetch_latest(&path, cancel).await {
            Ok(body) => ServiceResult::ok(ExchangeRateResult { rates: body.rates }),
            Err(err) => err.into(),
        }
    }

    #[instrument(skip(self, cancel))]
    async fn get_exchange_rate_history(
        &self,
        base_currency: &str,
        from: NaiveDate,
        to: NaiveDate,
        page_index: usize,
        page_size: usize,
        cancel: &CancellationToken,
    ) -> ServiceResult<HistoricalExchangeRateResult> {
        let path = format!("/v1/{from}..{to}?base={base_currency}");
        let outcome = async {
            let response = self.fetch(&path, cancel).await?;
            Self::decode::<HistoricalRatesResponse>(response).await
        }
        .await;

        match outcome {
            Ok(body) => ServiceResult::ok(HistoricalExchangeRateResult::page(
                body.rates, page_index, page_size,
            )),
            Err(err) => err.into(),
        }
    }
}
