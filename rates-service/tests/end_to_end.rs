//! End-to-end scenarios: service policy over the real HTTP adapter against
//! a mock upstream.

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rates_provider::{FrankfurterClient, ProviderConfig};
use rates_service::CurrencyConverterService;

fn service_for(server: &MockServer) -> CurrencyConverterService<FrankfurterClient> {
    let config = ProviderConfig {
        base_url: server.uri(),
        ..ProviderConfig::default()
    };
    CurrencyConverterService::new(FrankfurterClient::new(config))
}

#[tokio::test]
async fn converts_100_usd_to_92_eur() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .and(query_param("base", "USD"))
        .and(query_param("symbols", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"amount":1.0,"base":"USD","date":"2024-03-01","rates":{"EUR":0.92}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let cancel = CancellationToken::new();
    let result = service
        .convert("USD", "EUR", Decimal::new(100, 0), &cancel)
        .await;

    assert!(result.succeeded());
    assert_eq!(
        result.data().unwrap().converted_amount,
        Decimal::new(92, 0)
    );
}

#[tokio::test]
async fn unknown_base_currency_fails_with_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .and(query_param("base", "XXX"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let cancel = CancellationToken::new();
    let result = service.get_exchange_rate("XXX", &cancel).await;

    assert!(!result.succeeded());
    assert!(result.data().is_none());
    assert_eq!(result.details(), "Currency not found");
}

#[tokio::test]
async fn excluded_currencies_are_rejected_before_the_network() {
    let server = MockServer::start().await;
    // No mock mounted: any request would panic the mock server's verify.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let cancel = CancellationToken::new();
    let result = service
        .convert("USD", "MXN", Decimal::new(100, 0), &cancel)
        .await;

    assert!(!result.succeeded());
    assert_eq!(
        result.details(),
        "TRY, PLN, THB, and MXN currencies are not allowed."
    );
}
