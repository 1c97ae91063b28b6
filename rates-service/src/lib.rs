//! # Rates Service
//!
//! Application service for currency conversion.
//!
//! Applies business policy in front of the `ExchangeRateProvider` port and
//! delegates everything else. The service performs no IO itself; every
//! failure it originates is synchronous and costs no network round-trip.
//!
//! The service is generic over `P: ExchangeRateProvider`, allowing the HTTP
//! adapter or an in-memory fake to be injected.

pub mod service;


pub use service::CurrencyConverterService;
