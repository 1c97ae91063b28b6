//! Upstream response bodies.
//!
//! Only the `rates` payload is read; the envelope fields the API also
//! returns (`amount`, `base`, dates) are ignored by the deserializer.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `GET /v1/latest`, with or without a `symbols` filter.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestRatesResponse {
    pub rates: HashMap<String, Decimal>,
}

/// Body of `GET /v1/{from}..{to}`: rates keyed by date, ascending.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoricalRatesResponse {
    pub rates: BTreeMap<NaiveDate, HashMap<String, Decimal>>,
}
