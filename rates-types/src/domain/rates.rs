//! Spot-conversion and latest-rate payloads.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a spot conversion: the source amount multiplied by the
/// latest rate. No rounding beyond `Decimal`'s native precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConvertResult {
    pub converted_amount: Decimal,
}

/// Latest rates for every symbol, denominated in one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateResult {
    pub rates: HashMap<String, Decimal>,
}
