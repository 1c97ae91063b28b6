//! Historical rate series with date-ascending pagination.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One page of a historical rate series.
///
/// The upstream provider returns a JSON object keyed by date in ascending
/// order. Keying the mapping by parsed `NaiveDate` makes that ordering
/// explicit instead of relying on object key order, so a page sliced out of
/// the series is always date-ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalExchangeRateResult {
    pub rates: BTreeMap<NaiveDate, HashMap<String, Decimal>>,
}

impl HistoricalExchangeRateResult {
    /// Slices `page_index`/`page_size` entries out of the full series.
    ///
    /// Skips `page_index * page_size` dates and takes the next `page_size`.
    /// A page beyond the end of the series is an empty mapping, not an error.
    pub fn page(
        full: BTreeMap<NaiveDate, HashMap<String, Decimal>>,
        page_index: usize,
        page_size: usize,
    ) -> Self {
        let rates = full
            .into_iter()
            .skip(page_index.saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self { rates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(days: u32) -> BTreeMap<NaiveDate, HashMap<String, Decimal>> {
        (1..=days)
            .map(|day| {
                let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
                let rates = HashMap::from([("EUR".to_string(), Decimal::new(day as i64, 2))]);
                (date, rates)
            })
            .collect()
    }

    #[test]
    fn page_keeps_ascending_date_order() {
        let result = HistoricalExchangeRateResult::page(series(5), 1, 2);
        let dates: Vec<_> = result.rates.keys().copied().collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            ]
        );
    }

    #[test]
    fn page_is_idempotent_for_same_inputs() {
        let first = HistoricalExchangeRateResult::page(series(7), 2, 2);
        let second = HistoricalExchangeRateResult::page(series(7), 2, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn page_beyond_end_is_empty_not_failing() {
        let result = HistoricalExchangeRateResult::page(series(3), 10, 5);
        assert!(result.rates.is_empty());
    }

    #[test]
    fn last_partial_page_is_truncated() {
        let result = HistoricalExchangeRateResult::page(series(5), 2, 2);
        assert_eq!(result.rates.len(), 1);
        assert!(
            result
                .rates
                .contains_key(&NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
    }
}
