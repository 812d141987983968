//! Aligns periodic economic indicators onto the daily market index.

use crate::domain::errors::ForecastError;
use crate::domain::forecasting::{HistoryRow, HistoryTable};

/// Joins `economic` onto the dates of `market` and forward-fills the result.
///
/// Columns are the market columns followed by the economic columns. Each
/// economic column takes its latest non-empty value dated on or before the
/// market date, so a monthly print dated on a weekend still reaches the
/// following trading days.
pub fn unify(
    market: &HistoryTable,
    economic: &HistoryTable,
) -> Result<HistoryTable, ForecastError> {
    if let Some(dup) = economic
        .columns()
        .iter()
        .find(|c| market.column_index(c).is_some())
    {
        return Err(ForecastError::feature_mismatch(format!(
            "column '{}' present in both market and economic data",
            dup
        )));
    }

    let columns: Vec<String> = market
        .columns()
        .iter()
        .chain(economic.columns().iter())
        .cloned()
        .collect();

    let economic_rows = economic.rows();
    let mut cursor = 0;
    let mut latest: Vec<Option<f64>> = vec![None; economic.columns().len()];
    let mut rows = Vec::with_capacity(market.len());

    // Both tables are date-sorted, so one forward pass suffices.
    for market_row in market.rows() {
        while cursor < economic_rows.len() && economic_rows[cursor].date <= market_row.date {
            for (slot, value) in latest.iter_mut().zip(economic_rows[cursor].values.iter()) {
                if value.is_some() {
                    *slot = *value;
                }
            }
            cursor += 1;
        }

        let mut values = market_row.values.clone();
        values.extend(latest.iter().copied());
        rows.push(HistoryRow {
            date: market_row.date,
            values,
        });
    }

    Ok(HistoryTable::from_rows(columns, rows)?.forward_filled())
}
