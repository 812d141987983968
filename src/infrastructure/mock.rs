use crate::domain::forecasting::{EconomicSeries, HistoryTable, TARGET_COLUMN, Window};
use crate::domain::ports::{EconomicDataService, MarketDataService, PointPredictor};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::info;

/// Stable per-name seed so every symbol gets its own deterministic curve.
fn name_seed(name: &str) -> f64 {
    name.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64)) as f64
}

fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.checked_add_days(Days::new(1)))
        .take_while(move |d| *d <= end)
}

fn synthetic_value(name: &str, date: NaiveDate) -> f64 {
    let seed = name_seed(name);
    let base = 50.0 + seed % 2000.0;
    let t = date.num_days_from_ce() as f64;
    base * (1.0 + 0.02 * (t / 11.0 + seed).sin() + 0.01 * (t / 3.0).cos())
}

/// Deterministic weekday-only closes for any symbol.
#[derive(Debug, Clone, Default)]
pub struct MockMarketDataService;

impl MockMarketDataService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_daily_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable> {
        let mut table = HistoryTable::new(symbols.to_vec());
        for date in days_between(start, end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        {
            let values = symbols
                .iter()
                .map(|s| Some(synthetic_value(s, date)))
                .collect();
            table.insert(date, values)?;
        }

        info!(
            "MockMarketDataService: generated {} rows for {} symbols",
            table.len(),
            symbols.len()
        );
        Ok(table)
    }
}

/// Deterministic monthly prints dated on the first of each month.
#[derive(Debug, Clone, Default)]
pub struct MockEconomicDataService;

impl MockEconomicDataService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EconomicDataService for MockEconomicDataService {
    async fn get_series(
        &self,
        series: &[EconomicSeries],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable> {
        let names = series.iter().map(|s| s.name.clone()).collect();
        let mut table = HistoryTable::new(names);
        for date in days_between(start, end).filter(|d| d.day() == 1) {
            let values = series
                .iter()
                .map(|s| Some(synthetic_value(&s.code, date)))
                .collect();
            table.insert(date, values)?;
        }
        Ok(table)
    }
}

/// Predicts that the next scaled target equals the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaivePredictor;

impl PointPredictor for NaivePredictor {
    fn predict(&self, window: &Window) -> Result<Vec<f64>> {
        Ok(vec![window.last_row()[TARGET_COLUMN]])
    }

    fn name(&self) -> &str {
        "Naive (last value)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_mock_market_skips_weekends() {
        let service = MockMarketDataService::new();
        // Mar 1 2024 is a Friday
        let table = service
            .get_daily_closes(&["GC=F".to_string()], date(3, 1), date(3, 4))
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].date, date(3, 4));
        assert!(table.complete_observations().len() == 2);
    }

    #[tokio::test]
    async fn test_mock_market_is_deterministic() {
        let service = MockMarketDataService::new();
        let symbols = vec!["GC=F".to_string(), "SI=F".to_string()];
        let a = service
            .get_daily_closes(&symbols, date(1, 1), date(1, 31))
            .await
            .unwrap();
        let b = service
            .get_daily_closes(&symbols, date(1, 1), date(1, 31))
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_mock_economic_monthly() {
        let service = MockEconomicDataService::new();
        let series = vec![EconomicSeries::new("Inflation_CPI", "CPIAUCSL")];
        let table = service
            .get_series(&series, date(1, 15), date(4, 15))
            .await
            .unwrap();

        assert_eq!(table.columns(), &["Inflation_CPI".to_string()]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_naive_predictor_repeats_last_target() {
        let window = Window::new(array![[0.1, 9.0], [0.4, 8.0]]).unwrap();
        assert_eq!(NaivePredictor.predict(&window).unwrap(), vec![0.4]);
    }
}
