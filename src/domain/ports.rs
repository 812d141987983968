use crate::domain::errors::ForecastError;
use crate::domain::forecasting::{EconomicSeries, HistoryTable, Window};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use ndarray::Array2;

/// Source of daily closing prices.
///
/// Returns one column per requested symbol, named by symbol, in request
/// order. Gaps (holidays, symbols not trading that day) are `None`.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    async fn get_daily_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable>;
}

/// Source of periodic macroeconomic indicators.
///
/// Returns one column per requested series, named by `EconomicSeries::name`,
/// dated at the series' own publication frequency.
#[async_trait]
pub trait EconomicDataService: Send + Sync {
    async fn get_series(
        &self,
        series: &[EconomicSeries],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable>;
}

/// Point-prediction model: W×N scaled window in, next scaled target out.
///
/// Implementations must be stateless across calls; the full context is
/// always passed in. A well-formed result holds exactly one value.
pub trait PointPredictor: Send + Sync {
    fn predict(&self, window: &Window) -> Result<Vec<f64>>;

    /// Get model name/type
    fn name(&self) -> &str;
}

/// Pre-fitted invertible transform between raw and model units.
///
/// Operates column-wise over row-major matrices with `n_features` columns.
pub trait Scaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, raw: &Array2<f64>) -> Result<Array2<f64>, ForecastError>;

    fn inverse_transform(&self, scaled: &Array2<f64>) -> Result<Array2<f64>, ForecastError>;
}
