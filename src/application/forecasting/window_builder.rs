use crate::domain::errors::ForecastError;
use crate::domain::forecasting::{FeatureSchema, HistoryTable, Window};
use crate::domain::ports::Scaler;
use chrono::NaiveDate;
use ndarray::Array2;
use tracing::debug;

/// Default model context length (trading days).
pub const DEFAULT_WINDOW_LENGTH: usize = 60;

/// Initial context for a forecast run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedWindow {
    /// Last W complete observations, scaled.
    pub window: Window,
    /// Date of the most recent observation; forecast dates count from here.
    pub anchor_date: NaiveDate,
    /// Raw target value of the most recent observation.
    pub last_price: f64,
}

/// Assembles the most recent W complete observations into a scaled window.
#[derive(Debug, Clone, Copy)]
pub struct FeatureWindowBuilder {
    window_length: usize,
}

impl FeatureWindowBuilder {
    pub fn new(window_length: usize) -> Self {
        Self { window_length }
    }

    /// Forward-fills gaps, drops rows that are still incomplete, keeps the
    /// last W rows and scales them with `scaler`.
    pub fn build(
        &self,
        history: &HistoryTable,
        schema: &FeatureSchema,
        scaler: &dyn Scaler,
    ) -> Result<SeedWindow, ForecastError> {
        let expected = schema.columns();
        if history.columns() != expected.as_slice() {
            return Err(ForecastError::feature_mismatch(format!(
                "history columns {:?} do not match schema {:?}",
                history.columns(),
                expected
            )));
        }
        if scaler.n_features() != schema.width() {
            return Err(ForecastError::feature_mismatch(format!(
                "feature scaler expects {} columns, schema has {}",
                scaler.n_features(),
                schema.width()
            )));
        }
        if self.window_length == 0 {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }

        let observations = history.forward_filled().complete_observations();
        debug!(
            "Window builder: {} rows in, {} complete after forward fill",
            history.len(),
            observations.len()
        );

        if observations.len() < self.window_length {
            return Err(ForecastError::InsufficientHistory {
                required: self.window_length,
                available: observations.len(),
            });
        }

        let recent = &observations[observations.len() - self.window_length..];
        let width = schema.width();
        let raw = Array2::from_shape_vec(
            (self.window_length, width),
            recent.iter().flat_map(|o| o.values.iter().copied()).collect(),
        )
        .map_err(|e| ForecastError::feature_mismatch(e.to_string()))?;

        let scaled = scaler.transform(&raw)?;
        if scaled.dim() != (self.window_length, width) {
            return Err(ForecastError::feature_mismatch(format!(
                "feature scaler returned shape {:?}, expected {:?}",
                scaled.dim(),
                (self.window_length, width)
            )));
        }

        // `recent` is non-empty: window_length >= 1
        let last = &recent[recent.len() - 1];
        Ok(SeedWindow {
            window: Window::new(scaled)?,
            anchor_date: last.date,
            last_price: last.target(),
        })
    }
}

impl Default for FeatureWindowBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_LENGTH)
    }
}
