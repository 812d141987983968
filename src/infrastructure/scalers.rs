//! Pre-fitted feature and target scalers loaded from JSON.
//!
//! Parameters are produced by the training pipeline and only ever read here.
//! File format, e.g. for a two-column min-max scaler:
//!
//! ```json
//! {
//!   "kind": "min_max",
//!   "data_min": [1.0, 2.0],
//!   "data_max": [5.0, 9.0],
//!   "feature_range": [0.0, 1.0]
//! }
//! ```

use crate::domain::errors::ForecastError;
use crate::domain::ports::Scaler;
use anyhow::{Context, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Divisor for a column; constant columns scale with 1.
fn safe_divisor(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

fn check_width(matrix: &Array2<f64>, expected: usize) -> Result<(), ForecastError> {
    if matrix.ncols() != expected {
        return Err(ForecastError::feature_mismatch(format!(
            "scaler expects {} columns, got {}",
            expected,
            matrix.ncols()
        )));
    }
    Ok(())
}

/// Applies `f(column_index, value)` to every element.
fn map_columns(matrix: &Array2<f64>, f: impl Fn(usize, f64) -> f64) -> Array2<f64> {
    let mut out = matrix.clone();
    for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
        column.mapv_inplace(|v| f(j, v));
    }
    out
}

/// `(x - data_min) / (data_max - data_min) * (hi - lo) + lo`, per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    feature_range: (f64, f64),
}

impl MinMaxScaler {
    pub fn new(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
    ) -> Result<Self, ForecastError> {
        let scaler = Self {
            data_min,
            data_max,
            feature_range,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ForecastError> {
        if self.data_min.is_empty() || self.data_min.len() != self.data_max.len() {
            return Err(ForecastError::feature_mismatch(format!(
                "min-max scaler has {} minimums and {} maximums",
                self.data_min.len(),
                self.data_max.len()
            )));
        }
        let (lo, hi) = self.feature_range;
        if hi <= lo {
            return Err(ForecastError::feature_mismatch(format!(
                "invalid feature range ({}, {})",
                lo, hi
            )));
        }
        Ok(())
    }

    fn data_range(&self, column: usize) -> f64 {
        safe_divisor(self.data_max[column] - self.data_min[column])
    }
}

impl Scaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn transform(&self, raw: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        check_width(raw, self.n_features())?;
        let (lo, hi) = self.feature_range;
        Ok(map_columns(raw, |j, v| {
            (v - self.data_min[j]) / self.data_range(j) * (hi - lo) + lo
        }))
    }

    fn inverse_transform(&self, scaled: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        check_width(scaled, self.n_features())?;
        let (lo, hi) = self.feature_range;
        Ok(map_columns(scaled, |j, v| {
            (v - lo) / (hi - lo) * self.data_range(j) + self.data_min[j]
        }))
    }
}

/// `(x - mean) / scale`, per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ForecastError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Pass-through scaler over `n_features` columns.
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: vec![0.0; n_features],
            scale: vec![1.0; n_features],
        }
    }

    fn validate(&self) -> Result<(), ForecastError> {
        if self.mean.is_empty() || self.mean.len() != self.scale.len() {
            return Err(ForecastError::feature_mismatch(format!(
                "standard scaler has {} means and {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, raw: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        check_width(raw, self.n_features())?;
        Ok(map_columns(raw, |j, v| {
            (v - self.mean[j]) / safe_divisor(self.scale[j])
        }))
    }

    fn inverse_transform(&self, scaled: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        check_width(scaled, self.n_features())?;
        Ok(map_columns(scaled, |j, v| {
            v * safe_divisor(self.scale[j]) + self.mean[j]
        }))
    }
}

/// A scaler as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl FittedScaler {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler file {:?}", path))?;
        let scaler: FittedScaler = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scaler JSON {:?}", path))?;

        let validation = match &scaler {
            FittedScaler::MinMax(s) => s.validate(),
            FittedScaler::Standard(s) => s.validate(),
        };
        validation.with_context(|| format!("Invalid scaler parameters in {:?}", path))?;

        info!(
            "Loaded {}-column scaler from {:?}",
            scaler.n_features(),
            path
        );
        Ok(scaler)
    }

    fn inner(&self) -> &dyn Scaler {
        match self {
            FittedScaler::MinMax(s) => s,
            FittedScaler::Standard(s) => s,
        }
    }
}

impl Scaler for FittedScaler {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn transform(&self, raw: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        self.inner().transform(raw)
    }

    fn inverse_transform(&self, scaled: &Array2<f64>) -> Result<Array2<f64>, ForecastError> {
        self.inner().inverse_transform(scaled)
    }
}
