//! Data, model and scaler locations plus the feature layout.

use crate::domain::forecasting::schema::{
    DEFAULT_AUXILIARY_SYMBOLS, DEFAULT_ECONOMIC_SERIES, DEFAULT_TARGET_SYMBOL,
};
use crate::domain::forecasting::{EconomicSeries, FeatureSchema};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Data environment configuration
#[derive(Debug, Clone)]
pub struct DataEnvConfig {
    pub market_data_path: PathBuf,
    pub economic_data_path: PathBuf,
    pub model_path: PathBuf,
    pub feature_scaler_path: PathBuf,
    pub target_scaler_path: PathBuf,
    pub target_symbol: String,
    pub auxiliary_symbols: Vec<String>,
    pub economic_series: Vec<EconomicSeries>,
}

impl DataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let auxiliary_symbols = match env::var("AUXILIARY_SYMBOLS") {
            Ok(raw) => split_list(&raw),
            Err(_) => DEFAULT_AUXILIARY_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let economic_series = match env::var("ECONOMIC_SERIES") {
            Ok(raw) => split_list(&raw)
                .iter()
                .map(|s| s.parse::<EconomicSeries>())
                .collect::<Result<Vec<_>>>()
                .context("Failed to parse ECONOMIC_SERIES")?,
            Err(_) => DEFAULT_ECONOMIC_SERIES
                .iter()
                .map(|(name, code)| EconomicSeries::new(*name, *code))
                .collect(),
        };

        Ok(Self {
            market_data_path: path_var("MARKET_DATA_PATH", "data/market.csv"),
            economic_data_path: path_var("ECONOMIC_DATA_PATH", "data/economic.csv"),
            model_path: path_var("MODEL_PATH", "data/ml/final_model.onnx"),
            feature_scaler_path: path_var("FEATURE_SCALER_PATH", "data/ml/scaler_x.json"),
            target_scaler_path: path_var("TARGET_SCALER_PATH", "data/ml/scaler_y.json"),
            target_symbol: env::var("TARGET_SYMBOL")
                .unwrap_or_else(|_| DEFAULT_TARGET_SYMBOL.to_string()),
            auxiliary_symbols,
            economic_series,
        })
    }

    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::new(
            self.target_symbol.clone(),
            self.auxiliary_symbols.clone(),
            self.economic_series.clone(),
        )
    }
}

fn path_var(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
