//! Configuration module for the forecaster.
//!
//! Structured configuration loaded from environment variables (optionally via
//! a `.env` file), organized by concern: Data and Forecast.

mod data_config;
mod forecast_config;

pub use data_config::DataEnvConfig;
pub use forecast_config::ForecastEnvConfig;

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Where market data, the model and the scalers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Synthetic data, naive predictor, identity scalers
    Mock,
    /// CSV files, ONNX model, scaler JSON files
    Csv,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "csv" => Ok(Mode::Csv),
            _ => anyhow::bail!("Invalid DATA_SOURCE: {}. Must be 'mock' or 'csv'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub data: DataEnvConfig,
    pub forecast: ForecastEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("DATA_SOURCE").unwrap_or_else(|_| "mock".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let data = DataEnvConfig::from_env().context("Failed to load data config")?;
        let forecast = ForecastEnvConfig::from_env().context("Failed to load forecast config")?;

        Ok(Self {
            mode,
            data,
            forecast,
        })
    }
}

// Environment variables are process-global; tests that read or write them
// take this lock.
#[cfg(test)]
pub(crate) fn env_lock() -> &'static std::sync::Mutex<()> {
    static ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();
    ENV_LOCK.get_or_init(|| std::sync::Mutex::new(()))
}
