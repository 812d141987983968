//! Forecast run parameters parsed from environment variables.

use crate::application::forecast_service::ForecastServiceConfig;
use crate::application::forecasting::{DEFAULT_MAX_HORIZON, DEFAULT_WINDOW_LENGTH};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Forecast environment configuration
#[derive(Debug, Clone)]
pub struct ForecastEnvConfig {
    pub window_length: usize,
    pub max_horizon: usize,
    pub input_lookback_months: u32,
    pub trend_threshold_pct: f64,
    pub deadline_ms: Option<u64>,
}

impl ForecastEnvConfig {
    pub fn from_env() -> Result<Self> {
        let window_length = Self::parse_usize("WINDOW_LENGTH", DEFAULT_WINDOW_LENGTH)?;
        if window_length == 0 {
            anyhow::bail!("WINDOW_LENGTH must be at least 1");
        }

        let input_lookback_months = env::var("INPUT_LOOKBACK_MONTHS")
            .unwrap_or_else(|_| "6".to_string())
            .parse::<u32>()
            .context("Failed to parse INPUT_LOOKBACK_MONTHS")?;

        let deadline_ms = match env::var("FORECAST_DEADLINE_MS") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .context("Failed to parse FORECAST_DEADLINE_MS")?,
            ),
            _ => None,
        };

        Ok(Self {
            window_length,
            max_horizon: Self::parse_usize("MAX_HORIZON", DEFAULT_MAX_HORIZON)?,
            input_lookback_months,
            trend_threshold_pct: Self::parse_f64("TREND_THRESHOLD_PCT", 0.5)?,
            deadline_ms,
        })
    }

    pub fn service_config(&self) -> ForecastServiceConfig {
        ForecastServiceConfig {
            window_length: self.window_length,
            max_horizon: self.max_horizon,
            input_lookback_months: self.input_lookback_months,
            trend_threshold_pct: self.trend_threshold_pct,
            deadline: self.deadline_ms.map(Duration::from_millis),
        }
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }

    fn parse_f64(key: &str, default: f64) -> Result<f64> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<f64>()
            .context(format!("Failed to parse {}", key))
    }
}
