use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One forecast step in price units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Forecast output: H dated prices plus the scaled predictions they came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastTrajectory {
    points: Vec<ForecastPoint>,
    scaled_predictions: Vec<f64>,
}

impl ForecastTrajectory {
    pub(crate) fn new(points: Vec<ForecastPoint>, scaled_predictions: Vec<f64>) -> Self {
        Self {
            points,
            scaled_predictions,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Raw model outputs in scaled units, one per step.
    pub fn scaled_predictions(&self) -> &[f64] {
        &self.scaled_predictions
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }
}

/// Direction of the final forecast price relative to the last observed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// `threshold_pct` is in percent (0.5 = half a percent).
    pub fn classify(last_price: f64, forecast_price: f64, threshold_pct: f64) -> Self {
        let change_pct = percent_change(last_price, forecast_price);
        if change_pct > threshold_pct {
            Trend::Up
        } else if change_pct < -threshold_pct {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Percentage change from `from` to `to`; 0 when `from` is 0.
pub fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to - from) / from.abs() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_classification() {
        assert_eq!(Trend::classify(100.0, 101.0, 0.5), Trend::Up);
        assert_eq!(Trend::classify(100.0, 99.0, 0.5), Trend::Down);
        assert_eq!(Trend::classify(100.0, 100.3, 0.5), Trend::Stable);
        assert_eq!(Trend::classify(100.0, 99.7, 0.5), Trend::Stable);
    }

    #[test]
    fn test_percent_change_zero_base() {
        assert_eq!(percent_change(0.0, 10.0), 0.0);
        assert!((percent_change(200.0, 210.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_trend_serializes_lowercase() {
        let json = serde_json::to_string(&Trend::Stable).unwrap();
        assert_eq!(json, "\"stable\"");
    }
}
