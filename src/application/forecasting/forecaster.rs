use super::cancellation::CancelToken;
use super::continuation::{FeatureContinuation, PersistenceContinuation};
use super::window_builder::SeedWindow;
use crate::domain::errors::ForecastError;
use crate::domain::forecasting::{ForecastPoint, ForecastTrajectory, Window};
use crate::domain::ports::{PointPredictor, Scaler};
use chrono::Days;
use ndarray::Array2;
use std::sync::Arc;
use tracing::{debug, info};

/// Ceiling on the number of autoregressive steps.
///
/// Every step past the last observation reuses persisted auxiliary features,
/// so error compounds with horizon. 2000 calendar days is a little over five
/// years.
pub const DEFAULT_MAX_HORIZON: usize = 2000;

/// State between two forecast steps: the current window and the scaled
/// predictions made so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastState {
    window: Window,
    predictions: Vec<f64>,
}

impl ForecastState {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            predictions: Vec::new(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Number of steps already taken.
    pub fn steps_taken(&self) -> usize {
        self.predictions.len()
    }
}

/// Rolls a point-prediction model forward one step at a time, feeding each
/// prediction back in as the newest observation.
pub struct AutoregressiveForecaster {
    predictor: Arc<dyn PointPredictor>,
    target_scaler: Arc<dyn Scaler>,
    continuation: Arc<dyn FeatureContinuation>,
    max_horizon: usize,
}

impl AutoregressiveForecaster {
    pub fn new(predictor: Arc<dyn PointPredictor>, target_scaler: Arc<dyn Scaler>) -> Self {
        Self {
            predictor,
            target_scaler,
            continuation: Arc::new(PersistenceContinuation),
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }

    pub fn with_continuation(mut self, continuation: Arc<dyn FeatureContinuation>) -> Self {
        self.continuation = continuation;
        self
    }

    pub fn with_max_horizon(mut self, max_horizon: usize) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    pub fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    /// One transition: predict from `state.window`, record the prediction,
    /// synthesize the next row and slide.
    pub fn step(&self, state: ForecastState) -> Result<ForecastState, ForecastError> {
        let step = state.steps_taken() + 1;
        let next_target = self.predict_next(&state.window, step)?;
        let row = self.continuation.next_row(&state.window, next_target)?;
        let window = state.window.slide(&row)?;

        let mut predictions = state.predictions;
        predictions.push(next_target);

        Ok(ForecastState {
            window,
            predictions,
        })
    }

    pub fn forecast(
        &self,
        seed: &SeedWindow,
        horizon: usize,
    ) -> Result<ForecastTrajectory, ForecastError> {
        self.forecast_with_cancel(seed, horizon, &CancelToken::new())
    }

    /// Runs `horizon` steps from `seed`, then inverse-scales and dates the
    /// predictions. Any failure discards all steps taken so far.
    pub fn forecast_with_cancel(
        &self,
        seed: &SeedWindow,
        horizon: usize,
        cancel: &CancelToken,
    ) -> Result<ForecastTrajectory, ForecastError> {
        if horizon > self.max_horizon {
            return Err(ForecastError::HorizonTooLarge {
                requested: horizon,
                max: self.max_horizon,
            });
        }
        if horizon == 0 {
            return Ok(ForecastTrajectory::default());
        }
        if self.target_scaler.n_features() != 1 {
            return Err(ForecastError::feature_mismatch(format!(
                "target scaler must have 1 column, has {}",
                self.target_scaler.n_features()
            )));
        }

        info!(
            "Forecasting {} steps with {} ({} continuation), window {}x{}",
            horizon,
            self.predictor.name(),
            self.continuation.name(),
            seed.window.len(),
            seed.window.n_features()
        );

        let mut state = ForecastState::new(seed.window.clone());
        while state.steps_taken() < horizon {
            cancel.check(state.steps_taken() + 1)?;
            state = self.step(state)?;
        }

        let scaled = state.predictions;
        let prices = self.inverse_scale(&scaled)?;

        let points = prices
            .into_iter()
            .enumerate()
            .map(|(i, price)| {
                let days = i + 1;
                seed.anchor_date
                    .checked_add_days(Days::new(days as u64))
                    .map(|date| ForecastPoint { date, price })
                    .ok_or(ForecastError::DateOverflow {
                        anchor: seed.anchor_date,
                        days,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastTrajectory::new(points, scaled))
    }

    fn predict_next(&self, window: &Window, step: usize) -> Result<f64, ForecastError> {
        let output = self
            .predictor
            .predict(window)
            .map_err(|e| ForecastError::ModelInference {
                step,
                reason: format!("{:#}", e),
            })?;

        let value = match output.as_slice() {
            [value] => *value,
            [] => {
                return Err(ForecastError::ModelInference {
                    step,
                    reason: "empty output".to_string(),
                });
            }
            values => {
                return Err(ForecastError::ModelInference {
                    step,
                    reason: format!("expected 1 output value, got {}", values.len()),
                });
            }
        };

        if !value.is_finite() {
            return Err(ForecastError::ModelInference {
                step,
                reason: format!("non-finite output {}", value),
            });
        }

        debug!("Step {}: scaled prediction {:.6}", step, value);
        Ok(value)
    }

    fn inverse_scale(&self, scaled: &[f64]) -> Result<Vec<f64>, ForecastError> {
        let column = Array2::from_shape_vec((scaled.len(), 1), scaled.to_vec())
            .map_err(|e| ForecastError::feature_mismatch(e.to_string()))?;
        let prices = self.target_scaler.inverse_transform(&column)?;

        if prices.dim() != (scaled.len(), 1) {
            return Err(ForecastError::feature_mismatch(format!(
                "target scaler returned shape {:?}, expected ({}, 1)",
                prices.dim(),
                scaled.len()
            )));
        }
        Ok(prices.iter().copied().collect())
    }
}
