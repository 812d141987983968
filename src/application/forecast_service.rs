use crate::application::forecasting::{
    AutoregressiveForecaster, CancelToken, DEFAULT_MAX_HORIZON, DEFAULT_WINDOW_LENGTH,
    FeatureContinuation, FeatureWindowBuilder,
};
use crate::application::market_data::unify;
use crate::domain::errors::ForecastError;
use crate::domain::forecasting::trajectory::percent_change;
use crate::domain::forecasting::{FeatureSchema, ForecastTrajectory, HistoryPeriod, Trend};
use crate::domain::ports::{EconomicDataService, MarketDataService, PointPredictor, Scaler};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Extra months of economic data fetched before the model input range, so
/// the as-of join has a print to carry into the first input rows. Covers
/// quarterly series.
const ECONOMIC_LEAD_MONTHS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastServiceConfig {
    pub window_length: usize,
    pub max_horizon: usize,
    /// Months of history fetched to build the model input.
    pub input_lookback_months: u32,
    /// Percent change beyond which the forecast counts as up/down.
    pub trend_threshold_pct: f64,
    pub deadline: Option<Duration>,
}

impl Default for ForecastServiceConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            max_horizon: DEFAULT_MAX_HORIZON,
            input_lookback_months: 6,
            trend_threshold_pct: 0.5,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastRequest {
    pub horizon: usize,
    pub period: HistoryPeriod,
    /// Last date of data to use ("today").
    pub as_of: NaiveDate,
}

/// Everything the presentation layer needs for one forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub target: String,
    pub period: HistoryPeriod,
    pub anchor_date: NaiveDate,
    pub last_price: f64,
    /// Target closes within the requested history period.
    pub history: Vec<(NaiveDate, f64)>,
    pub trajectory: ForecastTrajectory,
    pub trend: Trend,
    /// Percent change from `last_price` to the final forecast price.
    pub change_pct: f64,
}

/// Fetches data, builds the model context and runs the forecaster.
///
/// The model and scalers are injected once and shared read-only; every
/// `run` call owns its own window and prediction state.
pub struct ForecastService {
    market_data: Arc<dyn MarketDataService>,
    economic_data: Arc<dyn EconomicDataService>,
    feature_scaler: Arc<dyn Scaler>,
    schema: FeatureSchema,
    builder: FeatureWindowBuilder,
    forecaster: Arc<AutoregressiveForecaster>,
    config: ForecastServiceConfig,
}

impl ForecastService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        economic_data: Arc<dyn EconomicDataService>,
        predictor: Arc<dyn PointPredictor>,
        feature_scaler: Arc<dyn Scaler>,
        target_scaler: Arc<dyn Scaler>,
        continuation: Arc<dyn FeatureContinuation>,
        schema: FeatureSchema,
        config: ForecastServiceConfig,
    ) -> Self {
        let forecaster = AutoregressiveForecaster::new(predictor, target_scaler)
            .with_continuation(continuation)
            .with_max_horizon(config.max_horizon);

        Self {
            market_data,
            economic_data,
            feature_scaler,
            schema,
            builder: FeatureWindowBuilder::new(config.window_length),
            forecaster: Arc::new(forecaster),
            config,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn config(&self) -> &ForecastServiceConfig {
        &self.config
    }

    pub async fn run(&self, request: ForecastRequest) -> Result<ForecastReport, ForecastError> {
        let cancel = match self.config.deadline {
            Some(timeout) => CancelToken::with_timeout(timeout),
            None => CancelToken::new(),
        };
        self.run_with_cancel(request, &cancel).await
    }

    pub async fn run_with_cancel(
        &self,
        request: ForecastRequest,
        cancel: &CancelToken,
    ) -> Result<ForecastReport, ForecastError> {
        // Reject before fetching anything.
        if request.horizon > self.forecaster.max_horizon() {
            return Err(ForecastError::HorizonTooLarge {
                requested: request.horizon,
                max: self.forecaster.max_horizon(),
            });
        }

        let input_start = request
            .as_of
            .checked_sub_months(Months::new(self.config.input_lookback_months))
            .unwrap_or(NaiveDate::MIN);
        let history_start = request.period.start_from(request.as_of);
        let fetch_start = input_start.min(history_start);
        let economic_start = input_start
            .checked_sub_months(Months::new(ECONOMIC_LEAD_MONTHS))
            .unwrap_or(NaiveDate::MIN);

        info!(
            "Forecast request: target={}, horizon={}, period={}, input {}..{}",
            self.schema.target(),
            request.horizon,
            request.period,
            input_start,
            request.as_of
        );

        let market = self
            .market_data
            .get_daily_closes(&self.schema.symbols_to_fetch(), fetch_start, request.as_of)
            .await
            .map_err(|e| ForecastError::DataSource {
                reason: format!("market data: {:#}", e),
            })?;

        let economic = self
            .economic_data
            .get_series(self.schema.economic_series(), economic_start, request.as_of)
            .await
            .map_err(|e| ForecastError::DataSource {
                reason: format!("economic data: {:#}", e),
            })?;

        let history = market
            .between(history_start, request.as_of)
            .column_series(self.schema.target())
            .ok_or_else(|| {
                ForecastError::feature_mismatch(format!(
                    "market data has no '{}' column",
                    self.schema.target()
                ))
            })?;

        let unified = unify(&market.between(input_start, request.as_of), &economic)?
            .select(&self.schema.columns())?;

        let seed = self
            .builder
            .build(&unified, &self.schema, self.feature_scaler.as_ref())?;
        if seed.anchor_date < request.as_of {
            warn!(
                "Latest complete observation is {} (requested as of {})",
                seed.anchor_date, request.as_of
            );
        }

        // Model calls block; run them off the async worker so the task
        // holding the cancel token can still be scheduled.
        let forecaster = Arc::clone(&self.forecaster);
        let rollout_seed = seed.clone();
        let rollout_cancel = cancel.clone();
        let horizon = request.horizon;
        let trajectory = tokio::task::spawn_blocking(move || {
            forecaster.forecast_with_cancel(&rollout_seed, horizon, &rollout_cancel)
        })
        .await
        .map_err(|e| ForecastError::WorkerFailed {
            reason: e.to_string(),
        })??;

        let (trend, change_pct) = match trajectory.last() {
            Some(last) => (
                Trend::classify(seed.last_price, last.price, self.config.trend_threshold_pct),
                percent_change(seed.last_price, last.price),
            ),
            None => (Trend::Stable, 0.0),
        };

        info!(
            "Forecast complete: {} steps from {:.2} on {}, trend {} ({:+.2}%)",
            trajectory.len(),
            seed.last_price,
            seed.anchor_date,
            trend,
            change_pct
        );

        Ok(ForecastReport {
            target: self.schema.target().to_string(),
            period: request.period,
            anchor_date: seed.anchor_date,
            last_price: seed.last_price,
            history,
            trajectory,
            trend,
            change_pct,
        })
    }
}
