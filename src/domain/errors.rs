use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a forecast run.
///
/// None of these are retried: a failed step invalidates the rest of the
/// autoregressive chain, so the run ends and no partial trajectory is returned.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Insufficient history: need {required} complete observations, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Feature mismatch: {reason}")]
    FeatureMismatch { reason: String },

    #[error("Model inference failed at step {step}: {reason}")]
    ModelInference { step: usize, reason: String },

    #[error("Horizon too large: requested {requested} steps, maximum is {max}")]
    HorizonTooLarge { requested: usize, max: usize },

    #[error("Forecast cancelled before step {step}")]
    Cancelled { step: usize },

    #[error("Forecast deadline exceeded before step {step}")]
    DeadlineExceeded { step: usize },

    #[error("Forecast date out of range: {anchor} + {days} days")]
    DateOverflow { anchor: NaiveDate, days: usize },

    #[error("Data source error: {reason}")]
    DataSource { reason: String },

    #[error("Forecast worker failed: {reason}")]
    WorkerFailed { reason: String },
}

impl ForecastError {
    pub fn feature_mismatch(reason: impl Into<String>) -> Self {
        ForecastError::FeatureMismatch {
            reason: reason.into(),
        }
    }
}
