use crate::domain::errors::ForecastError;
use crate::domain::forecasting::{TARGET_COLUMN, Window};
use ndarray::Array1;

/// Builds the full feature row of a synthetic future step.
///
/// The model predicts only the target, but the next window needs N values
/// per step. The policy decides what the N-1 auxiliary values become.
pub trait FeatureContinuation: Send + Sync {
    /// `previous` is the window the prediction was made from; `next_target`
    /// is the prediction in scaled units.
    fn next_row(&self, previous: &Window, next_target: f64) -> Result<Array1<f64>, ForecastError>;

    fn name(&self) -> &str;
}

/// Auxiliary features stay at their last value for the whole horizon.
///
/// The new row is the last row of `previous` with the target column replaced
/// by the prediction. Longer horizons drift because of this assumption.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceContinuation;

impl FeatureContinuation for PersistenceContinuation {
    fn next_row(&self, previous: &Window, next_target: f64) -> Result<Array1<f64>, ForecastError> {
        let mut row = previous.last_row().to_owned();
        match row.get_mut(TARGET_COLUMN) {
            Some(target) => *target = next_target,
            None => {
                return Err(ForecastError::feature_mismatch(
                    "window row has no target column",
                ));
            }
        }
        Ok(row)
    }

    fn name(&self) -> &str {
        "persistence"
    }
}
