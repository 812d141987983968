//! Autoregressive multi-step forecasting.
//!
//! The builder turns raw history into the model's initial context; the
//! forecaster rolls that context forward one predicted step at a time.

pub mod cancellation;
pub mod continuation;
pub mod forecaster;
pub mod window_builder;

pub use cancellation::CancelToken;
pub use continuation::{FeatureContinuation, PersistenceContinuation};
pub use forecaster::{AutoregressiveForecaster, DEFAULT_MAX_HORIZON, ForecastState};
pub use window_builder::{DEFAULT_WINDOW_LENGTH, FeatureWindowBuilder, SeedWindow};
