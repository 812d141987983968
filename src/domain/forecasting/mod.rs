pub mod history_period;
pub mod observation;
pub mod schema;
pub mod trajectory;
pub mod window;

pub use history_period::HistoryPeriod;
pub use observation::{HistoryRow, HistoryTable, Observation};
pub use schema::{EconomicSeries, FeatureSchema, TARGET_COLUMN};
pub use trajectory::{ForecastPoint, ForecastTrajectory, Trend};
pub use window::Window;
