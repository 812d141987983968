pub mod csv_source;
pub mod mock;
pub mod onnx_predictor;
pub mod scalers;

pub use csv_source::{CsvEconomicDataService, CsvMarketDataService};
pub use mock::{MockEconomicDataService, MockMarketDataService, NaivePredictor};
pub use onnx_predictor::OnnxPredictor;
pub use scalers::{FittedScaler, MinMaxScaler, StandardScaler};
