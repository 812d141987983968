//! Commodity Forecast - command-line price forecaster
//!
//! Fetches recent market and economic history, rolls the model forward
//! `--horizon` days and prints the trajectory with its trend.
//!
//! # Usage
//! ```sh
//! DATA_SOURCE=mock cargo run --bin forecast -- --horizon 14 --period 3m
//! ```
//!
//! # Environment Variables
//! - `DATA_SOURCE` - `mock` (default) or `csv`
//! - `MODEL_PATH`, `FEATURE_SCALER_PATH`, `TARGET_SCALER_PATH` - model artifacts (csv mode)
//! - `MARKET_DATA_PATH`, `ECONOMIC_DATA_PATH` - wide CSV inputs (csv mode)
//! - `FORECAST_DEADLINE_MS` - abort the rollout after this many milliseconds

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use commodity_forecast::application::forecast_service::{
    ForecastReport, ForecastRequest, ForecastService,
};
use commodity_forecast::application::forecasting::PersistenceContinuation;
use commodity_forecast::config::{Config, Mode};
use commodity_forecast::domain::forecasting::HistoryPeriod;
use commodity_forecast::domain::ports::{
    EconomicDataService, MarketDataService, PointPredictor, Scaler,
};
use commodity_forecast::infrastructure::{
    CsvEconomicDataService, CsvMarketDataService, FittedScaler, MockEconomicDataService,
    MockMarketDataService, NaivePredictor, OnnxPredictor, StandardScaler,
};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of future days to forecast
    #[arg(long, default_value_t = 7)]
    horizon: usize,

    /// History period to display (1w, 15d, 1m, 3m, 1y, 5y)
    #[arg(long, default_value = "1m")]
    period: HistoryPeriod,

    /// Last date of data to use (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,
}

type Collaborators = (
    Arc<dyn MarketDataService>,
    Arc<dyn EconomicDataService>,
    Arc<dyn PointPredictor>,
    Arc<dyn Scaler>,
    Arc<dyn Scaler>,
);

fn build_collaborators(config: &Config) -> Result<Collaborators> {
    let width = config.data.schema().width();
    match config.mode {
        Mode::Mock => Ok((
            Arc::new(MockMarketDataService::new()),
            Arc::new(MockEconomicDataService::new()),
            Arc::new(NaivePredictor),
            Arc::new(StandardScaler::identity(width)),
            Arc::new(StandardScaler::identity(1)),
        )),
        Mode::Csv => {
            let predictor = OnnxPredictor::load(&config.data.model_path)?;
            let feature_scaler = FittedScaler::load(&config.data.feature_scaler_path)
                .context("Failed to load feature scaler")?;
            let target_scaler = FittedScaler::load(&config.data.target_scaler_path)
                .context("Failed to load target scaler")?;
            Ok((
                Arc::new(CsvMarketDataService::new(config.data.market_data_path.clone())),
                Arc::new(CsvEconomicDataService::new(
                    config.data.economic_data_path.clone(),
                )),
                Arc::new(predictor),
                Arc::new(feature_scaler),
                Arc::new(target_scaler),
            ))
        }
    }
}

fn print_report(report: &ForecastReport) {
    println!();
    println!("{} - history ({})", report.target, report.period);
    match (report.history.first(), report.history.last()) {
        (Some(first), Some(last)) => {
            let low = report.history.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
            let high = report.history.iter().map(|(_, p)| *p).fold(f64::NEG_INFINITY, f64::max);
            println!(
                "  {} .. {}: {} closes, low {:.2}, high {:.2}, last {:.2}",
                first.0,
                last.0,
                report.history.len(),
                low,
                high,
                last.1
            );
        }
        _ => println!("  no closes in period"),
    }

    println!();
    println!("Forecast from {} (last close {:.2})", report.anchor_date, report.last_price);
    println!("  {:<12} {:>12}", "Date", "Price");
    for point in report.trajectory.points() {
        println!("  {:<12} {:>12.2}", point.date.to_string(), point.price);
    }

    println!();
    println!("Trend: {} ({:+.2}%)", report.trend, report.change_pct);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Commodity Forecast {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    let schema = config.data.schema();
    info!(
        "Configuration loaded: Mode={:?}, Target={}, Features={}",
        config.mode,
        schema.target(),
        schema.width()
    );

    let (market, economic, predictor, feature_scaler, target_scaler) =
        build_collaborators(&config)?;
    info!("Predictor: {}", predictor.name());

    let service = ForecastService::new(
        market,
        economic,
        predictor,
        feature_scaler,
        target_scaler,
        Arc::new(PersistenceContinuation),
        schema,
        config.forecast.service_config(),
    );

    let request = ForecastRequest {
        horizon: cli.horizon,
        period: cli.period,
        as_of: cli.as_of.unwrap_or_else(|| Local::now().date_naive()),
    };

    let report = service.run(request).await.context("Forecast failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}
