use chrono::NaiveDate;
use commodity_forecast::application::forecasting::{
    AutoregressiveForecaster, CancelToken, FeatureWindowBuilder,
};
use commodity_forecast::domain::errors::ForecastError;
use commodity_forecast::domain::forecasting::{
    EconomicSeries, FeatureSchema, HistoryTable, TARGET_COLUMN, Window,
};
use commodity_forecast::domain::ports::PointPredictor;
use commodity_forecast::infrastructure::{MinMaxScaler, StandardScaler};
use std::sync::{Arc, Mutex};

/// Always predicts 0.5 and remembers every window it was shown.
struct RecordingPredictor {
    seen: Mutex<Vec<Window>>,
    cancel_after_first: Option<CancelToken>,
}

impl RecordingPredictor {
    fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            cancel_after_first: None,
        }
    }

    fn cancelling(token: CancelToken) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            cancel_after_first: Some(token),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl PointPredictor for RecordingPredictor {
    fn predict(&self, window: &Window) -> anyhow::Result<Vec<f64>> {
        self.seen.lock().unwrap().push(window.clone());
        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        Ok(vec![0.5])
    }

    fn name(&self) -> &str {
        "recording stub"
    }
}

fn schema() -> FeatureSchema {
    FeatureSchema::new(
        "GC=F".to_string(),
        vec![
            "DX-Y.NYB".to_string(),
            "CL=F".to_string(),
            "^GSPC".to_string(),
            "SI=F".to_string(),
        ],
        vec![
            EconomicSeries::new("Inflation_CPI", "CPIAUCSL"),
            EconomicSeries::new("InterestRate", "DFF"),
        ],
    )
}

/// `days` consecutive daily rows starting 2024-01-01, 7 columns.
fn history(days: usize) -> HistoryTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut table = HistoryTable::new(schema().columns());
    for i in 0..days {
        let date = start + chrono::Days::new(i as u64);
        let values = (0..7)
            .map(|j| {
                let value = if j == 0 {
                    2000.0 + i as f64
                } else {
                    j as f64 * 10.0 + i as f64 * 0.1
                };
                Some(value)
            })
            .collect();
        table.insert(date, values).unwrap();
    }
    table
}

fn forecaster(predictor: Arc<RecordingPredictor>) -> AutoregressiveForecaster {
    // 0.5 maps back to 2000.0
    let target_scaler = MinMaxScaler::new(vec![1900.0], vec![2100.0], (0.0, 1.0)).unwrap();
    AutoregressiveForecaster::new(predictor, Arc::new(target_scaler))
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn test_three_step_forecast_end_to_end() {
    let seed = FeatureWindowBuilder::new(60)
        .build(&history(60), &schema(), &StandardScaler::identity(7))
        .unwrap();
    // Jan 1 + 59 days, leap year
    assert_eq!(seed.anchor_date, date(2, 29));
    assert_eq!(seed.last_price, 2059.0);

    let predictor = Arc::new(RecordingPredictor::new());
    let trajectory = forecaster(predictor.clone()).forecast(&seed, 3).unwrap();

    let dates: Vec<NaiveDate> = trajectory.points().iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![date(3, 1), date(3, 2), date(3, 3)]);
    for point in trajectory.points() {
        assert!((point.price - 2000.0).abs() < 1e-9);
    }
    assert_eq!(trajectory.scaled_predictions(), &[0.5, 0.5, 0.5]);
    assert_eq!(predictor.calls(), 3);
}

#[test]
fn test_windows_feed_back_predictions_and_persist_auxiliaries() {
    let seed = FeatureWindowBuilder::new(60)
        .build(&history(60), &schema(), &StandardScaler::identity(7))
        .unwrap();
    let last_history_row = seed.window.last_row().to_owned();

    let predictor = Arc::new(RecordingPredictor::new());
    forecaster(predictor.clone()).forecast(&seed, 3).unwrap();

    let seen = predictor.seen.lock().unwrap();
    assert_eq!(seen[0], seed.window);

    // Third call: the last two rows are synthetic.
    let third = &seen[2];
    assert_eq!(third.len(), 60);
    for offset in [2, 1] {
        let row = third.row(third.len() - offset);
        assert_eq!(row[TARGET_COLUMN], 0.5);
        for j in 1..7 {
            assert_eq!(row[j], last_history_row[j]);
        }
    }
    // Oldest two history rows have slid out.
    assert_eq!(third.row(0), seed.window.row(2));
}

#[test]
fn test_zero_horizon_never_calls_model() {
    let seed = FeatureWindowBuilder::new(60)
        .build(&history(60), &schema(), &StandardScaler::identity(7))
        .unwrap();
    let predictor = Arc::new(RecordingPredictor::new());

    let trajectory = forecaster(predictor.clone()).forecast(&seed, 0).unwrap();

    assert!(trajectory.is_empty());
    assert_eq!(predictor.calls(), 0);
}

#[test]
fn test_horizon_above_ceiling_is_rejected_up_front() {
    let seed = FeatureWindowBuilder::new(60)
        .build(&history(60), &schema(), &StandardScaler::identity(7))
        .unwrap();
    let predictor = Arc::new(RecordingPredictor::new());

    let result = forecaster(predictor.clone()).forecast(&seed, 2001);

    assert!(matches!(
        result,
        Err(ForecastError::HorizonTooLarge {
            requested: 2001,
            max: 2000
        })
    ));
    assert_eq!(predictor.calls(), 0);
}

#[test]
fn test_short_history_is_insufficient() {
    let result =
        FeatureWindowBuilder::new(60).build(&history(59), &schema(), &StandardScaler::identity(7));

    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory {
            required: 60,
            available: 59
        })
    ));
}

#[test]
fn test_cancellation_stops_before_next_step() {
    let seed = FeatureWindowBuilder::new(60)
        .build(&history(60), &schema(), &StandardScaler::identity(7))
        .unwrap();
    let token = CancelToken::new();
    let predictor = Arc::new(RecordingPredictor::cancelling(token.clone()));

    let result = forecaster(predictor.clone()).forecast_with_cancel(&seed, 10, &token);

    assert!(matches!(result, Err(ForecastError::Cancelled { step: 2 })));
    assert_eq!(predictor.calls(), 1);
}
