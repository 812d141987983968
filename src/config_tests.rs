use crate::config::{Config, Mode, env_lock};
use std::env;
use std::time::Duration;

// SAFETY for all env mutations below: callers hold `env_lock()`, so no other
// test in this crate reads or writes the environment concurrently.
fn set(key: &str, value: &str) {
    unsafe { env::set_var(key, value) };
}

fn unset(key: &str) {
    unsafe { env::remove_var(key) };
}

#[test]
fn test_config_with_forecast_overrides() {
    let _guard = env_lock().lock().unwrap();
    set("WINDOW_LENGTH", "30");
    set("MAX_HORIZON", "365");
    set("TREND_THRESHOLD_PCT", "1.5");
    set("FORECAST_DEADLINE_MS", "2500");

    let config = Config::from_env().unwrap();
    let service = config.forecast.service_config();

    assert_eq!(service.window_length, 30);
    assert_eq!(service.max_horizon, 365);
    assert!((service.trend_threshold_pct - 1.5).abs() < 1e-12);
    assert_eq!(service.deadline, Some(Duration::from_millis(2500)));

    // Cleanup
    for key in ["WINDOW_LENGTH", "MAX_HORIZON", "TREND_THRESHOLD_PCT", "FORECAST_DEADLINE_MS"] {
        unset(key);
    }
}

#[test]
fn test_config_with_custom_schema() {
    let _guard = env_lock().lock().unwrap();
    set("DATA_SOURCE", "csv");
    set("TARGET_SYMBOL", "SI=F");
    set("AUXILIARY_SYMBOLS", "GC=F, CL=F");
    set("ECONOMIC_SERIES", "Unemployment:UNRATE");

    let config = Config::from_env().unwrap();
    let schema = config.data.schema();

    assert_eq!(config.mode, Mode::Csv);
    assert_eq!(
        schema.columns(),
        vec![
            "SI=F".to_string(),
            "GC=F".to_string(),
            "CL=F".to_string(),
            "Unemployment".to_string()
        ]
    );
    assert_eq!(schema.economic_series()[0].code, "UNRATE");

    for key in ["DATA_SOURCE", "TARGET_SYMBOL", "AUXILIARY_SYMBOLS", "ECONOMIC_SERIES"] {
        unset(key);
    }
}

#[test]
fn test_config_rejects_invalid_values() {
    let _guard = env_lock().lock().unwrap();

    set("WINDOW_LENGTH", "sixty");
    let err = Config::from_env().unwrap_err();
    assert!(format!("{:#}", err).contains("WINDOW_LENGTH"));
    set("WINDOW_LENGTH", "0");
    assert!(Config::from_env().is_err());
    unset("WINDOW_LENGTH");

    set("ECONOMIC_SERIES", "NoCodeHere");
    assert!(Config::from_env().is_err());
    unset("ECONOMIC_SERIES");

    set("DATA_SOURCE", "yahoo");
    assert!(Config::from_env().is_err());
    unset("DATA_SOURCE");
}
