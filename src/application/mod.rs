// Autoregressive forecasting core
pub mod forecasting;

// Market and economic data alignment
pub mod market_data;

// Forecast orchestration
pub mod forecast_service;
