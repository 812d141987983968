//! File-backed market and economic data.
//!
//! Both sources read "wide" CSV files: a `date` column (`YYYY-MM-DD`) followed
//! by one numeric column per symbol or series code. Empty cells are gaps.
//!
//! ```text
//! date,GC=F,DX-Y.NYB,CL=F
//! 2024-03-01,2095.7,103.86,79.97
//! 2024-03-04,2126.3,,78.74
//! ```

use crate::domain::forecasting::{EconomicSeries, HistoryTable};
use crate::domain::ports::{EconomicDataService, MarketDataService};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a wide CSV file into a table named by its header.
pub fn read_wide_csv(path: &Path) -> Result<HistoryTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header of {:?}", path))?
        .clone();

    let mut header_iter = headers.iter();
    match header_iter.next() {
        Some(first) if first.eq_ignore_ascii_case("date") => {}
        other => anyhow::bail!(
            "First column of {:?} must be 'date', found {:?}",
            path,
            other
        ),
    }
    let columns: Vec<String> = header_iter.map(|h| h.to_string()).collect();

    let mut table = HistoryTable::new(columns);
    for (line, record) in reader.records().enumerate() {
        let line = line + 2;
        let record =
            record.with_context(|| format!("Malformed CSV record {} in {:?}", line, path))?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).with_context(|| {
            format!("Invalid date '{}' on line {} of {:?}", raw_date, line, path)
        })?;

        let values = record
            .iter()
            .skip(1)
            .map(|cell| {
                if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell == "." {
                    Ok(None)
                } else {
                    cell.parse::<f64>().map(Some).with_context(|| {
                        format!("Invalid number '{}' on line {} of {:?}", cell, line, path)
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        table.insert(date, values)?;
    }

    debug!(
        "Read {} rows x {} columns from {:?}",
        table.len(),
        table.columns().len(),
        path
    );
    Ok(table)
}

/// Daily closes from a wide CSV file with one column per symbol.
pub struct CsvMarketDataService {
    path: PathBuf,
}

impl CsvMarketDataService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl MarketDataService for CsvMarketDataService {
    async fn get_daily_closes(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable> {
        let path = self.path.clone();
        let table = tokio::task::spawn_blocking(move || read_wide_csv(&path))
            .await
            .context("CSV reader task failed")??;

        let selected = table
            .select(symbols)
            .with_context(|| format!("Market data file {:?}", self.path))?;
        Ok(selected.between(start, end))
    }
}

/// Economic indicators from a wide CSV file with one column per series code.
pub struct CsvEconomicDataService {
    path: PathBuf,
}

impl CsvEconomicDataService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl EconomicDataService for CsvEconomicDataService {
    async fn get_series(
        &self,
        series: &[EconomicSeries],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryTable> {
        let path = self.path.clone();
        let table = tokio::task::spawn_blocking(move || read_wide_csv(&path))
            .await
            .context("CSV reader task failed")??;

        let codes: Vec<String> = series.iter().map(|s| s.code.clone()).collect();
        let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
        let selected = table
            .select(&codes)
            .and_then(|t| t.with_column_names(names))
            .with_context(|| format!("Economic data file {:?}", self.path))?;

        Ok(selected.between(start, end))
    }
}
