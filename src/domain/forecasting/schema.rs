use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column index of the forecast target in every feature row.
pub const TARGET_COLUMN: usize = 0;

/// Default forecast target (COMEX gold futures).
pub const DEFAULT_TARGET_SYMBOL: &str = "GC=F";

/// Default auxiliary market symbols, in model order.
pub const DEFAULT_AUXILIARY_SYMBOLS: &[&str] =
    &["DX-Y.NYB", "CL=F", "^GSPC", "^NSEI", "SI=F", "INR=X"];

/// Default macroeconomic series as `(column name, series code)`, in model order.
pub const DEFAULT_ECONOMIC_SERIES: &[(&str, &str)] =
    &[("Inflation_CPI", "CPIAUCSL"), ("InterestRate", "DFF")];

/// A macroeconomic series: the column name the model knows it by and the
/// code the economic data source publishes it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicSeries {
    pub name: String,
    pub code: String,
}

impl EconomicSeries {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

impl FromStr for EconomicSeries {
    type Err = anyhow::Error;

    /// Parses `Name:CODE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, code)) if !name.trim().is_empty() && !code.trim().is_empty() => {
                Ok(EconomicSeries::new(name.trim(), code.trim()))
            }
            _ => anyhow::bail!("Invalid economic series '{}'. Expected 'Name:CODE'", s),
        }
    }
}

impl fmt::Display for EconomicSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.code)
    }
}

/// Ordered feature layout shared by the model and both scalers.
///
/// Row layout is `[target, market symbols..., economic series...]`.
/// This order must match the one the model was trained with; reordering
/// columns silently corrupts every prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    target: String,
    market_symbols: Vec<String>,
    economic_series: Vec<EconomicSeries>,
}

impl FeatureSchema {
    pub fn new(
        target: impl Into<String>,
        market_symbols: Vec<String>,
        economic_series: Vec<EconomicSeries>,
    ) -> Self {
        Self {
            target: target.into(),
            market_symbols,
            economic_series,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn economic_series(&self) -> &[EconomicSeries] {
        &self.economic_series
    }

    /// Symbols to request from the market data source (target first).
    pub fn symbols_to_fetch(&self) -> Vec<String> {
        std::iter::once(self.target.clone())
            .chain(self.market_symbols.iter().cloned())
            .collect()
    }

    /// All column names in model order.
    pub fn columns(&self) -> Vec<String> {
        self.symbols_to_fetch()
            .into_iter()
            .chain(self.economic_series.iter().map(|s| s.name.clone()))
            .collect()
    }

    /// Number of features per row (N).
    pub fn width(&self) -> usize {
        1 + self.market_symbols.len() + self.economic_series.len()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::new(
            DEFAULT_TARGET_SYMBOL,
            DEFAULT_AUXILIARY_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            DEFAULT_ECONOMIC_SERIES
                .iter()
                .map(|(name, code)| EconomicSeries::new(*name, *code))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_layout() {
        let schema = FeatureSchema::default();
        let columns = schema.columns();

        assert_eq!(columns.len(), schema.width());
        assert_eq!(columns[TARGET_COLUMN], "GC=F");
        assert_eq!(columns[1], "DX-Y.NYB");
        assert_eq!(columns.last().map(String::as_str), Some("InterestRate"));
    }

    #[test]
    fn test_symbols_to_fetch_excludes_economic_series() {
        let schema = FeatureSchema::default();
        let symbols = schema.symbols_to_fetch();

        assert_eq!(symbols.len(), 7);
        assert!(!symbols.iter().any(|s| s == "Inflation_CPI"));
    }

    #[test]
    fn test_economic_series_parsing() {
        let series: EconomicSeries = "Inflation_CPI:CPIAUCSL".parse().unwrap();
        assert_eq!(series.name, "Inflation_CPI");
        assert_eq!(series.code, "CPIAUCSL");

        assert!("CPIAUCSL".parse::<EconomicSeries>().is_err());
        assert!(":DFF".parse::<EconomicSeries>().is_err());
    }
}
