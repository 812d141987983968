use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback period offered for the historical price view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    OneWeek,
    FifteenDays,
    #[default]
    OneMonth,
    ThreeMonths,
    OneYear,
    FiveYears,
}

impl HistoryPeriod {
    pub fn all() -> Vec<HistoryPeriod> {
        vec![
            HistoryPeriod::OneWeek,
            HistoryPeriod::FifteenDays,
            HistoryPeriod::OneMonth,
            HistoryPeriod::ThreeMonths,
            HistoryPeriod::OneYear,
            HistoryPeriod::FiveYears,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryPeriod::OneWeek => "1 Week",
            HistoryPeriod::FifteenDays => "15 Days",
            HistoryPeriod::OneMonth => "1 Month",
            HistoryPeriod::ThreeMonths => "3 Months",
            HistoryPeriod::OneYear => "1 Year",
            HistoryPeriod::FiveYears => "5 Years",
        }
    }

    /// First date of the period ending at `end`. Month arithmetic clamps to
    /// the last day of shorter months.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        let start = match self {
            HistoryPeriod::OneWeek => end.checked_sub_days(Days::new(7)),
            HistoryPeriod::FifteenDays => end.checked_sub_days(Days::new(15)),
            HistoryPeriod::OneMonth => end.checked_sub_months(Months::new(1)),
            HistoryPeriod::ThreeMonths => end.checked_sub_months(Months::new(3)),
            HistoryPeriod::OneYear => end.checked_sub_months(Months::new(12)),
            HistoryPeriod::FiveYears => end.checked_sub_months(Months::new(60)),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for HistoryPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        match normalized.as_str() {
            "1w" | "1week" => Ok(HistoryPeriod::OneWeek),
            "15d" | "15days" => Ok(HistoryPeriod::FifteenDays),
            "1m" | "1month" => Ok(HistoryPeriod::OneMonth),
            "3m" | "3months" => Ok(HistoryPeriod::ThreeMonths),
            "1y" | "1year" => Ok(HistoryPeriod::OneYear),
            "5y" | "5years" => Ok(HistoryPeriod::FiveYears),
            _ => anyhow::bail!(
                "Invalid history period: {}. Must be one of 1w, 15d, 1m, 3m, 1y, 5y",
                s
            ),
        }
    }
}
