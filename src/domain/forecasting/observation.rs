use crate::domain::errors::ForecastError;
use crate::domain::forecasting::schema::TARGET_COLUMN;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One complete time step in raw units, columns in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

impl Observation {
    pub fn target(&self) -> f64 {
        self.values[TARGET_COLUMN]
    }
}

/// A dated row that may contain gaps (holidays, late publications).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Named-column daily table as produced by the data sources.
///
/// Rows are kept sorted by date with at most one row per date, and every
/// row is as wide as `columns`. Only `insert` adds rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoryTable {
    columns: Vec<String>,
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from unordered rows. Later rows win on duplicate dates.
    pub fn from_rows(columns: Vec<String>, rows: Vec<HistoryRow>) -> Result<Self, ForecastError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.insert(row.date, row.values)?;
        }
        Ok(table)
    }

    /// Inserts or replaces the row for `date`.
    pub fn insert(
        &mut self,
        date: NaiveDate,
        values: Vec<Option<f64>>,
    ) -> Result<(), ForecastError> {
        if values.len() != self.columns.len() {
            return Err(ForecastError::feature_mismatch(format!(
                "row for {} has {} values, table has {} columns",
                date,
                values.len(),
                self.columns.len()
            )));
        }

        match self.rows.binary_search_by_key(&date, |r| r.date) {
            Ok(idx) => self.rows[idx].values = values,
            Err(idx) => self.rows.insert(idx, HistoryRow { date, values }),
        }
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column paired with their dates, gaps skipped.
    pub fn column_series(&self, name: &str) -> Option<Vec<(NaiveDate, f64)>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|r| r.values[idx].map(|v| (r.date, v)))
                .collect(),
        )
    }

    /// Projects the table onto `columns`, in that order.
    pub fn select(&self, columns: &[String]) -> Result<Self, ForecastError> {
        let indices = columns
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    ForecastError::feature_mismatch(format!("missing column '{}'", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|r| HistoryRow {
                date: r.date,
                values: indices.iter().map(|&i| r.values[i]).collect(),
            })
            .collect();

        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    /// Renames columns positionally.
    pub fn with_column_names(mut self, columns: Vec<String>) -> Result<Self, ForecastError> {
        if columns.len() != self.columns.len() {
            return Err(ForecastError::feature_mismatch(format!(
                "cannot rename {} columns with {} names",
                self.columns.len(),
                columns.len()
            )));
        }
        self.columns = columns;
        Ok(self)
    }

    /// Rows dated within `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| r.date >= start && r.date <= end)
                .cloned()
                .collect(),
        }
    }

    /// Carries the last known value of each column forward over gaps.
    /// Leading gaps stay empty.
    pub fn forward_filled(&self) -> Self {
        let mut last: Vec<Option<f64>> = vec![None; self.columns.len()];
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let values = r
                    .values
                    .iter()
                    .zip(last.iter_mut())
                    .map(|(value, carried)| {
                        if value.is_some() {
                            *carried = *value;
                        }
                        *carried
                    })
                    .collect();
                HistoryRow {
                    date: r.date,
                    values,
                }
            })
            .collect();

        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Rows without gaps, as observations.
    pub fn complete_observations(&self) -> Vec<Observation> {
        self.rows
            .iter()
            .filter_map(|r| {
                r.values
                    .iter()
                    .copied()
                    .collect::<Option<Vec<f64>>>()
                    .map(|values| Observation {
                        date: r.date,
                        values,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn table() -> HistoryTable {
        HistoryTable::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![
                HistoryRow {
                    date: date(3),
                    values: vec![Some(3.0), None],
                },
                HistoryRow {
                    date: date(1),
                    values: vec![None, Some(10.0)],
                },
                HistoryRow {
                    date: date(2),
                    values: vec![Some(2.0), None],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_are_sorted_by_date() {
        let t = table();
        let dates: Vec<_> = t.rows().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(1), date(2), date(3)]);
    }

    #[test]
    fn test_insert_rejects_wrong_width() {
        let mut t = table();
        let result = t.insert(date(4), vec![Some(1.0)]);
        assert!(matches!(result, Err(ForecastError::FeatureMismatch { .. })));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = HistoryTable::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![
                HistoryRow {
                    date: date(1),
                    values: vec![Some(1.0), Some(2.0)],
                },
                HistoryRow {
                    date: date(2),
                    values: vec![Some(1.0)],
                },
            ],
        );
        assert!(matches!(result, Err(ForecastError::FeatureMismatch { .. })));
    }

    #[test]
    fn test_forward_fill_keeps_leading_gaps() {
        let filled = table().forward_filled();

        assert_eq!(filled.rows()[0].values, vec![None, Some(10.0)]);
        assert_eq!(filled.rows()[1].values, vec![Some(2.0), Some(10.0)]);
        assert_eq!(filled.rows()[2].values, vec![Some(3.0), Some(10.0)]);
    }

    #[test]
    fn test_complete_observations_drop_gappy_rows() {
        let observations = table().forward_filled().complete_observations();

        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].date, date(2));
        assert_eq!(observations[0].target(), 2.0);
        assert_eq!(observations[0].values, vec![2.0, 10.0]);
    }

    #[test]
    fn test_select_reorders_and_reports_missing() {
        let t = table();
        let swapped = t.select(&["b".to_string(), "a".to_string()]).unwrap();
        assert_eq!(swapped.columns(), &["b".to_string(), "a".to_string()]);
        assert_eq!(swapped.rows()[0].values, vec![Some(10.0), None]);

        let missing = t.select(&["c".to_string()]);
        assert!(matches!(missing, Err(ForecastError::FeatureMismatch { .. })));
    }

    #[test]
    fn test_between_is_inclusive() {
        let t = table().between(date(2), date(3));
        assert_eq!(t.len(), 2);
    }
}
