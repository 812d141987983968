use crate::domain::errors::ForecastError;
use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate, s};

/// Fixed-length context passed to the model: W rows × N features, scaled.
///
/// A `Window` is never mutated. Sliding yields a new value with the oldest
/// row dropped and the new row appended, so the row count stays at W.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: Array2<f64>,
}

impl Window {
    pub fn new(values: Array2<f64>) -> Result<Self, ForecastError> {
        if values.nrows() == 0 {
            return Err(ForecastError::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }
        if values.ncols() == 0 {
            return Err(ForecastError::feature_mismatch("window has no feature columns"));
        }
        Ok(Self { values })
    }

    /// Number of time steps (W).
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of features per step (N).
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    pub fn last_row(&self) -> ArrayView1<'_, f64> {
        self.values.row(self.len() - 1)
    }

    /// Drops the oldest row and appends `row`.
    pub fn slide(&self, row: &Array1<f64>) -> Result<Self, ForecastError> {
        if row.len() != self.n_features() {
            return Err(ForecastError::feature_mismatch(format!(
                "new row has {} features, window has {}",
                row.len(),
                self.n_features()
            )));
        }

        let values = concatenate(
            Axis(0),
            &[self.values.slice(s![1.., ..]), row.view().insert_axis(Axis(0))],
        )
        .map_err(|e| ForecastError::feature_mismatch(e.to_string()))?;

        Ok(Self { values })
    }

    /// Row-major flattening for `[1, W, N]` tensors.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_slide_keeps_length_and_order() {
        let window = Window::new(array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]]).unwrap();
        let next = window.slide(&array![4.0, 40.0]).unwrap();

        assert_eq!(next.len(), 3);
        assert_eq!(next.values(), &array![[2.0, 20.0], [3.0, 30.0], [4.0, 40.0]]);
        // Original is untouched
        assert_eq!(window.row(0), array![1.0, 10.0]);
    }

    #[test]
    fn test_slide_single_row_window() {
        let window = Window::new(array![[1.0, 2.0]]).unwrap();
        let next = window.slide(&array![3.0, 4.0]).unwrap();
        assert_eq!(next.values(), &array![[3.0, 4.0]]);
    }

    #[test]
    fn test_slide_rejects_wrong_width() {
        let window = Window::new(array![[1.0, 2.0]]).unwrap();
        let result = window.slide(&array![3.0]);
        assert!(matches!(result, Err(ForecastError::FeatureMismatch { .. })));
    }

    #[test]
    fn test_empty_window_rejected() {
        let result = Window::new(Array2::zeros((0, 3)));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_flatten_is_row_major() {
        let window = Window::new(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(window.to_f32_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }
}
