use crate::domain::forecasting::Window;
use crate::domain::ports::PointPredictor;
use anyhow::{Context, Result, anyhow};
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Sequence model exported to ONNX, taking a `[1, W, N]` f32 tensor.
///
/// Stateless between calls: the whole window is passed every time. The
/// session sits behind a mutex so one loaded model can serve concurrent
/// forecast runs.
pub struct OnnxPredictor {
    session: Mutex<Session>,
}

impl OnnxPredictor {
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found at {:?}", model_path);
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {:?}", model_path))?;

        info!("Successfully loaded ONNX model from {:?}", model_path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl PointPredictor for OnnxPredictor {
    fn predict(&self, window: &Window) -> Result<Vec<f64>> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Session lock failed: {}", e))?;

        let shape = vec![1, window.len(), window.n_features()];
        let input_value = ort::value::Value::from_array((shape.as_slice(), window.to_f32_vec()))
            .context("Input value creation failed")?;

        let inputs = ort::inputs![input_value];
        let outputs = session.run(inputs).context("ONNX inference failed")?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| anyhow!("No output found"))?;
        let data = output_value
            .try_extract_tensor::<f32>()
            .context("Output is not an f32 tensor")?;

        let values: Vec<f64> = data.1.iter().map(|v| *v as f64).collect();
        debug!("ONNX output: {} value(s)", values.len());
        Ok(values)
    }

    fn name(&self) -> &str {
        "ONNX Runtime"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_an_error() {
        let result = OnnxPredictor::load(Path::new("non_existent.onnx"));
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("not found"));
    }
}
