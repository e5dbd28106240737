use anyhow::{bail, Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use super::landmark::{HandLandmark, Landmark, LandmarkSet};
use super::preprocess::HAND_INPUT_SIZE;
use crate::config::ModelConfig;

/// MediaPipe-style hand landmark model
pub struct HandDetector {
    session: Session,
    input_name: String,
    landmarks_output: String,
    presence_output: String,
    min_presence: f32,
}

impl HandDetector {
    /// Load the ONNX model
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.path)
            .with_context(|| format!("Failed to load hand model {}", config.path))?;

        Ok(Self {
            session,
            input_name: config.input_name.clone(),
            landmarks_output: config.landmarks_output.clone(),
            presence_output: config.presence_output.clone(),
            min_presence: config.min_presence,
        })
    }

    /// Detect a hand in a preprocessed tensor
    ///
    /// Input: [1, 224, 224, 3] f32 tensor (0.0-1.0)
    /// Output: None when no hand is found
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Option<LandmarkSet>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let presence: ndarray::ArrayViewD<f32> = outputs[self.presence_output.as_str()]
            .try_extract_array()
            .context("Failed to extract presence tensor")?;
        let score = presence.iter().copied().next().unwrap_or(0.0);
        if score < self.min_presence {
            return Ok(None);
        }

        // [1, 63]: 21 x (x, y, z) in input pixels
        let output: ndarray::ArrayViewD<f32> = outputs[self.landmarks_output.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let values: Vec<f32> = output.iter().copied().collect();
        if values.len() < HandLandmark::COUNT * 3 {
            bail!("landmark tensor has {} values, expected {}", values.len(), HandLandmark::COUNT * 3);
        }

        let size = HAND_INPUT_SIZE as f32;
        let mut landmarks = [Landmark::default(); HandLandmark::COUNT];
        for (i, lm) in landmarks.iter_mut().enumerate() {
            *lm = Landmark::new(values[i * 3] / size, values[i * 3 + 1] / size);
        }

        Ok(Some(LandmarkSet::new(landmarks)))
    }
}
