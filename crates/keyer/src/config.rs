use crate::KeyerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of keypoint channels the head predicts per region.
pub const DEFAULT_NUM_KEYPOINTS: usize = 10;
/// Side length of the square heatmap emitted per region.
pub const DEFAULT_HEATMAP_SIZE: usize = 56;

/// Configuration for keypoint post-processing.
///
/// Missing fields in a JSON file fall back to [`Default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyerConfig {
    enable_postprocess: bool,
    threshold: f32,
    padding: usize,
    num_keypoints: usize,
    heatmap_size: usize,
    min_size: usize,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            enable_postprocess: true,
            threshold: 0.5,
            padding: 1,
            num_keypoints: DEFAULT_NUM_KEYPOINTS,
            heatmap_size: DEFAULT_HEATMAP_SIZE,
            min_size: 0,
        }
    }
}

impl KeyerConfig {
    /// Decode heatmaps into keypoints (`true`) or pass them through raw.
    pub fn with_enable_postprocess(mut self, enable: bool) -> Self {
        self.enable_postprocess = enable;
        self
    }

    /// Set the binarization threshold used when pasting; negative values
    /// produce byte intensities instead of a mask.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the zero padding added around a heatmap before pasting.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_num_keypoints(mut self, num_keypoints: usize) -> Self {
        self.num_keypoints = num_keypoints;
        self
    }

    pub fn with_heatmap_size(mut self, heatmap_size: usize) -> Self {
        self.heatmap_size = heatmap_size;
        self
    }

    /// Set the minimum resampled region side; 0 disables the floor.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    // Getters
    pub fn enable_postprocess(&self) -> bool {
        self.enable_postprocess
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn num_keypoints(&self) -> usize {
        self.num_keypoints
    }

    pub fn heatmap_size(&self) -> usize {
        self.heatmap_size
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn validate(&self) -> Result<(), KeyerError> {
        if self.num_keypoints == 0 {
            return Err(KeyerError::InvalidConfig(
                "num_keypoints must be at least 1".to_string(),
            ));
        }
        if self.heatmap_size == 0 {
            return Err(KeyerError::InvalidConfig(
                "heatmap_size must be at least 1".to_string(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(KeyerError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, KeyerError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeyerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| KeyerError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}
