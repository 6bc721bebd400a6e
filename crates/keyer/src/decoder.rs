use crate::normalize::scores_to_probs;
use crate::peak::extract_peak;
use crate::remap::remap_peak;
use crate::resample::{resample_region, RegionTarget};
use crate::types::{DecodedKeypoint, KeypointChannel, KeypointRecord};
use crate::{KeyerConfig, KeyerError};
use keyer_base::{Rect, Tensor};
use log::{debug, trace, warn};

/// Turns per-region heatmap stacks into keypoint records.
///
/// Each region is resampled to its own pixel size with bicubic
/// interpolation, normalized per channel, and reduced to one peak per
/// channel whose position is mapped back into the image frame. Regions share
/// no state.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapDecoder {
    num_keypoints: usize,
    min_size: usize,
}

impl HeatmapDecoder {
    pub fn new(num_keypoints: usize) -> Self {
        Self {
            num_keypoints,
            min_size: 0,
        }
    }

    pub fn from_config(config: &KeyerConfig) -> Self {
        Self::new(config.num_keypoints()).with_min_size(config.min_size())
    }

    /// Raise each resampled side to at least `min_size` (0 disables).
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn num_keypoints(&self) -> usize {
        self.num_keypoints
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// Decode every region. `heatmaps[i]` is the `[K, H, W]` stack predicted
    /// for `regions[i]`.
    pub fn decode(
        &self,
        heatmaps: &[Tensor<f32>],
        regions: &[Rect<f32>],
    ) -> Result<Vec<KeypointRecord>, KeyerError> {
        if heatmaps.len() != regions.len() {
            return Err(KeyerError::CountMismatch {
                heatmaps: heatmaps.len(),
                regions: regions.len(),
            });
        }

        debug!(
            "decoding {} regions with {} keypoint channels",
            regions.len(),
            self.num_keypoints
        );

        heatmaps
            .iter()
            .zip(regions)
            .map(|(stack, region)| self.decode_one(stack, region))
            .collect()
    }

    /// Decode a single region.
    pub fn decode_one(
        &self,
        heatmaps: &Tensor<f32>,
        region: &Rect<f32>,
    ) -> Result<KeypointRecord, KeyerError> {
        let (channels, h, w) = heatmaps.dims3()?;
        if channels != self.num_keypoints {
            return Err(KeyerError::ChannelMismatch {
                expected: self.num_keypoints,
                got: channels,
            });
        }
        if h == 0 || w == 0 {
            return Err(KeyerError::Shape {
                expected: "non-empty [K, H, W] heatmap stack".to_string(),
                got: format!("{:?}", heatmaps.shape),
            });
        }
        if region.width() < 0.0 || region.height() < 0.0 {
            warn!("inverted region {:?}, clamping extent to one pixel", region.to_xyxy());
        }

        let target = RegionTarget::for_region(region, self.min_size);
        trace!(
            "region {:?}: {}x{} -> {}x{}",
            region.to_xyxy(),
            w,
            h,
            target.width,
            target.height
        );

        let resampled = resample_region(heatmaps, &target)?;
        let probs = scores_to_probs(&resampled)?;

        let keypoints = KeypointChannel::all(self.num_keypoints)
            .map(|channel| -> Result<DecodedKeypoint, KeyerError> {
                let peak = extract_peak(
                    resampled.slice(channel.index())?,
                    probs.slice(channel.index())?,
                    target.width,
                )?;
                let position = remap_peak(&peak, &target, region.origin);
                Ok(DecodedKeypoint {
                    x: position.x,
                    y: position.y,
                    score: peak.score,
                    probability: peak.probability,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(KeypointRecord { keypoints })
    }
}
