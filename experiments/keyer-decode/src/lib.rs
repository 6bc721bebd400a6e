use keyer::postprocess::{HEATMAPS_FIELD, LABELS_FIELD};
use keyer::{
    paste_ke_in_image, DecodedKeypoint, Detections, Field, KeyerConfig, KeyerError,
    KeypointPostProcessor, PastedMask,
};
use keyer_base::{Rect, Tensor};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Heatmaps and boxes of one image, as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeRequest {
    /// `[width, height]`
    pub image_size: [usize; 2],
    /// `[x0, y0, x1, y1]` per region
    pub boxes: Vec<[f32; 4]>,
    /// Flattened `[K, S, S]` stack per region
    pub heatmaps: Vec<Vec<f32>>,
    /// Optional class label per region for class-specific heatmaps
    #[serde(default)]
    pub labels: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionKeypoints {
    pub bbox: [f32; 4],
    pub keypoints: Vec<DecodedKeypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeResponse {
    pub image_size: [usize; 2],
    pub regions: Vec<RegionKeypoints>,
}

impl DecodeRequest {
    pub fn from_json_str(json: &str) -> Result<Self, KeyerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn regions(&self) -> Vec<Rect<f32>> {
        self.boxes.iter().copied().map(Rect::from_xyxy).collect()
    }

    /// Stack all regions into `[R, C, S, S]` logits, where `C` is inferred
    /// from the first region's length and the configured heatmap size.
    pub fn logits(&self, config: &KeyerConfig) -> Result<Tensor<f32>, KeyerError> {
        let side = config.heatmap_size();
        let plane = side * side;
        let per_region = self.heatmaps.first().map_or(config.num_keypoints() * plane, Vec::len);
        if per_region == 0 || per_region % plane != 0 {
            return Err(KeyerError::Shape {
                expected: format!("a multiple of {side}x{side} values per region"),
                got: format!("{per_region} values"),
            });
        }

        let mut data = Vec::with_capacity(self.heatmaps.len() * per_region);
        for (i, heatmap) in self.heatmaps.iter().enumerate() {
            if heatmap.len() != per_region {
                return Err(KeyerError::Shape {
                    expected: format!("{per_region} values for region {i}"),
                    got: format!("{} values", heatmap.len()),
                });
            }
            data.extend_from_slice(heatmap);
        }
        Ok(Tensor::new(
            vec![self.heatmaps.len(), per_region / plane, side, side],
            data,
        )?)
    }

    fn detections(&self) -> Detections {
        let [w, h] = self.image_size;
        let detections = Detections::new(self.regions(), (w, h));
        match &self.labels {
            Some(labels) => detections.with_field(LABELS_FIELD, Field::Labels(labels.clone())),
            None => detections,
        }
    }
}

/// Decode every region of the request into image-space keypoints.
pub fn decode(request: &DecodeRequest, config: &KeyerConfig) -> Result<DecodeResponse, KeyerError> {
    if !config.enable_postprocess() {
        return Err(KeyerError::InvalidConfig(
            "enable_postprocess is off, nothing to decode".to_string(),
        ));
    }
    if request.heatmaps.len() != request.boxes.len() {
        return Err(KeyerError::CountMismatch {
            heatmaps: request.heatmaps.len(),
            regions: request.boxes.len(),
        });
    }

    let processor = KeypointPostProcessor::from_config(config);
    let logits = request.logits(config)?;
    let processed = processor.process(&logits, &[request.detections()])?;

    let records = processed
        .first()
        .and_then(Detections::keypoints)
        .ok_or_else(|| KeyerError::Internal("post-processor attached no keypoints".to_string()))?;

    info!("decoded {} regions", records.len());
    Ok(DecodeResponse {
        image_size: request.image_size,
        regions: request
            .boxes
            .iter()
            .zip(records)
            .map(|(bbox, record)| RegionKeypoints {
                bbox: *bbox,
                keypoints: record.keypoints.clone(),
            })
            .collect(),
    })
}

/// Paste every channel of every region into the image as a grayscale
/// intensity map and save it as `region{r}_kp{c}.png` under `dir`.
///
/// Class-specific heatmaps are pasted from the block picked by the label.
pub fn write_masks(
    request: &DecodeRequest,
    config: &KeyerConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, KeyerError> {
    std::fs::create_dir_all(dir)?;

    let [im_w, im_h] = request.image_size;
    let processor = KeypointPostProcessor::new(None, config.num_keypoints());
    let logits = request.logits(config)?;
    let processed = processor.process(&logits, &[request.detections()])?;
    let stacks = match processed.first().and_then(|d| d.field(HEATMAPS_FIELD)) {
        Some(Field::Heatmaps(stacks)) => stacks,
        _ => {
            return Err(KeyerError::Internal(
                "post-processor attached no heatmaps".to_string(),
            ));
        }
    };

    let mut written = Vec::new();
    for (r, (stack, region)) in stacks.iter().zip(request.regions()).enumerate() {
        let (channels, h, w) = stack.dims3()?;
        for c in 0..channels {
            let plane = Tensor::new(vec![h, w], stack.slice(c)?.to_vec())?;
            // A negative threshold keeps the continuous intensities
            let pasted = paste_ke_in_image(&plane, &region, im_h, im_w, -1.0, config.padding())?;
            let bytes = match pasted {
                PastedMask::Intensity(bytes) => bytes,
                PastedMask::Binary(mask) => mask.map(|&on| if on { 255 } else { 0 }),
            };

            let image = crates_image::GrayImage::from_raw(im_w as u32, im_h as u32, bytes.data)
                .ok_or_else(|| KeyerError::Encode("pasted map does not fit the image".to_string()))?;
            let path = dir.join(format!("region{r}_kp{c}.png"));
            image
                .save(&path)
                .map_err(|e| KeyerError::Encode(format!("{}: {e}", path.display())))?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
    }
    Ok(written)
}
