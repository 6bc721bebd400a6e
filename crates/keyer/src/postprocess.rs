use crate::decoder::HeatmapDecoder;
use crate::types::KeypointRecord;
use crate::{KeyerConfig, KeyerError};
use keyer_base::{Rect, Tensor};
use log::debug;
use std::collections::BTreeMap;

/// Field holding per-region class labels.
pub const LABELS_FIELD: &str = "labels";
/// Field the decoded keypoint records are attached under.
pub const KEYPOINTS_FIELD: &str = "kes";
/// Field the raw heatmap slices are attached under when decoding is off.
pub const HEATMAPS_FIELD: &str = "ke_heatmaps";

/// A named per-region array carried on a detection record.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scores(Vec<f32>),
    Labels(Vec<usize>),
    Heatmaps(Vec<Tensor<f32>>),
    Keypoints(Vec<KeypointRecord>),
}

impl Field {
    pub fn len(&self) -> usize {
        match self {
            Field::Scores(v) => v.len(),
            Field::Labels(v) => v.len(),
            Field::Heatmaps(v) => v.len(),
            Field::Keypoints(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detections of one image: boxes, image size and named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Detections {
    boxes: Vec<Rect<f32>>,
    /// `(width, height)` in pixels.
    image_size: (usize, usize),
    fields: BTreeMap<String, Field>,
}

impl Detections {
    pub fn new(boxes: Vec<Rect<f32>>, image_size: (usize, usize)) -> Self {
        Self {
            boxes,
            image_size,
            fields: BTreeMap::new(),
        }
    }

    /// Add a field (builder pattern).
    pub fn with_field(mut self, name: &str, field: Field) -> Self {
        self.add_field(name, field);
        self
    }

    pub fn add_field(&mut self, name: &str, field: Field) {
        self.fields.insert(name.to_string(), field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn boxes(&self) -> &[Rect<f32>] {
        &self.boxes
    }

    pub fn image_size(&self) -> (usize, usize) {
        self.image_size
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Decoded keypoints, once a post-processor has attached them.
    pub fn keypoints(&self) -> Option<&[KeypointRecord]> {
        match self.fields.get(KEYPOINTS_FIELD) {
            Some(Field::Keypoints(records)) => Some(records.as_slice()),
            _ => None,
        }
    }

    fn labels(&self) -> Result<&[usize], KeyerError> {
        match self.fields.get(LABELS_FIELD) {
            Some(Field::Labels(labels)) if labels.len() == self.boxes.len() => Ok(labels.as_slice()),
            Some(Field::Labels(labels)) => Err(KeyerError::Shape {
                expected: format!("{} labels", self.boxes.len()),
                got: format!("{} labels", labels.len()),
            }),
            _ => Err(KeyerError::MissingField(LABELS_FIELD.to_string())),
        }
    }
}

/// Slices network output per region and attaches keypoints to detections.
///
/// With a decoder present the heatmaps are decoded into [`KeypointRecord`]s
/// under [`KEYPOINTS_FIELD`]; without one the per-region slices are attached
/// unchanged under [`HEATMAPS_FIELD`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointPostProcessor {
    keyer: Option<HeatmapDecoder>,
    num_keypoints: usize,
}

impl KeypointPostProcessor {
    pub fn new(keyer: Option<HeatmapDecoder>, num_keypoints: usize) -> Self {
        Self {
            keyer,
            num_keypoints,
        }
    }

    pub fn from_config(config: &KeyerConfig) -> Self {
        let keyer = config
            .enable_postprocess()
            .then(|| HeatmapDecoder::from_config(config));
        Self::new(keyer, config.num_keypoints())
    }

    pub fn keyer(&self) -> Option<&HeatmapDecoder> {
        self.keyer.as_ref()
    }

    /// `logits` is `[R, C, H, W]` for all regions of all images in order,
    /// where `C` is either the keypoint count (class-agnostic) or
    /// `classes * keypoints`, in which case each region's `labels` entry picks
    /// its block of channels.
    pub fn process(
        &self,
        logits: &Tensor<f32>,
        detections: &[Detections],
    ) -> Result<Vec<Detections>, KeyerError> {
        let (regions, channels, h, w) = logits.dims4()?;
        let total: usize = detections.iter().map(Detections::len).sum();
        if regions != total {
            return Err(KeyerError::CountMismatch {
                heatmaps: regions,
                regions: total,
            });
        }
        let k = self.num_keypoints;
        if k == 0 || channels % k != 0 {
            return Err(KeyerError::ChannelMismatch {
                expected: k,
                got: channels,
            });
        }
        let class_agnostic = channels == k;
        let num_classes = channels / k;

        debug!(
            "post-processing {} regions over {} images ({} class blocks)",
            regions,
            detections.len(),
            num_classes
        );

        let mut region = 0;
        let mut out = Vec::with_capacity(detections.len());
        for image in detections {
            let labels = if class_agnostic {
                None
            } else {
                Some(image.labels()?)
            };

            let mut stacks = Vec::with_capacity(image.len());
            for i in 0..image.len() {
                let block = match labels {
                    None => 0,
                    Some(labels) if labels[i] < num_classes => labels[i],
                    Some(labels) => {
                        return Err(KeyerError::Shape {
                            expected: format!("label below {num_classes}"),
                            got: format!("label {}", labels[i]),
                        });
                    }
                };
                let region_data = logits.slice(region + i)?;
                let start = block * k * h * w;
                let data = region_data[start..start + k * h * w].to_vec();
                stacks.push(Tensor::new(vec![k, h, w], data)?);
            }
            region += image.len();

            let (name, field) = match &self.keyer {
                Some(keyer) => (
                    KEYPOINTS_FIELD,
                    Field::Keypoints(keyer.decode(&stacks, image.boxes())?),
                ),
                None => (HEATMAPS_FIELD, Field::Heatmaps(stacks)),
            };
            out.push(image.clone().with_field(name, field));
        }
        Ok(out)
    }
}
