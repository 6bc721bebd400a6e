use crate::paste::paste_ke_in_image;
use crate::types::PastedMask;
use crate::{KeyerConfig, KeyerError};
use keyer_base::{Rect, Tensor};
use serde::{Deserialize, Serialize};

/// Compact mask in COCO style: run-length `counts` and `[height, width]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMask {
    pub counts: String,
    pub size: [usize; 2],
}

/// Converts a pasted binary mask into its compact encoding.
///
/// The encoding itself lives outside this crate; implementors wrap whatever
/// run-length encoder the export path uses.
pub trait MaskEncoder {
    fn encode(&self, mask: &Tensor<bool>) -> Result<EncodedMask, KeyerError>;
}

/// Paste every keypoint channel of every region into the image and encode
/// each binary mask.
///
/// `image_size` is `(width, height)`. The result holds one `Vec` per region,
/// in channel order. The configured threshold must be non-negative, since
/// intensity maps have no binary encoding.
pub fn encode_keypoint_masks(
    encoder: &dyn MaskEncoder,
    heatmaps: &[Tensor<f32>],
    regions: &[Rect<f32>],
    image_size: (usize, usize),
    config: &KeyerConfig,
) -> Result<Vec<Vec<EncodedMask>>, KeyerError> {
    if heatmaps.len() != regions.len() {
        return Err(KeyerError::CountMismatch {
            heatmaps: heatmaps.len(),
            regions: regions.len(),
        });
    }
    if config.threshold() < 0.0 {
        return Err(KeyerError::Encode(format!(
            "mask encoding needs a non-negative threshold, got {}",
            config.threshold()
        )));
    }

    let (im_w, im_h) = image_size;
    heatmaps
        .iter()
        .zip(regions)
        .map(|(stack, region)| -> Result<Vec<EncodedMask>, KeyerError> {
            let (channels, h, w) = stack.dims3()?;
            (0..channels)
                .map(|channel| -> Result<EncodedMask, KeyerError> {
                    let plane = Tensor::new(vec![h, w], stack.slice(channel)?.to_vec())?;
                    match paste_ke_in_image(
                        &plane,
                        region,
                        im_h,
                        im_w,
                        config.threshold(),
                        config.padding(),
                    )? {
                        PastedMask::Binary(mask) => encoder.encode(&mask),
                        PastedMask::Intensity(_) => Err(KeyerError::Internal(
                            "non-negative threshold produced an intensity map".to_string(),
                        )),
                    }
                })
                .collect()
        })
        .collect()
}
