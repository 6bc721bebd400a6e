pub mod config;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod normalize;
pub mod paste;
pub mod peak;
pub mod postprocess;
pub mod remap;
pub mod resample;
pub mod types;

pub use config::KeyerConfig;
pub use decoder::HeatmapDecoder;
pub use encode::{encode_keypoint_masks, EncodedMask, MaskEncoder};
pub use error::KeyerError;
pub use normalize::scores_to_probs;
pub use paste::{expand_boxes, expand_kes, paste_ke_in_image};
pub use peak::{extract_peak, Peak};
pub use postprocess::{Detections, Field, KeypointPostProcessor};
pub use remap::remap;
pub use resample::{resize_bicubic, resize_bilinear, RegionTarget};
pub use types::{DecodedKeypoint, KeypointChannel, KeypointRecord, PastedMask};
