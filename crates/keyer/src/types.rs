use keyer_base::{Tensor, TensorError, Vec2};
use serde::Serialize;

/// Rows of the `[4, K]` keypoint layout.
pub const RECORD_ROWS: usize = 4;

/// Index of a keypoint channel.
///
/// The order matches the network's output channels and is never permuted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeypointChannel(usize);

impl KeypointChannel {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// All channels `0..count` in network order.
    pub fn all(count: usize) -> impl Iterator<Item = KeypointChannel> {
        (0..count).map(KeypointChannel)
    }
}

impl From<KeypointChannel> for usize {
    fn from(channel: KeypointChannel) -> usize {
        channel.0
    }
}

/// One decoded keypoint in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedKeypoint {
    pub x: f32,
    pub y: f32,
    /// Raw heatmap value at the peak after resampling.
    pub score: f32,
    /// Softmax probability at the peak, in [0.0, 1.0].
    pub probability: f32,
}

impl DecodedKeypoint {
    pub fn position(&self) -> Vec2<f32> {
        Vec2::new(self.x, self.y)
    }
}

/// Decoded keypoints of one region, one entry per channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeypointRecord {
    pub keypoints: Vec<DecodedKeypoint>,
}

impl KeypointRecord {
    pub fn num_keypoints(&self) -> usize {
        self.keypoints.len()
    }

    pub fn keypoint(&self, channel: KeypointChannel) -> Option<&DecodedKeypoint> {
        self.keypoints.get(channel.index())
    }

    /// Row-major `[4, K]` tensor: x, y, score, probability.
    pub fn to_tensor(&self) -> Result<Tensor<f32>, TensorError> {
        let k = self.keypoints.len();
        let mut data = Vec::with_capacity(RECORD_ROWS * k);
        data.extend(self.keypoints.iter().map(|kp| kp.x));
        data.extend(self.keypoints.iter().map(|kp| kp.y));
        data.extend(self.keypoints.iter().map(|kp| kp.score));
        data.extend(self.keypoints.iter().map(|kp| kp.probability));
        Tensor::new(vec![RECORD_ROWS, k], data)
    }
}

/// A single channel pasted into full-image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PastedMask {
    /// `value > threshold` for a non-negative threshold.
    Binary(Tensor<bool>),
    /// `value * 255` bytes, produced when the threshold is negative.
    Intensity(Tensor<u8>),
}

impl PastedMask {
    pub fn shape(&self) -> &[usize] {
        match self {
            PastedMask::Binary(t) => &t.shape,
            PastedMask::Intensity(t) => &t.shape,
        }
    }

    pub fn height(&self) -> usize {
        self.shape()[0]
    }

    pub fn width(&self) -> usize {
        self.shape()[1]
    }

    /// Collapse to bytes: 0/1 for binary masks, raw intensity otherwise.
    pub fn to_bytes(&self) -> Tensor<u8> {
        match self {
            PastedMask::Binary(t) => t.map(|&on| on as u8),
            PastedMask::Intensity(t) => t.clone(),
        }
    }
}
