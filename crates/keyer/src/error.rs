use keyer_base::TensorError;
use std::fmt;

#[derive(Debug)]
pub enum KeyerError {
    /// Heatmap and region lists of different lengths.
    CountMismatch { heatmaps: usize, regions: usize },
    /// Heatmap stack channel count differs from the configured keypoints.
    ChannelMismatch { expected: usize, got: usize },
    Shape { expected: String, got: String },
    InvalidConfig(String),
    /// A detection record lacks a field the operation needs.
    MissingField(String),
    /// Broken internal contract between normalization and peak extraction.
    Internal(String),
    Tensor(TensorError),
    Io(String),
    Parse(String),
    Encode(String),
}

impl fmt::Display for KeyerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyerError::CountMismatch { heatmaps, regions } => {
                write!(f, "count mismatch: {heatmaps} heatmap stacks for {regions} regions")
            }
            KeyerError::ChannelMismatch { expected, got } => {
                write!(f, "channel mismatch: expected {expected} keypoint channels, got {got}")
            }
            KeyerError::Shape { expected, got } => {
                write!(f, "shape error: expected {expected}, got {got}")
            }
            KeyerError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            KeyerError::MissingField(name) => write!(f, "missing field: {name}"),
            KeyerError::Internal(msg) => write!(f, "internal error: {msg}"),
            KeyerError::Tensor(err) => write!(f, "tensor error: {err}"),
            KeyerError::Io(msg) => write!(f, "io error: {msg}"),
            KeyerError::Parse(msg) => write!(f, "parse error: {msg}"),
            KeyerError::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for KeyerError {}

impl From<TensorError> for KeyerError {
    fn from(err: TensorError) -> Self {
        KeyerError::Tensor(err)
    }
}

impl From<std::io::Error> for KeyerError {
    fn from(err: std::io::Error) -> Self {
        KeyerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KeyerError {
    fn from(err: serde_json::Error) -> Self {
        KeyerError::Parse(err.to_string())
    }
}
