use crate::KeyerError;
use keyer_base::Tensor;

/// Spatial softmax of a single channel.
///
/// The channel maximum is subtracted before exponentiating so large logits
/// do not overflow.
pub fn softmax_channel(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut probs: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }
    probs
}

/// Per-channel spatial softmax of a `[C, H, W]` score stack.
///
/// Every output channel sums to one over its `H * W` positions. Channels do
/// not interact.
pub fn scores_to_probs(scores: &Tensor<f32>) -> Result<Tensor<f32>, KeyerError> {
    let (c, h, w) = scores.dims3()?;
    if h == 0 || w == 0 {
        return Err(KeyerError::Shape {
            expected: "non-empty [C, H, W] score map".to_string(),
            got: format!("{:?}", scores.shape),
        });
    }

    let mut data = Vec::with_capacity(scores.len());
    for channel in 0..c {
        data.extend(softmax_channel(scores.slice(channel)?));
    }
    Ok(Tensor::new(scores.shape.clone(), data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_uniform_channel() {
        let probs = softmax_channel(&[3.0; 4]);
        for p in probs {
            assert!((p - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probs = softmax_channel(&[1000.0, 999.0, -1000.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[0] > probs[1]);
        assert!(probs[2] < 1e-6);
    }

    #[test]
    fn test_empty_spatial_extent_rejected() {
        let scores = Tensor::<f32>::new(vec![2, 0, 3], vec![]).unwrap();
        assert!(matches!(
            scores_to_probs(&scores),
            Err(KeyerError::Shape { .. })
        ));
    }
}
