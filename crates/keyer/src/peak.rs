use crate::KeyerError;

/// Peak of one resampled channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub x_int: usize,
    pub y_int: usize,
    pub score: f32,
    pub probability: f32,
}

/// Flat index of the first maximum, ignoring NaN values.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if v <= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Locate the peak of one `[H, W]` channel.
///
/// `scores` and `probs` are the same channel before and after softmax. The
/// probability read at the score peak must be the channel's maximum
/// probability; anything else means normalization and extraction disagree.
pub fn extract_peak(scores: &[f32], probs: &[f32], width: usize) -> Result<Peak, KeyerError> {
    if width == 0 || scores.len() != probs.len() || scores.len() % width != 0 {
        return Err(KeyerError::Shape {
            expected: format!("matching score/probability planes of width {width}"),
            got: format!("{} scores, {} probabilities", scores.len(), probs.len()),
        });
    }

    let pos = argmax(scores).ok_or_else(|| {
        KeyerError::Internal("channel has no finite score to take a peak from".to_string())
    })?;

    let probability = probs[pos];
    let max_probability = probs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if probability != max_probability {
        return Err(KeyerError::Internal(format!(
            "peak probability {probability} at {pos} differs from channel maximum {max_probability}"
        )));
    }

    Ok(Peak {
        x_int: pos % width,
        y_int: pos / width,
        score: scores[pos],
        probability,
    })
}
