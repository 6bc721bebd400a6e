use crate::KeyerError;
use keyer_base::{Rect, Tensor};

/// Keys cubic convolution parameter.
const CUBIC_A: f32 = -0.75;

/// Integer resampling target for one region, plus the factors that map the
/// resampled grid back onto the region's real extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTarget {
    pub width: usize,
    pub height: usize,
    /// Region width (floored at 1) divided by `width`.
    pub width_correction: f32,
    /// Region height (floored at 1) divided by `height`.
    pub height_correction: f32,
}

impl RegionTarget {
    /// Extents below one pixel clamp to 1; each side is then rounded up and,
    /// when `min_size > 0`, raised to at least `min_size`.
    pub fn for_region(region: &Rect<f32>, min_size: usize) -> Self {
        let extent_w = region.width().max(1.0);
        let extent_h = region.height().max(1.0);

        let mut width = extent_w.ceil() as usize;
        let mut height = extent_h.ceil() as usize;
        if min_size > 0 {
            width = width.max(min_size);
            height = height.max(min_size);
        }

        Self {
            width,
            height,
            width_correction: extent_w / width as f32,
            height_correction: extent_h / height as f32,
        }
    }
}

/// Source taps and weights for one output sample along one axis.
#[derive(Debug, Clone, Copy)]
struct Tap<const N: usize> {
    index: [usize; N],
    weight: [f32; N],
}

fn cubic_weights(t: f32) -> [f32; 4] {
    let a = CUBIC_A;
    let w0 = ((a * (t + 1.0) - 5.0 * a) * (t + 1.0) + 8.0 * a) * (t + 1.0) - 4.0 * a;
    let w1 = ((a + 2.0) * t - (a + 3.0)) * t * t + 1.0;
    let w2 = ((a + 2.0) * (1.0 - t) - (a + 3.0)) * (1.0 - t) * (1.0 - t) + 1.0;
    [w0, w1, w2, 1.0 - w0 - w1 - w2]
}

/// Half-pixel-centre cubic taps with a replicated border.
fn cubic_taps(in_len: usize, out_len: usize) -> Vec<Tap<4>> {
    let scale = in_len as f32 / out_len as f32;
    let last = in_len as isize - 1;
    (0..out_len)
        .map(|dst| {
            let src = (dst as f32 + 0.5) * scale - 0.5;
            let base = src.floor();
            let t = src - base;
            let base = base as isize;
            let mut index = [0usize; 4];
            for (k, slot) in index.iter_mut().enumerate() {
                *slot = (base - 1 + k as isize).clamp(0, last) as usize;
            }
            Tap {
                index,
                weight: cubic_weights(t),
            }
        })
        .collect()
}

/// Half-pixel-centre linear taps; sources left of the first centre snap to it.
fn linear_taps(in_len: usize, out_len: usize) -> Vec<Tap<2>> {
    let scale = in_len as f32 / out_len as f32;
    (0..out_len)
        .map(|dst| {
            let src = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (src.floor() as usize).min(in_len - 1);
            let i1 = if i0 + 1 < in_len { i0 + 1 } else { i0 };
            let frac = src - i0 as f32;
            Tap {
                index: [i0, i1],
                weight: [1.0 - frac, frac],
            }
        })
        .collect()
}

/// Separable resize of one row-major plane.
fn resize_plane<const N: usize>(
    plane: &[f32],
    in_w: usize,
    in_h: usize,
    x_taps: &[Tap<N>],
    y_taps: &[Tap<N>],
) -> Vec<f32> {
    let out_w = x_taps.len();

    // Horizontal pass: [in_h, out_w]
    let mut rows = Vec::with_capacity(in_h * out_w);
    for y in 0..in_h {
        let row = &plane[y * in_w..(y + 1) * in_w];
        rows.extend(x_taps.iter().map(|tap| {
            tap.index
                .iter()
                .zip(tap.weight.iter())
                .map(|(&i, &w)| row[i] * w)
                .sum::<f32>()
        }));
    }

    // Vertical pass: [out_h, out_w]
    let mut out = Vec::with_capacity(y_taps.len() * out_w);
    for tap in y_taps {
        for x in 0..out_w {
            out.push(
                tap.index
                    .iter()
                    .zip(tap.weight.iter())
                    .map(|(&i, &w)| rows[i * out_w + x] * w)
                    .sum::<f32>(),
            );
        }
    }
    out
}

fn check_resize(
    in_h: usize,
    in_w: usize,
    out_h: usize,
    out_w: usize,
) -> Result<(), KeyerError> {
    if in_h == 0 || in_w == 0 || out_h == 0 || out_w == 0 {
        return Err(KeyerError::Shape {
            expected: "non-empty source and target sizes".to_string(),
            got: format!("{in_h}x{in_w} -> {out_h}x{out_w}"),
        });
    }
    Ok(())
}

/// Bicubic resize of every channel of a `[C, H, W]` stack to
/// `[C, out_h, out_w]`.
pub fn resize_bicubic(
    stack: &Tensor<f32>,
    out_h: usize,
    out_w: usize,
) -> Result<Tensor<f32>, KeyerError> {
    let (c, in_h, in_w) = stack.dims3()?;
    check_resize(in_h, in_w, out_h, out_w)?;

    let x_taps = cubic_taps(in_w, out_w);
    let y_taps = cubic_taps(in_h, out_h);
    let mut data = Vec::with_capacity(c * out_h * out_w);
    for channel in 0..c {
        data.extend(resize_plane(
            stack.slice(channel)?,
            in_w,
            in_h,
            &x_taps,
            &y_taps,
        ));
    }
    Ok(Tensor::new(vec![c, out_h, out_w], data)?)
}

/// Bilinear resize of a single `[H, W]` plane to `[out_h, out_w]`.
pub fn resize_bilinear(
    plane: &Tensor<f32>,
    out_h: usize,
    out_w: usize,
) -> Result<Tensor<f32>, KeyerError> {
    let (in_h, in_w) = plane.dims2()?;
    check_resize(in_h, in_w, out_h, out_w)?;

    let x_taps = linear_taps(in_w, out_w);
    let y_taps = linear_taps(in_h, out_h);
    let data = resize_plane(&plane.data, in_w, in_h, &x_taps, &y_taps);
    Ok(Tensor::new(vec![out_h, out_w], data)?)
}

/// Resample a region's heatmap stack to its pixel size.
pub fn resample_region(
    heatmaps: &Tensor<f32>,
    target: &RegionTarget,
) -> Result<Tensor<f32>, KeyerError> {
    resize_bicubic(heatmaps, target.height, target.width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_weights_sum_to_one() {
        for t in [0.0, 0.25, 0.5, 0.75, 0.99] {
            let sum: f32 = cubic_weights(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "t={t} sum={sum}");
        }
    }

    #[test]
    fn test_cubic_weights_at_integer_offset_are_identity() {
        assert_eq!(cubic_weights(0.0), [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cubic_taps_clamp_at_borders() {
        let taps = cubic_taps(4, 8);
        assert_eq!(taps[0].index, [0, 0, 0, 1]);
        assert_eq!(taps[7].index, [2, 3, 3, 3]);
    }

    #[test]
    fn test_linear_taps_snap_left_edge() {
        let taps = linear_taps(2, 4);
        // dst 0 maps to src -0.25, which snaps to 0
        assert_eq!(taps[0].index, [0, 1]);
        assert_eq!(taps[0].weight, [1.0, 0.0]);
        // dst 3 maps to src 1.25, past the last centre
        assert_eq!(taps[3].index, [1, 1]);
    }
}
