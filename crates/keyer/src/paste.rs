use crate::resample::resize_bilinear;
use crate::types::PastedMask;
use crate::KeyerError;
use keyer_base::{Rect, Tensor};
use log::trace;

/// Zero-pad a square `[M, M]` heatmap by `padding` on every side.
///
/// Returns the padded `[M + 2p, M + 2p]` map and the factor `(M + 2p) / M`
/// by which the matching box has to grow.
pub fn expand_kes(heatmap: &Tensor<f32>, padding: usize) -> Result<(Tensor<f32>, f32), KeyerError> {
    let m = square_side(heatmap)?;
    let side = m + 2 * padding;
    let scale = side as f32 / m as f32;

    let mut padded = Tensor::<f32>::zeros(vec![side, side])?;
    for (y, row) in heatmap.data.chunks_exact(m).enumerate() {
        let start = (y + padding) * side + padding;
        padded.data[start..start + m].copy_from_slice(row);
    }
    Ok((padded, scale))
}

/// Scale every box about its centre by `scale`.
pub fn expand_boxes(boxes: &[Rect<f32>], scale: f32) -> Vec<Rect<f32>> {
    boxes.iter().map(|b| b.scale_about_center(scale)).collect()
}

fn square_side(heatmap: &Tensor<f32>) -> Result<usize, KeyerError> {
    let (h, w) = heatmap.dims2()?;
    if h != w || h == 0 {
        return Err(KeyerError::Shape {
            expected: "non-empty square [M, M] heatmap".to_string(),
            got: format!("{:?}", heatmap.shape),
        });
    }
    Ok(h)
}

/// Integer pixel box; `x1`/`y1` are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelBox {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl PixelBox {
    /// Truncate toward zero, as an integer cast of the coordinates does.
    fn truncate(rect: &Rect<f32>) -> Self {
        let [x0, y0, x1, y1] = rect.to_xyxy();
        Self {
            x0: x0 as i64,
            y0: y0 as i64,
            x1: x1 as i64,
            y1: y1 as i64,
        }
    }

    fn width(&self) -> usize {
        (self.x1 - self.x0 + 1).max(1) as usize
    }

    fn height(&self) -> usize {
        (self.y1 - self.y0 + 1).max(1) as usize
    }
}

/// Copy `src` (a `[box.height(), box.width()]` plane) into a zeroed
/// `[im_h, im_w]` canvas at the box position, dropping everything outside the
/// image.
fn place<T: Copy + Default>(
    src: &[T],
    pixel_box: &PixelBox,
    im_h: usize,
    im_w: usize,
) -> Result<Tensor<T>, KeyerError> {
    let mut canvas = Tensor::<T>::zeros(vec![im_h, im_w])?;
    let src_w = pixel_box.width();

    let x_start = pixel_box.x0.max(0);
    let x_end = (pixel_box.x1 + 1).min(im_w as i64);
    let y_start = pixel_box.y0.max(0);
    let y_end = (pixel_box.y1 + 1).min(im_h as i64);
    if x_start >= x_end || y_start >= y_end {
        return Ok(canvas);
    }

    let span = (x_end - x_start) as usize;
    let src_x = (x_start - pixel_box.x0) as usize;
    for y in y_start..y_end {
        let src_y = (y - pixel_box.y0) as usize;
        let from = src_y * src_w + src_x;
        let to = y as usize * im_w + x_start as usize;
        canvas.data[to..to + span].copy_from_slice(&src[from..from + span]);
    }
    Ok(canvas)
}

/// Paste one `[M, M]` keypoint heatmap into an `[im_h, im_w]` image.
///
/// The heatmap is zero-padded by `padding`, the box grown by the same
/// ratio, and the padded map resized bilinearly onto the grown box. With
/// `threshold >= 0` the result is `value > threshold`; a negative threshold
/// yields `value * 255` as bytes instead.
pub fn paste_ke_in_image(
    heatmap: &Tensor<f32>,
    bbox: &Rect<f32>,
    im_h: usize,
    im_w: usize,
    threshold: f32,
    padding: usize,
) -> Result<PastedMask, KeyerError> {
    let (padded, scale) = expand_kes(heatmap, padding)?;
    let expanded = bbox.scale_about_center(scale);
    let pixel_box = PixelBox::truncate(&expanded);

    let resized = resize_bilinear(&padded, pixel_box.height(), pixel_box.width())?;
    trace!(
        "pasting {:?} as {}x{} into {}x{}",
        pixel_box,
        pixel_box.width(),
        pixel_box.height(),
        im_w,
        im_h
    );

    if threshold >= 0.0 {
        let mask: Vec<bool> = resized.data.iter().map(|&v| v > threshold).collect();
        Ok(PastedMask::Binary(place(&mask, &pixel_box, im_h, im_w)?))
    } else {
        // Float-to-int casts saturate, so out-of-range values pin to 0 or 255.
        let bytes: Vec<u8> = resized.data.iter().map(|&v| (v * 255.0) as u8).collect();
        Ok(PastedMask::Intensity(place(&bytes, &pixel_box, im_h, im_w)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_box_truncates_toward_zero() {
        let b = PixelBox::truncate(&Rect::from_xyxy([-2.7, 1.5, 5.5, 3.5]));
        assert_eq!(b, PixelBox { x0: -2, y0: 1, x1: 5, y1: 3 });
        assert_eq!(b.width(), 8);
        assert_eq!(b.height(), 3);
    }

    #[test]
    fn test_pixel_box_inverted_has_unit_size() {
        let b = PixelBox { x0: 4, y0: 4, x1: 2, y1: 2 };
        assert_eq!((b.width(), b.height()), (1, 1));
    }

    #[test]
    fn test_place_clips_with_consistent_offset() {
        // 3x3 source numbered 1..=9 placed at (-1, -1) in a 2x2 image
        let src: Vec<u8> = (1..=9).collect();
        let b = PixelBox { x0: -1, y0: -1, x1: 1, y1: 1 };
        let out = place(&src, &b, 2, 2).unwrap();
        assert_eq!(out.data, vec![5, 6, 8, 9]);
    }

    #[test]
    fn test_place_fully_outside_is_empty() {
        let src = vec![1u8; 4];
        let b = PixelBox { x0: 10, y0: 10, x1: 11, y1: 11 };
        let out = place(&src, &b, 4, 4).unwrap();
        assert!(out.data.iter().all(|&v| v == 0));
    }
}
