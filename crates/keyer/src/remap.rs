use crate::peak::Peak;
use crate::resample::RegionTarget;
use keyer_base::Vec2;

/// Map a discrete resampled-grid position to continuous image coordinates.
///
/// Pixel `(x_int, y_int)` covers `[x_int, x_int + 1)`, so its centre sits at
/// `x_int + 0.5` before scaling back to the region extent and shifting by the
/// region origin.
pub fn remap(x_int: usize, y_int: usize, target: &RegionTarget, offset: Vec2<f32>) -> Vec2<f32> {
    Vec2::new(
        (x_int as f32 + 0.5) * target.width_correction + offset.x,
        (y_int as f32 + 0.5) * target.height_correction + offset.y,
    )
}

pub fn remap_peak(peak: &Peak, target: &RegionTarget, offset: Vec2<f32>) -> Vec2<f32> {
    remap(peak.x_int, peak.y_int, target, offset)
}
