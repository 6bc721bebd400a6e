use crate::Vec2;

/// Axis-aligned rectangle stored as origin and size.
///
/// Detection boxes arrive as `(x0, y0, x1, y1)`; use [`Rect::from_xyxy`] and
/// [`Rect::to_xyxy`] at that boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn min(&self) -> Vec2<T> {
        self.origin
    }

    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }

    pub fn to_xyxy(&self) -> [T; 4] {
        let max = self.max();
        [self.origin.x, self.origin.y, max.x, max.y]
    }
}

impl<T: std::ops::Sub<Output = T> + Copy> Rect<T> {
    pub fn from_min_max(min: Vec2<T>, max: Vec2<T>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }

    pub fn from_xyxy([x0, y0, x1, y1]: [T; 4]) -> Self {
        Self::from_min_max(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }
}

impl Rect<f32> {
    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2<f32> {
        self.origin + self.size * 0.5
    }

    /// Grow (or shrink) the rectangle about its centre by `scale`.
    pub fn scale_about_center(&self, scale: f32) -> Self {
        let half = self.size * (0.5 * scale);
        let center = self.center();
        Self::from_min_max(center - half, center + half)
    }
}
