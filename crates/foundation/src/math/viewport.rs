use serde::{Deserialize, Serialize};

use super::Vec2;

/// Drawable area in CSS/logical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Finite and strictly positive in both dimensions.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Point at the given fractions of width and height.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Vec2 {
        Vec2::new(self.width * fx, self.height * fy)
    }

    /// Size rounded down to 100 px buckets; used to key cached layouts.
    pub fn size_bucket(&self) -> (i64, i64) {
        (
            (self.width / 100.0).floor() as i64,
            (self.height / 100.0).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Viewport;
    use crate::math::Vec2;

    #[test]
    fn buckets_floor_to_hundreds() {
        assert_eq!(Viewport::new(1599.0, 1200.0).size_bucket(), (15, 12));
        assert_eq!(Viewport::new(99.0, 0.0).size_bucket(), (0, 0));
    }

    #[test]
    fn drawable_rejects_degenerate_sizes() {
        assert!(Viewport::new(800.0, 600.0).is_drawable());
        assert!(!Viewport::new(0.0, 600.0).is_drawable());
        assert!(!Viewport::new(f64::NAN, 600.0).is_drawable());
    }

    #[test]
    fn fractions_scale_each_axis() {
        let v = Viewport::new(800.0, 600.0);
        assert_eq!(v.at_fraction(0.5, 0.6), Vec2::new(400.0, 360.0));
        assert_eq!(v.min_side(), 600.0);
    }
}
