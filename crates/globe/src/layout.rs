use foundation::math::{ScreenDisc, Vec2, Viewport};

use crate::config::LayoutConfig;

/// Screen-space quantities derived from the viewport. Rebuilt on every
/// resize; nothing here survives a size change.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneLayout {
    pub viewport: Viewport,
    pub disc: ScreenDisc,
}

impl SceneLayout {
    pub fn new(config: &LayoutConfig, viewport: Viewport) -> Self {
        let center = viewport.at_fraction(config.center_x_frac, config.center_y_frac);
        let radius = viewport.min_side() * config.radius_frac * config.radius_scale;
        Self {
            viewport,
            disc: ScreenDisc::new(center, radius),
        }
    }

    /// Whether a press at `point` lands on the globe.
    pub fn hits_globe(&self, point: Vec2, slack: f64) -> bool {
        self.disc.contains(point, slack)
    }
}

#[cfg(test)]
mod tests {
    use super::SceneLayout;
    use crate::config::LayoutConfig;
    use foundation::math::{Vec2, Viewport};

    #[test]
    fn globe_sits_low_and_centered() {
        let layout = SceneLayout::new(&LayoutConfig::default(), Viewport::new(800.0, 600.0));
        assert_eq!(layout.disc.center, Vec2::new(400.0, 360.0));
        assert!((layout.disc.radius - 216.0).abs() < 1e-9);
    }

    #[test]
    fn hit_circle_has_slack() {
        let layout = SceneLayout::new(&LayoutConfig::default(), Viewport::new(800.0, 600.0));
        let rim = Vec2::new(400.0 + 216.0 * 1.02, 360.0);
        assert!(layout.hits_globe(rim, 1.05));
        assert!(!layout.hits_globe(rim, 1.0));
        assert!(!layout.hits_globe(Vec2::new(10.0, 10.0), 1.05));
    }

    #[test]
    fn resize_rederives_center_and_radius() {
        let cfg = LayoutConfig::default();
        let small = SceneLayout::new(&cfg, Viewport::new(800.0, 600.0));
        let big = SceneLayout::new(&cfg, Viewport::new(1600.0, 1200.0));
        assert_eq!(big.disc.center, Vec2::new(800.0, 720.0));
        assert!((big.disc.radius - small.disc.radius * 2.0).abs() < 1e-9);
    }
}
