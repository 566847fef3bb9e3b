use foundation::math::Viewport;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{SizeRange, unit};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub alpha: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub radius: SizeRange,
    pub alpha: SizeRange,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 60,
            radius: SizeRange::new(0.3, 1.8),
            alpha: SizeRange::new(0.2, 1.0),
        }
    }
}

/// Uniform star scatter over the viewport. No spacing constraints.
pub fn scatter_stars<R: Rng + ?Sized>(
    config: &StarConfig,
    viewport: Viewport,
    rng: &mut R,
) -> Vec<Star> {
    if !viewport.is_drawable() {
        return Vec::new();
    }
    (0..config.count)
        .map(|_| Star {
            x: unit(rng) * viewport.width,
            y: unit(rng) * viewport.height,
            radius: config.radius.sample(rng),
            alpha: config.alpha.sample(rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{StarConfig, scatter_stars};
    use foundation::math::Viewport;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn stars_fill_the_viewport_within_ranges() {
        let config = StarConfig::default();
        let vp = Viewport::new(640.0, 480.0);
        let stars = scatter_stars(&config, vp, &mut StdRng::seed_from_u64(5));
        assert_eq!(stars.len(), 60);
        for s in &stars {
            assert!((0.0..640.0).contains(&s.x) && (0.0..480.0).contains(&s.y));
            assert!(config.radius.contains(s.radius));
            assert!(config.alpha.contains(s.alpha));
        }
    }

    #[test]
    fn empty_viewport_has_no_stars() {
        let stars = scatter_stars(
            &StarConfig::default(),
            Viewport::new(-1.0, 480.0),
            &mut StdRng::seed_from_u64(5),
        );
        assert!(stars.is_empty());
    }
}
