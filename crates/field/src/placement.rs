use std::f64::consts::PI;

use foundation::math::Viewport;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ExclusionZone, FieldConfig, unit};

/// Score given to the first feature, when there is nothing to be far from.
const EMPTY_FIELD_SCORE: f64 = 1e9;

/// One decorative feature (a radio galaxy glyph) in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorFeature {
    pub x: f64,
    pub y: f64,
    /// Orientation in radians, `[0, π)`.
    pub angle: f64,
    pub scale: f64,
    /// Unscaled visual extent in pixels.
    pub extent: f64,
    pub brightness: f64,
    /// Clearance kept from exclusion zones.
    pub pad: f64,
}

impl DecorFeature {
    fn random<R: Rng + ?Sized>(x: f64, y: f64, config: &FieldConfig, rng: &mut R) -> Self {
        let scale = config.size_range.sample(rng);
        let extent = config.extent_range.sample(rng);
        Self {
            x,
            y,
            angle: unit(rng) * PI,
            scale,
            extent,
            brightness: config.brightness_range.sample(rng),
            pad: extent * scale * config.padding_multiplier,
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Result of a generation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureField {
    pub features: Vec<DecorFeature>,
    /// Slots that found no admissible position.
    pub shortfall: usize,
}

fn excluded(zones: &[ExclusionZone], f: &DecorFeature) -> bool {
    zones.iter().any(|z| z.excludes(f.x, f.y, f.pad))
}

fn min_distance(placed: &[DecorFeature], f: &DecorFeature) -> f64 {
    placed
        .iter()
        .map(|p| p.distance_to(f.x, f.y))
        .fold(f64::INFINITY, f64::min)
}

/// Best-candidate placement.
///
/// Anchors are placed first, unconditionally. Each of the `target_count`
/// slots then draws `candidates_per_slot` random candidates, discards those
/// intersecting an exclusion zone, and keeps the one farthest from everything
/// already placed. A slot with no admissible candidate retries pure random
/// positions up to `fallback_retries` times and is otherwise left empty.
pub fn generate_field<R: Rng + ?Sized>(
    config: &FieldConfig,
    viewport: Viewport,
    zones: &[ExclusionZone],
    rng: &mut R,
) -> FeatureField {
    if !viewport.is_drawable() {
        return FeatureField {
            features: Vec::new(),
            shortfall: config.target_count,
        };
    }

    let mut features: Vec<DecorFeature> = config
        .anchors
        .iter()
        .map(|a| {
            let p = viewport.at_fraction(a.x, a.y);
            DecorFeature::random(p.x, p.y, config, rng)
        })
        .collect();

    let candidate = |rng: &mut R| {
        let x = unit(rng) * viewport.width;
        let y = unit(rng) * viewport.height;
        DecorFeature::random(x, y, config, rng)
    };

    let mut shortfall = 0;
    for _ in 0..config.target_count {
        let mut best: Option<DecorFeature> = None;
        let mut best_score = f64::NEG_INFINITY;

        for _ in 0..config.candidates_per_slot {
            let cand = candidate(rng);
            if excluded(zones, &cand) {
                continue;
            }
            let score = if features.is_empty() {
                EMPTY_FIELD_SCORE
            } else {
                min_distance(&features, &cand)
            };
            if score > best_score {
                best_score = score;
                best = Some(cand);
            }
        }

        if best.is_none() {
            for _ in 0..config.fallback_retries {
                let cand = candidate(rng);
                if !excluded(zones, &cand) {
                    best = Some(cand);
                    break;
                }
            }
        }

        match best {
            Some(f) => features.push(f),
            None => shortfall += 1,
        }
    }

    if shortfall > 0 {
        debug!(
            shortfall,
            placed = features.len(),
            "decorative field placement fell short"
        );
    }

    FeatureField {
        features,
        shortfall,
    }
}

#[cfg(test)]
mod tests {
    use super::generate_field;
    use crate::config::{Anchor, ExclusionZone, FieldConfig};
    use foundation::math::Viewport;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    #[test]
    fn placed_features_clear_every_exclusion_zone() {
        let config = FieldConfig {
            target_count: 25,
            ..FieldConfig::default()
        };
        let zones = config.zones_for(viewport());
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let field = generate_field(&config, viewport(), &zones, &mut rng);
            assert_eq!(field.features.len() + field.shortfall, 25);
            for f in &field.features {
                for z in &zones {
                    let d = (f.x - z.cx).hypot(f.y - z.cy);
                    assert!(d >= z.radius + f.pad, "seed {seed}: {f:?} intersects {z:?}");
                }
            }
        }
    }

    #[test]
    fn same_seed_same_field() {
        let config = FieldConfig::default();
        let zones = config.zones_for(viewport());
        let a = generate_field(&config, viewport(), &zones, &mut StdRng::seed_from_u64(3));
        let b = generate_field(&config, viewport(), &zones, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn fully_excluded_viewport_is_a_shortfall_not_an_error() {
        let config = FieldConfig {
            target_count: 4,
            candidates_per_slot: 5,
            fallback_retries: 20,
            ..FieldConfig::default()
        };
        let zones = [ExclusionZone::new(400.0, 300.0, 10_000.0)];
        let field = generate_field(&config, viewport(), &zones, &mut StdRng::seed_from_u64(1));
        assert!(field.features.is_empty());
        assert_eq!(field.shortfall, 4);
    }

    #[test]
    fn anchors_come_first_and_ignore_zones() {
        let config = FieldConfig {
            target_count: 2,
            anchors: vec![Anchor { x: 0.5, y: 0.5 }],
            ..FieldConfig::default()
        };
        let zones = [ExclusionZone::new(400.0, 300.0, 50.0)];
        let field = generate_field(&config, viewport(), &zones, &mut StdRng::seed_from_u64(9));
        assert_eq!((field.features[0].x, field.features[0].y), (400.0, 300.0));
        assert_eq!(field.features.len(), 3);
    }

    #[test]
    fn candidates_spread_out() {
        let config = FieldConfig {
            target_count: 2,
            exclusion_zones: Vec::new(),
            ..FieldConfig::default()
        };
        let field = generate_field(&config, viewport(), &[], &mut StdRng::seed_from_u64(11));
        let (a, b) = (field.features[0], field.features[1]);
        // Best of 50 uniform candidates lands well away from the first.
        assert!(a.distance_to(b.x, b.y) > 200.0);
    }

    #[test]
    fn degenerate_viewport_places_nothing() {
        let config = FieldConfig::default();
        let field = generate_field(
            &config,
            Viewport::new(0.0, 0.0),
            &[],
            &mut StdRng::seed_from_u64(0),
        );
        assert!(field.features.is_empty());
        assert_eq!(field.shortfall, config.target_count);
    }
}
