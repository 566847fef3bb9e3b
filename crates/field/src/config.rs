use foundation::math::Viewport;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed range sampled uniformly. `min > max` is tolerated (sampling then
/// runs "backwards" between the two values).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + unit(rng) * (self.max - self.min)
    }

    pub fn contains(&self, v: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        v >= lo && v <= hi
    }
}

/// Uniform sample in `[0, 1)`.
pub(crate) fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Circle no decorative feature (inflated by its padding) may intersect,
/// in screen pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionZone {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl ExclusionZone {
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self { cx, cy, radius }
    }

    /// `true` when a feature at `(x, y)` with padding `pad` would intersect.
    pub fn excludes(&self, x: f64, y: f64, pad: f64) -> bool {
        let dist = (x - self.cx).hypot(y - self.cy);
        dist < self.radius + pad
    }
}

/// Exclusion zone expressed relative to the viewport: the center as fractions
/// of width/height, the radius as a fraction of the shorter side.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeZone {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl RelativeZone {
    pub fn resolve(&self, viewport: Viewport) -> ExclusionZone {
        let c = viewport.at_fraction(self.cx, self.cy);
        ExclusionZone::new(c.x, c.y, self.radius * viewport.min_side())
    }
}

/// Host-pinned feature position, as fractions of width/height.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Features placed by the best-candidate loop, on top of the anchors.
    pub target_count: usize,
    pub candidates_per_slot: usize,
    pub fallback_retries: usize,
    pub exclusion_zones: Vec<RelativeZone>,
    /// Per-feature scale factor.
    pub size_range: SizeRange,
    /// Unscaled visual extent of a feature, in pixels.
    pub extent_range: SizeRange,
    pub brightness_range: SizeRange,
    /// Padding is `extent * scale * padding_multiplier`.
    pub padding_multiplier: f64,
    pub anchors: Vec<Anchor>,
    pub seed: Option<u64>,
    pub cache_namespace: String,
    pub cache_version: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            target_count: 6,
            candidates_per_slot: 50,
            fallback_retries: 3000,
            exclusion_zones: vec![
                RelativeZone {
                    cx: 0.16,
                    cy: 0.28,
                    radius: 0.24,
                },
                RelativeZone {
                    cx: 0.87,
                    cy: 0.85,
                    radius: 0.3876,
                },
            ],
            size_range: SizeRange::new(0.6, 1.4),
            extent_range: SizeRange::new(25.0, 85.0),
            brightness_range: SizeRange::new(1.6, 2.0),
            padding_multiplier: 1.0,
            anchors: Vec::new(),
            seed: None,
            cache_namespace: "radio_galaxies".to_string(),
            cache_version: 6,
        }
    }
}

impl FieldConfig {
    pub fn zones_for(&self, viewport: Viewport) -> Vec<ExclusionZone> {
        self.exclusion_zones
            .iter()
            .map(|z| z.resolve(viewport))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ExclusionZone, FieldConfig, RelativeZone, SizeRange};
    use foundation::math::Viewport;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn size_range_samples_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = SizeRange::new(2.0, 5.0);
        for _ in 0..200 {
            assert!(r.contains(r.sample(&mut rng)));
        }
        let flipped = SizeRange::new(5.0, 2.0);
        assert!(flipped.contains(flipped.sample(&mut rng)));
        assert_eq!(SizeRange::new(3.0, 3.0).sample(&mut rng), 3.0);
    }

    #[test]
    fn exclusion_includes_padding() {
        let z = ExclusionZone::new(0.0, 0.0, 10.0);
        assert!(z.excludes(12.0, 0.0, 3.0));
        assert!(!z.excludes(13.0, 0.0, 3.0));
    }

    #[test]
    fn relative_zone_uses_shorter_side() {
        let z = RelativeZone {
            cx: 0.5,
            cy: 0.5,
            radius: 0.25,
        }
        .resolve(Viewport::new(800.0, 400.0));
        assert_eq!(z, ExclusionZone::new(400.0, 200.0, 100.0));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: FieldConfig = serde_json::from_str(r#"{"target_count": 12}"#).unwrap();
        assert_eq!(cfg.target_count, 12);
        assert_eq!(cfg.candidates_per_slot, 50);
        assert_eq!(cfg.fallback_retries, 3000);
    }
}
