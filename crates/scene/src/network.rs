//! Station networks: fixed ground stations joined by baselines, plus an
//! optional drifting balloon-borne station.

use std::f64::consts::TAU;

use foundation::math::{GeoPoint, Projection, ScreenDisc, Vec2, Vec3, project, rotate, to_unit_vector};
use serde::{Deserialize, Serialize};

use crate::feature::{FeatureMetadata, SceneFeature};
use crate::projected::ProjectedPoint;

const EHT_STATIONS: [(&str, &str, f64, f64); 9] = [
    ("alma", "ALMA", -23.02, -67.75),
    ("apex", "APEX", -23.0, -67.76),
    ("lmt", "LMT", 19.0, -97.3),
    ("sma", "SMA/JCMT", 19.82, -155.47),
    ("smt", "SMT", 32.7, -109.89),
    ("pico", "IRAM Pico", 37.06, -3.39),
    ("noema", "NOEMA", 44.63, 5.91),
    ("glt", "GLT", 72.58, -38.46),
    ("spt", "SPT", -89.99, 0.0),
];

const EHT_LINKS: [(usize, usize); 9] = [
    (0, 2),
    (0, 3),
    (2, 3),
    (2, 4),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 3),
    (0, 8),
];

/// Stations plus the index pairs that are joined by a baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct StationNetwork {
    pub stations: Vec<SceneFeature>,
    pub links: Vec<(usize, usize)>,
}

impl StationNetwork {
    pub fn new(stations: Vec<SceneFeature>, links: Vec<(usize, usize)>) -> Self {
        Self { stations, links }
    }

    /// The millimetre-VLBI telescope array shown on the site background.
    pub fn eht() -> Self {
        let stations = EHT_STATIONS
            .iter()
            .map(|&(id, label, lat, lon)| {
                SceneFeature::new(id, label, GeoPoint::new(lat, lon)).with_metadata(
                    FeatureMetadata {
                        category: Some("station".to_string()),
                        ..FeatureMetadata::default()
                    },
                )
            })
            .collect();
        Self::new(stations, EHT_LINKS.to_vec())
    }

    /// Screen segments for links whose ends are both front-facing.
    ///
    /// `points` must come from projecting `self.stations`; links pointing
    /// past the end are skipped.
    pub fn visible_baselines(&self, points: &[ProjectedPoint]) -> Vec<(Vec2, Vec2)> {
        self.links
            .iter()
            .filter_map(|&(a, b)| {
                let (pa, pb) = (points.get(a)?, points.get(b)?);
                (pa.front && pb.front).then_some((pa.screen, pb.screen))
            })
            .collect()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonConfig {
    pub start: GeoPoint,
    /// Projection radius multiplier; 1.0 is the surface.
    pub altitude: f64,
    pub drift_deg_per_ms: f64,
    /// Camera-space depth at or below which the platform is mirrored to the
    /// visible hemisphere.
    pub mirror_threshold: f64,
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            start: GeoPoint::new(22.0, -30.0),
            altitude: 1.03,
            drift_deg_per_ms: 0.003,
            mirror_threshold: 0.25,
        }
    }
}

/// A balloon-borne station drifting east at a constant rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BalloonPlatform {
    config: BalloonConfig,
    lon_offset_deg: f64,
}

impl BalloonPlatform {
    pub fn new(config: BalloonConfig) -> Self {
        Self {
            config,
            lon_offset_deg: 0.0,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        let step = dt_ms * self.config.drift_deg_per_ms;
        if step.is_finite() {
            // Wrap to keep the offset bounded over long sessions.
            self.lon_offset_deg = (self.lon_offset_deg + step).rem_euclid(360.0);
        }
    }

    pub fn position(&self) -> GeoPoint {
        self.config.start.offset_lon(self.lon_offset_deg)
    }

    /// Camera-space position, mirrored across the view axis when it sits at
    /// or behind the mirror threshold.
    pub fn camera_vector(&self, yaw: f64, pitch: f64) -> Vec3 {
        let v = rotate(to_unit_vector(self.position()), yaw, pitch);
        if v.z <= self.config.mirror_threshold {
            Vec3::new(-v.x, v.y, -v.z)
        } else {
            v
        }
    }

    pub fn project(&self, yaw: f64, pitch: f64, disc: ScreenDisc) -> Projection {
        project(
            self.camera_vector(yaw, pitch),
            disc.scaled(self.config.altitude),
        )
    }
}

/// Segments from the platform to every front-facing station.
pub fn balloon_baselines(balloon: Projection, stations: &[ProjectedPoint]) -> Vec<(Vec2, Vec2)> {
    if !balloon.front {
        return Vec::new();
    }
    stations
        .iter()
        .filter(|p| p.front)
        .map(|p| (balloon.position, p.screen))
        .collect()
}

/// Pseudo (u, v) baseline samples on the unit disc, used for the coverage
/// plot overlay.
pub fn uv_coverage(count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = i as f64 / count as f64 * TAU;
            let r = (i as f64 * 1.3).sin() * 0.9 + 0.1;
            Vec2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BalloonConfig, BalloonPlatform, StationNetwork, balloon_baselines, uv_coverage};
    use crate::projected::ProjectedPoint;
    use foundation::math::{GeoPoint, Projection, ScreenDisc, Vec2};

    fn pt(feature: usize, front: bool) -> ProjectedPoint {
        ProjectedPoint {
            feature,
            screen: Vec2::new(feature as f64, 0.0),
            front,
        }
    }

    #[test]
    fn eht_network_links_are_in_range() {
        let net = StationNetwork::eht();
        assert_eq!(net.stations.len(), 9);
        assert!(
            net.links
                .iter()
                .all(|&(a, b)| a < net.stations.len() && b < net.stations.len())
        );
        assert_eq!(net.stations[8].label, "SPT");
    }

    #[test]
    fn baselines_need_both_ends_front() {
        let net = StationNetwork::new(Vec::new(), vec![(0, 1), (1, 2), (2, 9)]);
        let points = [pt(0, true), pt(1, true), pt(2, false)];
        let segs = net.visible_baselines(&points);
        assert_eq!(segs, vec![(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0))]);
    }

    #[test]
    fn balloon_drifts_east_and_wraps() {
        let mut b = BalloonPlatform::new(BalloonConfig::default());
        b.advance(1000.0);
        assert!((b.position().lon_deg - (-27.0)).abs() < 1e-9);
        b.advance(120_000.0);
        assert!(b.position().lon_deg < -30.0 + 360.0);
        b.advance(f64::NAN);
        assert!(b.position().is_finite());
    }

    #[test]
    fn balloon_is_mirrored_toward_viewer() {
        let b = BalloonPlatform::new(BalloonConfig {
            start: GeoPoint::new(0.0, 90.0),
            ..BalloonConfig::default()
        });
        // lon 90 faces away from the viewer with no rotation.
        let v = b.camera_vector(0.0, 0.0);
        assert!(v.z > 0.9, "{v:?}");

        let disc = ScreenDisc::new(Vec2::new(0.0, 0.0), 100.0);
        let p = b.project(0.0, 0.0, disc);
        assert!(p.front);
        assert!(p.position.length() <= 103.0 + 1e-9);
    }

    #[test]
    fn balloon_links_to_front_stations_only() {
        let balloon = Projection {
            position: Vec2::new(5.0, 5.0),
            depth: 0.5,
            front: true,
        };
        let stations = [pt(0, true), pt(1, false), pt(2, true)];
        assert_eq!(balloon_baselines(balloon, &stations).len(), 2);

        let hidden = Projection {
            front: false,
            ..balloon
        };
        assert!(balloon_baselines(hidden, &stations).is_empty());
    }

    #[test]
    fn uv_coverage_stays_in_unit_disc() {
        let uv = uv_coverage(64);
        assert_eq!(uv.len(), 64);
        assert!(uv.iter().all(|p| p.length() <= 1.0 + 1e-12));
        assert!((uv[0].x - 0.1).abs() < 1e-12);
        assert!(uv_coverage(0).is_empty());
    }
}
