use foundation::math::{ScreenDisc, Vec2, project_geo};

use crate::feature::SceneFeature;
use crate::rotation::RotationState;

/// A feature placed on screen for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedPoint {
    /// Index into the feature slice the point was projected from.
    pub feature: usize,
    pub screen: Vec2,
    pub front: bool,
}

/// Projects every feature with the current rotation. Output order matches
/// input order, one point per feature.
pub fn project_features(
    features: &[SceneFeature],
    rotation: &RotationState,
    disc: ScreenDisc,
) -> Vec<ProjectedPoint> {
    let pitch = rotation.view_pitch();
    features
        .iter()
        .enumerate()
        .map(|(feature, f)| {
            let p = project_geo(f.position, rotation.yaw, pitch, disc);
            ProjectedPoint {
                feature,
                screen: p.position,
                front: p.front,
            }
        })
        .collect()
}

pub fn front_facing(points: &[ProjectedPoint]) -> impl Iterator<Item = &ProjectedPoint> {
    points.iter().filter(|p| p.front)
}

#[cfg(test)]
mod tests {
    use super::{front_facing, project_features};
    use crate::feature::SceneFeature;
    use crate::rotation::{RotationConfig, RotationState};
    use foundation::math::{GeoPoint, ScreenDisc, Vec2};

    fn flat_rotation() -> RotationState {
        RotationState::new(&RotationConfig {
            initial_yaw_deg: 0.0,
            initial_pitch_deg: 0.0,
            tilt_deg: 0.0,
            ..RotationConfig::default()
        })
    }

    #[test]
    fn exactly_one_of_two_opposite_stations_is_front() {
        let features = vec![
            SceneFeature::new("a", "A", GeoPoint::new(0.0, 0.0)),
            SceneFeature::new("b", "B", GeoPoint::new(0.0, 180.0)),
        ];
        let disc = ScreenDisc::new(Vec2::new(400.0, 300.0), 200.0);
        let points = project_features(&features, &flat_rotation(), disc);
        assert_eq!(points.len(), 2);
        assert_eq!(front_facing(&points).count(), 1);
    }

    #[test]
    fn front_count_never_exceeds_feature_count() {
        let features: Vec<SceneFeature> = (0..40)
            .map(|i| {
                SceneFeature::new(
                    format!("f{i}"),
                    "",
                    GeoPoint::new(-80.0 + i as f64 * 4.0, -170.0 + i as f64 * 8.5),
                )
            })
            .collect();
        let disc = ScreenDisc::new(Vec2::new(0.0, 0.0), 1.0);
        let mut rotation = RotationState::default();
        for _ in 0..20 {
            rotation.advance(5_000.0);
            let points = project_features(&features, &rotation, disc);
            assert!(front_facing(&points).count() <= features.len());
            assert!(points.iter().enumerate().all(|(i, p)| p.feature == i));
        }
    }
}
