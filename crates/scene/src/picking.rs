use foundation::math::Vec2;
use foundation::math::precision::stable_total_cmp_f64;

use crate::projected::ProjectedPoint;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    /// Index into the feature slice.
    pub feature: usize,
    pub screen: Vec2,
    pub distance: f64,
}

/// Nearest front-facing point strictly within `radius` pixels of `at`.
///
/// Ordering contract:
/// - The smallest screen distance wins.
/// - Equal distances resolve to the lower feature index.
/// - Back-facing points are never candidates.
pub fn pick_nearest(points: &[ProjectedPoint], at: Vec2, radius: f64) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for p in points.iter().filter(|p| p.front) {
        let distance = at.distance(p.screen);
        if !(distance < radius) {
            continue;
        }
        let better = match &best {
            None => true,
            Some(b) => stable_total_cmp_f64(distance, b.distance)
                .then_with(|| p.feature.cmp(&b.feature))
                .is_lt(),
        };
        if better {
            best = Some(PickHit {
                feature: p.feature,
                screen: p.screen,
                distance,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::pick_nearest;
    use crate::projected::ProjectedPoint;
    use foundation::math::Vec2;

    fn pt(feature: usize, x: f64, y: f64, front: bool) -> ProjectedPoint {
        ProjectedPoint {
            feature,
            screen: Vec2::new(x, y),
            front,
        }
    }

    #[test]
    fn picks_nearest_within_radius() {
        let points = [pt(0, 10.0, 0.0, true), pt(1, 4.0, 0.0, true), pt(2, 30.0, 0.0, true)];
        let hit = pick_nearest(&points, Vec2::ZERO, 22.0).unwrap();
        assert_eq!(hit.feature, 1);
        assert_eq!(hit.distance, 4.0);
    }

    #[test]
    fn radius_is_exclusive() {
        let points = [pt(0, 22.0, 0.0, true)];
        assert!(pick_nearest(&points, Vec2::ZERO, 22.0).is_none());
    }

    #[test]
    fn ignores_back_facing_points() {
        let points = [pt(0, 1.0, 0.0, false), pt(1, 5.0, 0.0, true)];
        assert_eq!(pick_nearest(&points, Vec2::ZERO, 22.0).unwrap().feature, 1);
        assert!(pick_nearest(&points[..1], Vec2::ZERO, 22.0).is_none());
    }

    #[test]
    fn ties_resolve_to_lower_index() {
        let points = [pt(5, 0.0, 3.0, true), pt(2, 3.0, 0.0, true), pt(7, -3.0, 0.0, true)];
        assert_eq!(pick_nearest(&points, Vec2::ZERO, 22.0).unwrap().feature, 2);
    }

    #[test]
    fn nan_positions_are_skipped() {
        let points = [pt(0, f64::NAN, 0.0, true), pt(1, 2.0, 0.0, true)];
        assert_eq!(pick_nearest(&points, Vec2::ZERO, 22.0).unwrap().feature, 1);
    }
}
