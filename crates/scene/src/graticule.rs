use foundation::math::{GeoPoint, ScreenDisc, Vec2, project_geo};

const DEFAULT_STEP_DEG: f64 = 6.0;

/// Parallels every 30° in [-60, 60] and meridians every 30° in [-150, 150],
/// each sampled every `step_deg` degrees.
pub fn graticule_lines(step_deg: f64) -> Vec<Vec<GeoPoint>> {
    let step = if step_deg.is_finite() && step_deg > 0.0 {
        step_deg
    } else {
        DEFAULT_STEP_DEG
    };

    let mut lines = Vec::new();
    for lat in (-2..=2).map(|i| i as f64 * 30.0) {
        lines.push(sample(-180.0, 180.0, step, |lon| GeoPoint::new(lat, lon)));
    }
    for lon in (-5..=5).map(|i| i as f64 * 30.0) {
        lines.push(sample(-90.0, 90.0, step, |lat| GeoPoint::new(lat, lon)));
    }
    lines
}

fn sample(from: f64, to: f64, step: f64, point: impl Fn(f64) -> GeoPoint) -> Vec<GeoPoint> {
    let count = ((to - from) / step).floor() as usize;
    (0..=count).map(|i| point(from + i as f64 * step)).collect()
}

/// Splits a projected path into its front-facing runs. Runs with fewer than
/// two points are dropped since they draw nothing.
pub fn front_runs(
    path: impl IntoIterator<Item = GeoPoint>,
    yaw: f64,
    pitch: f64,
    disc: ScreenDisc,
) -> Vec<Vec<Vec2>> {
    let mut runs = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();
    for p in path {
        let projected = project_geo(p, yaw, pitch, disc);
        if projected.front {
            current.push(projected.position);
        } else if !current.is_empty() {
            let run = std::mem::take(&mut current);
            if run.len() >= 2 {
                runs.push(run);
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}
