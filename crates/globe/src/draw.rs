//! Frame painting, layer by layer, back to front.

use field::{DecorFeature, Star};
use foundation::math::{GeoPoint, Projection, ScreenDisc, Vec2};
use render::{Color, DrawSurface, Paint, Transform2D};
use scene::{OutlineSet, OutlineShape, ProjectedPoint, front_runs};

const BACKGROUND: Color = Color::rgb(4, 8, 20);
const STAR: Color = Color::WHITE;
const GALAXY_CORE: Color = Color::rgba(255, 236, 200, 0.9);
const GALAXY_LOBE: Color = Color::rgba(255, 140, 60, 0.35);
const GALAXY_JET: Color = Color::rgba(255, 190, 120, 0.5);
const GLOBE_FILL: Color = Color::rgba(100, 180, 255, 0.06);
const GLOBE_RIM: Color = Color::rgba(100, 200, 255, 0.45);
const GRATICULE: Color = Color::rgba(100, 200, 255, 0.16);
const LAND: Color = Color::rgba(60, 140, 180, 0.20);
const BORDER: Color = Color::rgba(140, 210, 255, 0.35);
const HIGHLIGHT: Color = Color::rgba(255, 220, 0, 0.12);
const BASELINE: Color = Color::rgba(120, 220, 255, 0.55);
const BALLOON_LINK: Color = Color::rgba(255, 200, 120, 0.45);
const MARKER_GLOW: Color = Color::rgba(255, 100, 100, 0.28);
const MARKER: Color = Color::rgb(255, 102, 102);
const MARKER_SELECTED: Color = Color::rgb(255, 220, 0);
const BALLOON: Color = Color::rgb(245, 245, 255);
const UV_GLOW: Color = Color::rgba(56, 189, 248, 0.18);
const UV_SPOKE: Color = Color::rgba(56, 189, 248, 0.8);
const LABEL: Color = Color::rgba(255, 255, 255, 0.95);

const MARKER_RADIUS: f64 = 10.0;

pub fn background<S: DrawSurface + ?Sized>(surface: &mut S) {
    surface.set_transform(Transform2D::IDENTITY);
    surface.clear(BACKGROUND);
}

pub fn stars<S: DrawSurface + ?Sized>(surface: &mut S, stars: &[Star], offset: Vec2) {
    surface.set_transform(Transform2D::translation(offset));
    for s in stars {
        surface.draw_circle(
            Vec2::new(s.x, s.y),
            s.radius,
            Paint::Fill(STAR.faded(s.alpha)),
        );
    }
    surface.set_transform(Transform2D::IDENTITY);
}

/// Radio-galaxy glyph: a bright core with a jet and a lobe on either side,
/// laid out along the local x axis.
pub fn decor_field<S: DrawSurface + ?Sized>(surface: &mut S, features: &[DecorFeature], offset: Vec2) {
    for f in features {
        surface.set_transform(Transform2D::new(
            Vec2::new(f.x, f.y) + offset,
            f.angle,
            f.scale,
        ));
        let half = f.extent / 2.0;
        let glow = (f.brightness / 2.0).min(1.0);
        for side in [-1.0, 1.0] {
            let lobe = Vec2::new(side * half, 0.0);
            surface.draw_line(Vec2::ZERO, lobe, GALAXY_JET.faded(glow), 1.0);
            surface.draw_circle(lobe, f.extent * 0.18, Paint::Fill(GALAXY_LOBE.faded(glow)));
        }
        surface.draw_circle(Vec2::ZERO, f.extent * 0.05, Paint::Fill(GALAXY_CORE));
    }
    surface.set_transform(Transform2D::IDENTITY);
}

pub fn globe_disc<S: DrawSurface + ?Sized>(surface: &mut S, disc: ScreenDisc) {
    surface.draw_circle(disc.center, disc.radius, Paint::Fill(GLOBE_FILL));
    surface.draw_circle(disc.center, disc.radius, Paint::stroke(GLOBE_RIM, 2.0));
}

pub fn graticule<S: DrawSurface + ?Sized>(
    surface: &mut S,
    lines: &[Vec<GeoPoint>],
    yaw: f64,
    pitch: f64,
    disc: ScreenDisc,
) {
    for line in lines {
        for run in front_runs(line.iter().copied(), yaw, pitch, disc) {
            surface.draw_polyline(&run, GRATICULE, 0.7);
        }
    }
}

/// Land/border outlines. A ring that is entirely on the visible hemisphere is
/// filled; a clipped one is only stroked.
pub fn outlines<S: DrawSurface + ?Sized>(
    surface: &mut S,
    set: &OutlineSet,
    highlight: Option<GeoPoint>,
    yaw: f64,
    pitch: f64,
    disc: ScreenDisc,
) {
    let highlighted = highlight.and_then(|p| set.containing(p));
    for outline in &set.outlines {
        let fill = if highlighted.is_some_and(|h| std::ptr::eq(h, outline)) {
            HIGHLIGHT
        } else {
            LAND
        };
        let is_area = matches!(outline.shape, OutlineShape::Area(_));
        for path in outline.paths() {
            let runs = front_runs(path.iter().copied(), yaw, pitch, disc);
            if is_area && runs.len() == 1 && runs[0].len() == path.len() {
                surface.draw_polygon(&runs[0], Paint::Fill(fill));
            }
            for run in &runs {
                surface.draw_polyline(run, BORDER, 0.6);
            }
        }
    }
}

pub fn baselines<S: DrawSurface + ?Sized>(surface: &mut S, segments: &[(Vec2, Vec2)]) {
    for &(a, b) in segments {
        surface.draw_line(a, b, BASELINE, 1.2);
    }
}

pub fn balloon_links<S: DrawSurface + ?Sized>(surface: &mut S, segments: &[(Vec2, Vec2)]) {
    for &(a, b) in segments {
        surface.draw_line(a, b, BALLOON_LINK, 1.0);
    }
}

/// Pins for the front-facing points; `selected` is the feature index to
/// emphasise.
pub fn markers<S: DrawSurface + ?Sized>(
    surface: &mut S,
    points: &[ProjectedPoint],
    selected: Option<usize>,
) {
    for p in points.iter().filter(|p| p.front) {
        let body = if selected == Some(p.feature) {
            MARKER_SELECTED
        } else {
            MARKER
        };
        surface.draw_circle(p.screen, MARKER_RADIUS * 1.2, Paint::Fill(MARKER_GLOW));
        surface.draw_circle(p.screen, MARKER_RADIUS * 0.6, Paint::Fill(body));
        surface.draw_circle(
            p.screen,
            MARKER_RADIUS * 0.28,
            Paint::Fill(Color::WHITE),
        );
    }
}

pub fn balloon<S: DrawSurface + ?Sized>(surface: &mut S, at: Projection, disc: ScreenDisc) {
    if !at.front {
        return;
    }
    let size = (disc.radius * 0.05).max(6.0);
    surface.draw_circle(at.position, size, Paint::Fill(BALLOON));
    surface.draw_line(
        at.position,
        at.position + Vec2::new(0.0, size * 1.8),
        BALLOON,
        1.0,
    );
}

/// (u, v) samples on the unit disc as spokes from the inset centre; v is up.
pub fn uv_coverage<S: DrawSurface + ?Sized>(
    surface: &mut S,
    samples: &[Vec2],
    inset: ScreenDisc,
) {
    let c = inset.center;
    let scale = inset.radius * 0.9;
    surface.draw_circle(c, inset.radius, Paint::Fill(UV_GLOW));
    for uv in samples {
        surface.draw_line(c, Vec2::new(c.x + uv.x * scale, c.y - uv.y * scale), UV_SPOKE, 0.7);
    }
    surface.draw_circle(c, 1.5, Paint::Fill(UV_SPOKE));
}

pub fn hover_label<S: DrawSurface + ?Sized>(surface: &mut S, at: Vec2, text: &str) {
    surface.draw_label(at + Vec2::new(14.0, -16.0), text, LABEL);
}
