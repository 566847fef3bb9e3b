use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color. Alpha is in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color, alpha multiplied by `factor` and clamped to [0, 1].
    pub fn faded(self, factor: f64) -> Self {
        let a = self.a * factor;
        Self {
            a: if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) },
            ..self
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: f64 },
}

impl Paint {
    pub fn stroke(color: Color, width: f64) -> Self {
        Paint::Stroke { color, width }
    }

    pub fn color(&self) -> Color {
        match self {
            Paint::Fill(c) => *c,
            Paint::Stroke { color, .. } => *color,
        }
    }
}

/// Translate + rotate + uniform scale, applied as `translate(rotate(scale(p)))`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    pub translate: Vec2,
    pub rotation_rad: f64,
    pub scale: f64,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        rotation_rad: 0.0,
        scale: 1.0,
    };

    pub fn translation(offset: Vec2) -> Self {
        Self {
            translate: offset,
            ..Self::IDENTITY
        }
    }

    pub fn new(translate: Vec2, rotation_rad: f64, scale: f64) -> Self {
        Self {
            translate,
            rotation_rad,
            scale,
        }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        let (s, c) = self.rotation_rad.sin_cos();
        let q = p.scale(self.scale);
        Vec2::new(c * q.x - s * q.y, s * q.x + c * q.y) + self.translate
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Transform2D};
    use foundation::math::Vec2;

    #[test]
    fn faded_clamps_alpha() {
        assert_eq!(Color::WHITE.faded(2.0).a, 1.0);
        assert_eq!(Color::WHITE.faded(-1.0).a, 0.0);
        assert_eq!(Color::WHITE.faded(f64::NAN).a, 0.0);
        assert_eq!(Color::rgba(1, 2, 3, 0.5).faded(0.5).a, 0.25);
    }

    #[test]
    fn transform_scales_rotates_then_translates() {
        let t = Transform2D::new(Vec2::new(10.0, 0.0), std::f64::consts::FRAC_PI_2, 2.0);
        let p = t.apply(Vec2::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
        assert_eq!(Transform2D::IDENTITY.apply(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
    }
}
