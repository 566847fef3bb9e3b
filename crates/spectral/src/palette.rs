use serde::{Deserialize, Serialize};

/// Linear false-color ramp from black to `(r, g, b)` at full magnitude.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Palette {
    /// Cyan.
    fn default() -> Self {
        Self {
            r: 56,
            g: 189,
            b: 248,
        }
    }
}

impl Palette {
    /// Opaque RGBA for a normalised magnitude. Monotonic in `val`; values
    /// outside `[0, 1]` (and NaN) are clamped.
    pub fn map(&self, val: f64) -> [u8; 4] {
        let v = if val.is_nan() { 0.0 } else { val.clamp(0.0, 1.0) };
        let channel = |c: u8| (v * c as f64).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), 255]
    }
}

/// Source rectangle for drawing an image so it covers a target area,
/// cropping the overflow evenly from both sides.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn cover_crop(source_w: f64, source_h: f64, target_w: f64, target_h: f64) -> CropRect {
    let scale = (target_w / source_w).max(target_h / source_h);
    if !scale.is_finite() || scale <= 0.0 {
        return CropRect {
            x: 0.0,
            y: 0.0,
            width: source_w,
            height: source_h,
        };
    }
    let width = source_w.min(target_w / scale);
    let height = source_h.min(target_h / scale);
    CropRect {
        x: (source_w - width) / 2.0,
        y: (source_h - height) / 2.0,
        width,
        height,
    }
}
