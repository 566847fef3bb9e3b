use serde::{Deserialize, Serialize};

use crate::error::SpectralError;

/// Row-major RGBA8 raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SpectralError> {
        let image = Self {
            width,
            height,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: rgba.repeat(count),
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Non-empty, and the buffer length matches the dimensions.
    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.width == 0 || self.height == 0 {
            return Err(SpectralError::EmptyImage);
        }
        let expected = self.expected_len();
        if self.pixels.len() != expected {
            return Err(SpectralError::PixelBufferMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// RGBA at `(x, y)`. Callers must stay in bounds of a validated image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// `(R + G + B) / 3 / 255`, in `[0, 1]`. Alpha is ignored.
    pub fn gray(&self, x: u32, y: u32) -> f64 {
        let [r, g, b, _] = self.pixel(x, y);
        (r as f64 + g as f64 + b as f64) / 3.0 / 255.0
    }

    /// Nearest-neighbour downscale so neither side exceeds `max_side`.
    /// Images already small enough are returned unchanged.
    pub fn fit_within(&self, max_side: u32) -> Self {
        let max_side = max_side.max(1);
        if self.width <= max_side && self.height <= max_side {
            return self.clone();
        }
        let w = self.width.min(max_side);
        let h = self.height.min(max_side);
        Self::from_fn(w, h, |x, y| {
            let sx = (x as u64 * self.width as u64 / w as u64) as u32;
            let sy = (y as u64 * self.height as u64 / h as u64) as u32;
            self.pixel(sx, sy)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RasterImage;
    use crate::error::SpectralError;

    #[test]
    fn validates_dimensions_and_buffer() {
        assert_eq!(
            RasterImage::new(0, 3, Vec::new()),
            Err(SpectralError::EmptyImage)
        );
        assert_eq!(
            RasterImage::new(2, 2, vec![0; 15]),
            Err(SpectralError::PixelBufferMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert!(RasterImage::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn gray_averages_color_channels() {
        let img = RasterImage::solid(3, 2, [255, 0, 0, 255]);
        assert_eq!(img.pixels.len(), 24);
        assert!((img.gray(2, 1) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn fit_within_clamps_each_side() {
        let img = RasterImage::from_fn(1024, 300, |x, _| [(x % 256) as u8, 0, 0, 255]);
        let small = img.fit_within(512);
        assert_eq!((small.width, small.height), (512, 300));
        assert!(small.validate().is_ok());
        assert_eq!(small.pixel(1, 0)[0], 2);
        assert_eq!(RasterImage::solid(4, 4, [1, 2, 3, 4]).fit_within(512).width, 4);
    }
}
