use tracing::debug;

use crate::error::SpectralError;
use crate::fft::{Complex, Fft, next_pow2};
use crate::image::RasterImage;
use crate::palette::Palette;

/// Largest padded side computed unless configured otherwise. A 4096² grid of
/// complex values is 256 MiB.
pub const DEFAULT_MAX_SIDE: usize = 4096;

/// Side of the square spectrum for a `width x height` image.
pub fn spectral_size(width: u32, height: u32) -> usize {
    next_pow2(width.max(height) as usize)
}

/// Normalised log magnitudes, quadrant-shifted so DC sits at `(N/2, N/2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeField {
    pub size: usize,
    /// Row-major, each value in `[0, 1]`.
    pub values: Vec<f64>,
}

impl MagnitudeField {
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.size + x]
    }

    pub fn to_image(&self, palette: &Palette) -> RasterImage {
        let side = self.size as u32;
        RasterImage::from_fn(side, side, |x, y| {
            palette.map(self.get(x as usize, y as usize))
        })
    }
}

/// [`compute_magnitude_within`] with [`DEFAULT_MAX_SIDE`].
pub fn compute_magnitude(image: &RasterImage) -> Result<MagnitudeField, SpectralError> {
    compute_magnitude_within(image, DEFAULT_MAX_SIDE)
}

/// 2-D DFT of the grayscale image (edge-extended to `N x N`) by a row pass
/// then a column pass, then `ln(1 + |F|) / ln(1 + max|F|)`.
///
/// `N` is checked against `max_side` before anything is allocated; a long thin
/// strip pads to the square of its long side.
pub fn compute_magnitude_within(
    image: &RasterImage,
    max_side: usize,
) -> Result<MagnitudeField, SpectralError> {
    image.validate()?;
    let n = spectral_size(image.width, image.height);
    if n > max_side {
        return Err(SpectralError::TooLarge { side: n, max: max_side });
    }
    let fft = Fft::new(n).ok_or(SpectralError::EmptyImage)?;

    let mut grid = vec![Complex::ZERO; n * n];
    for y in 0..n {
        let sy = (y as u32).min(image.height - 1);
        for x in 0..n {
            let sx = (x as u32).min(image.width - 1);
            grid[y * n + x] = Complex::new(image.gray(sx, sy), 0.0);
        }
    }

    for row in grid.chunks_mut(n) {
        fft.transform(row);
    }

    let mut column = vec![Complex::ZERO; n];
    for x in 0..n {
        for y in 0..n {
            column[y] = grid[y * n + x];
        }
        fft.transform(&mut column);
        for y in 0..n {
            grid[y * n + x] = column[y];
        }
    }

    let magnitudes: Vec<f64> = grid.iter().map(|c| c.norm()).collect();
    let max_mag = magnitudes.iter().copied().fold(0.0, f64::max);
    let log_base = max_mag.ln_1p();

    let half = n / 2;
    let mut values = vec![0.0; n * n];
    for y in 0..n {
        for x in 0..n {
            let u = (x + half) % n;
            let v = (y + half) % n;
            let mag = magnitudes[y * n + x];
            values[v * n + u] = if log_base > 0.0 && log_base.is_finite() {
                mag.ln_1p() / log_base
            } else {
                0.0
            };
        }
    }

    debug!(
        width = image.width,
        height = image.height,
        size = n,
        max_mag,
        "computed magnitude spectrum"
    );
    Ok(MagnitudeField { size: n, values })
}

/// False-colored `N x N` spectrum image.
pub fn render_spectrum(
    image: &RasterImage,
    palette: &Palette,
    max_side: usize,
) -> Result<RasterImage, SpectralError> {
    Ok(compute_magnitude_within(image, max_side)?.to_image(palette))
}
