use std::f64::consts::TAU;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl std::ops::Add for Complex {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self::new(self.re + o.re, self.im + o.im)
    }
}

impl std::ops::Sub for Complex {
    type Output = Self;

    fn sub(self, o: Self) -> Self {
        Self::new(self.re - o.re, self.im - o.im)
    }
}

impl std::ops::Mul for Complex {
    type Output = Self;

    fn mul(self, o: Self) -> Self {
        Self::new(
            self.re * o.re - self.im * o.im,
            self.re * o.im + self.im * o.re,
        )
    }
}

/// Smallest power of two `>= n` (1 for 0).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Planned in-place radix-2 forward DFT (`e^{-2πi kn/N}`, unnormalised).
#[derive(Debug, Clone)]
pub struct Fft {
    size: usize,
    twiddles: Vec<Complex>,
    bit_reverse: Vec<usize>,
}

impl Fft {
    /// `None` unless `size` is a power of two.
    pub fn new(size: usize) -> Option<Self> {
        if !size.is_power_of_two() {
            return None;
        }
        let twiddles = (0..size / 2)
            .map(|k| {
                let (s, c) = (-TAU * k as f64 / size as f64).sin_cos();
                Complex::new(c, s)
            })
            .collect();
        let bits = size.trailing_zeros();
        let bit_reverse = (0..size)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();
        Some(Self {
            size,
            twiddles,
            bit_reverse,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transforms `buf` in place. A buffer of the wrong length is left as-is.
    pub fn transform(&self, buf: &mut [Complex]) {
        let n = self.size;
        if buf.len() != n {
            return;
        }
        for i in 0..n {
            let j = self.bit_reverse[i];
            if i < j {
                buf.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let a = buf[start + k];
                    let b = buf[start + k + half] * self.twiddles[k * stride];
                    buf[start + k] = a + b;
                    buf[start + k + half] = a - b;
                }
            }
            len <<= 1;
        }
    }
}
