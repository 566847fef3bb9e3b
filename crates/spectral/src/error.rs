#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpectralError {
    EmptyImage,
    /// Padded spectrum side `side` is above the configured `max`.
    TooLarge { side: usize, max: usize },
    PixelBufferMismatch { expected: usize, actual: usize },
    QueueFull,
    WorkerGone,
    Timeout,
}

impl std::fmt::Display for SpectralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpectralError::EmptyImage => write!(f, "image has zero width or height"),
            SpectralError::TooLarge { side, max } => {
                write!(f, "spectrum side {side} exceeds the limit of {max}")
            }
            SpectralError::PixelBufferMismatch { expected, actual } => write!(
                f,
                "pixel buffer holds {actual} bytes, expected {expected} (width * height * 4)"
            ),
            SpectralError::QueueFull => write!(f, "spectral worker queue is full"),
            SpectralError::WorkerGone => write!(f, "spectral worker has shut down"),
            SpectralError::Timeout => write!(f, "timed out waiting for a spectral response"),
        }
    }
}

impl std::error::Error for SpectralError {}
