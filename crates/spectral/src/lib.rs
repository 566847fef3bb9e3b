//! Log-magnitude Fourier spectrum of a raster image, computed synchronously
//! or on a background worker thread.

pub mod error;
pub mod fft;
pub mod image;
pub mod palette;
pub mod protocol;
pub mod spectrum;
pub mod worker;

pub use error::*;
pub use fft::*;
pub use image::*;
pub use palette::*;
pub use protocol::*;
pub use spectrum::*;
pub use worker::*;
