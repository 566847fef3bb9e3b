pub mod paint;
pub mod surface;

pub use paint::*;
pub use surface::*;
