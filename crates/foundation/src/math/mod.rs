pub mod geo;
pub mod precision;
pub mod projection;
pub mod vec;
pub mod viewport;

pub use geo::*;
pub use precision::*;
pub use projection::*;
pub use vec::*;
pub use viewport::*;
