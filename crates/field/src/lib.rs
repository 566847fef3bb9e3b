//! Procedural decorative backdrop: best-candidate scattered features and a
//! star field, with a lifetime-scoped cache so relayouts at an unchanged size
//! reproduce the same field.

pub mod cache;
pub mod config;
pub mod placement;
pub mod stars;

pub use cache::*;
pub use config::*;
pub use placement::*;
pub use stars::*;
