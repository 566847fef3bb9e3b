//! Interactive orthographic globe: an animation loop that rotates, projects
//! and draws a set of geo-tagged features, with drag-to-rotate and
//! click-to-select input.

pub mod config;
pub mod draw;
pub mod input;
pub mod layout;
pub mod scene;

pub use config::*;
pub use input::*;
pub use layout::*;
pub use scene::*;
