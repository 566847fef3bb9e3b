pub mod feature;
pub mod graticule;
pub mod network;
pub mod outline;
pub mod picking;
pub mod projected;
pub mod rotation;
pub mod selection;

pub use feature::*;
pub use graticule::*;
pub use network::*;
pub use outline::*;
pub use picking::*;
pub use projected::*;
pub use rotation::*;
pub use selection::*;
