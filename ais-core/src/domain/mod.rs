mod ais;
mod anomaly;
mod fleet;
mod grid;

pub use ais::*;
pub use anomaly::*;
pub use fleet::*;
pub use grid::*;
