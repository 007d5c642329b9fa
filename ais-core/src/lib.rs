#![deny(rust_2018_idioms)]

mod domain;
mod error;
mod geo;

#[cfg(feature = "test")]
mod test_helper;

pub use domain::*;
pub use error::*;
pub use geo::*;

#[cfg(feature = "test")]
pub use test_helper::*;
