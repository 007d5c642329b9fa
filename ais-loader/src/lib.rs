#![deny(rust_2018_idioms)]

mod error;
mod loader;
mod models;

pub use error::*;
pub use loader::*;
pub use models::*;
