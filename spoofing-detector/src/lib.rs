#![deny(rust_2018_idioms)]

mod benchmark;
mod collision;
mod error;
mod executor;
mod merger;
mod pipeline;
mod report;
mod rules;

pub mod settings;
pub mod startup;

pub use benchmark::*;
pub use collision::*;
pub use error::*;
pub use executor::*;
pub use merger::*;
pub use pipeline::*;
pub use report::*;
pub use rules::*;
