use snafu::{Location, Snafu};
use std::path::PathBuf;
use tokio::task::JoinError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to join tasks"))]
    JoinError {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: JoinError,
    },
    #[snafu(display("Invalid detection parameters"))]
    Core {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: ais_core::Error,
    },
    #[snafu(display("Failed to load AIS data"))]
    Loader {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: ais_loader::Error,
    },
    #[snafu(display("Failed to read settings"))]
    Settings {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: config::ConfigError,
    },
    #[snafu(display(
        "Collision scan exceeded its cell limit, cells: '{cells}', limit: '{limit}'"
    ))]
    CollisionCellLimit {
        #[snafu(implicit)]
        location: Location,
        cells: usize,
        limit: usize,
    },
    #[snafu(display("Collision scan task failed"))]
    CollisionTask {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: JoinError,
    },
    #[snafu(display("Failed to write csv report to '{}'", path.display()))]
    CsvReport {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: csv::Error,
    },
    #[snafu(display("Failed to write json report to '{}'", path.display()))]
    JsonReport {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Failed to write report to '{}'", path.display()))]
    Io {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
}
