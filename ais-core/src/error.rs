use crate::Mmsi;
use chrono::{DateTime, Utc};
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display(
        "encountered a report from vessel '{found}' in the trajectory of vessel '{expected}'"
    ))]
    MixedVessels {
        #[snafu(implicit)]
        location: Location,
        expected: Mmsi,
        found: Mmsi,
    },
    #[snafu(display(
        "vessel '{mmsi}' reported an invalid coordinate ({latitude}, {longitude}) at '{timestamp}'"
    ))]
    InvalidCoordinate {
        #[snafu(implicit)]
        location: Location,
        mmsi: Mmsi,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    },
    #[snafu(display(
        "invalid grid resolution, time_window: '{time_window:?}', coordinate_precision: '{coordinate_precision}'"
    ))]
    InvalidGridResolution {
        #[snafu(implicit)]
        location: Location,
        time_window: std::time::Duration,
        coordinate_precision: u32,
    },
}
