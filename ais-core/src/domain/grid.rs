use std::time::Duration;

use snafu::ensure;

use crate::{PositionReport, Result, error::error::InvalidGridResolutionSnafu};

/// Coordinate precision above this many decimals no longer describes a
/// meaningful position cell.
pub const MAX_COORDINATE_PRECISION: u32 = 9;

/// How reports are bucketed in time and space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridResolution {
    time_window_ms: i64,
    coordinate_scale: f64,
}

/// A space-time bucket, rounded timestamp and coordinates as integer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    pub time_bucket: i64,
    pub latitude: i64,
    pub longitude: i64,
}

impl GridResolution {
    pub fn new(time_window: Duration, coordinate_precision: u32) -> Result<Self> {
        let time_window_ms = i64::try_from(time_window.as_millis()).unwrap_or(i64::MAX);
        ensure!(
            time_window_ms > 0 && coordinate_precision <= MAX_COORDINATE_PRECISION,
            InvalidGridResolutionSnafu {
                time_window,
                coordinate_precision,
            }
        );

        Ok(Self {
            time_window_ms,
            coordinate_scale: 10f64.powi(coordinate_precision as i32),
        })
    }
}

impl GridCell {
    /// Rounds to the nearest bucket with ties away from zero.
    /// Reports with non-finite coordinates have no cell.
    pub fn new(report: &PositionReport, resolution: &GridResolution) -> Option<Self> {
        if !report.latitude.is_finite() || !report.longitude.is_finite() {
            return None;
        }

        Some(Self {
            time_bucket: round_div(report.timestamp.timestamp_millis(), resolution.time_window_ms),
            latitude: (report.latitude * resolution.coordinate_scale).round() as i64,
            longitude: (report.longitude * resolution.coordinate_scale).round() as i64,
        })
    }
}

fn round_div(value: i64, divisor: i64) -> i64 {
    let quotient = value.div_euclid(divisor);
    let twice_remainder = value.rem_euclid(divisor) as i128 * 2;
    let divisor = divisor as i128;

    if twice_remainder > divisor || (twice_remainder == divisor && value >= 0) {
        quotient + 1
    } else {
        quotient
    }
}
