use std::{fmt::Display, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use geoutils::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mmsi(i32);

/// A single decoded AIS position message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PositionReport {
    pub mmsi: Mmsi,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_over_ground: Option<f64>,
    pub course_over_ground: Option<f64>,
}

impl Mmsi {
    pub const fn new(mmsi: i32) -> Self {
        Self(mmsi)
    }

    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<Mmsi> for i32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PositionReport {
    pub fn location(&self) -> Location {
        Location::new(self.latitude, self.longitude)
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Speed and course are only usable when both are present and finite.
    pub fn kinematics(&self) -> Option<(f64, f64)> {
        match (self.speed_over_ground, self.course_over_ground) {
            (Some(sog), Some(cog)) if sog.is_finite() && cog.is_finite() => Some((sog, cog)),
            _ => None,
        }
    }
}
