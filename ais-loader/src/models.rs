use ais_core::{Mmsi, PositionReport};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// Timestamp layout of the Danish Maritime Authority AIS exports.
pub static DMA_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

static BASE_STATION: &str = "Base Station";

/// One row of an AIS csv export, unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AisCsvRow {
    #[serde(rename = "# Timestamp", alias = "Timestamp", alias = "timestamp")]
    pub timestamp: String,
    #[serde(rename = "Type of mobile", default)]
    pub type_of_mobile: Option<String>,
    #[serde(rename = "MMSI")]
    pub mmsi: Mmsi,
    #[serde(rename = "Latitude", default, deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default, deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "SOG", default, deserialize_with = "csv::invalid_option")]
    pub speed_over_ground: Option<f64>,
    #[serde(rename = "COG", default, deserialize_with = "csv::invalid_option")]
    pub course_over_ground: Option<f64>,
}

/// Why a row did not become a [`PositionReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    BaseStation,
    MissingCoordinates,
    InvalidTimestamp(String),
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DMA_TIMESTAMP_FORMAT)
        .map(|v| v.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|v| v.with_timezone(&Utc)))
        .ok()
}

impl TryFrom<AisCsvRow> for PositionReport {
    type Error = RowRejection;

    fn try_from(row: AisCsvRow) -> Result<Self, Self::Error> {
        let AisCsvRow {
            timestamp,
            type_of_mobile,
            mmsi,
            latitude,
            longitude,
            speed_over_ground,
            course_over_ground,
        } = row;

        if type_of_mobile.as_deref().map(str::trim) == Some(BASE_STATION) {
            return Err(RowRejection::BaseStation);
        }

        // AIS uses 91/181 as "not available", those fall outside the valid range.
        let (latitude, longitude) = match (latitude, longitude) {
            (Some(lat), Some(lon))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) =>
            {
                (lat, lon)
            }
            _ => return Err(RowRejection::MissingCoordinates),
        };

        let Some(timestamp) = parse_timestamp(&timestamp) else {
            return Err(RowRejection::InvalidTimestamp(timestamp));
        };

        Ok(PositionReport {
            mmsi,
            timestamp,
            latitude,
            longitude,
            speed_over_ground,
            course_over_ground,
        })
    }
}
