use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use ais_core::{AnomalyRecord, MeasurementKind, SourceTag};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use snafu::ResultExt;
use tracing::{info, instrument};

use crate::{
    Result,
    error::error::{CsvReportSnafu, IoSnafu, JsonReportSnafu},
};

/// A flat, stable-column view of an [`AnomalyRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRow {
    pub mmsi: i32,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub source: String,
    pub distance_km: Option<f64>,
    pub speed_kmh: Option<f64>,
    pub sog_change: Option<f64>,
    pub cog_change: Option<f64>,
    pub conflict_vessel_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnomalySummary {
    pub rows: usize,
    pub vessels: usize,
    pub by_source: BTreeMap<SourceTag, usize>,
}

impl From<&AnomalyRecord> for AnomalyRow {
    fn from(value: &AnomalyRecord) -> Self {
        Self {
            mmsi: value.mmsi.into_inner(),
            timestamp: value.timestamp,
            latitude: value.latitude,
            longitude: value.longitude,
            source: value.provenance().to_string(),
            distance_km: value.measurement(MeasurementKind::DistanceKm),
            speed_kmh: value.measurement(MeasurementKind::SpeedKmh),
            sog_change: value.measurement(MeasurementKind::SogChange),
            cog_change: value.measurement(MeasurementKind::CogChange),
            conflict_vessel_count: value.measurement(MeasurementKind::ConflictVesselCount),
        }
    }
}

impl AnomalySummary {
    pub fn new(records: &[AnomalyRecord]) -> Self {
        let mut by_source = BTreeMap::new();
        for tag in records.iter().flat_map(|r| r.provenance().iter()) {
            *by_source.entry(tag).or_insert(0) += 1;
        }

        Self {
            rows: records.len(),
            vessels: records.iter().map(|r| r.mmsi).unique().count(),
            by_source,
        }
    }

    pub fn log(&self, label: &str) {
        let by_source = self
            .by_source
            .iter()
            .map(|(tag, n)| format!("{tag}: {n}"))
            .join(", ");

        info!(
            "{label}: {} anomalies across {} vessels [{by_source}]",
            self.rows, self.vessels
        );
    }
}

/// Writes `records` to `path` as JSON lines if the path ends in `.json`,
/// as CSV otherwise.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn write_report(path: &Path, records: &[AnomalyRecord]) -> Result<()> {
    let file = File::create(path).context(IoSnafu { path })?;
    let writer = BufWriter::new(file);

    let is_json = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        write_json_lines(writer, path, records)
    } else {
        write_csv(writer, path, records)
    }
}

pub fn write_csv<W: Write>(writer: W, path: &Path, records: &[AnomalyRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer
            .serialize(AnomalyRow::from(record))
            .context(CsvReportSnafu { path })?;
    }
    writer.flush().context(IoSnafu { path })
}

pub fn write_json_lines<W: Write>(
    mut writer: W,
    path: &Path,
    records: &[AnomalyRecord],
) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, &AnomalyRow::from(record))
            .context(JsonReportSnafu { path })?;
        writer.write_all(b"\n").context(IoSnafu { path })?;
    }
    writer.flush().context(IoSnafu { path })
}
