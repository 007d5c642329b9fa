use std::{fs::File, io::Read, path::Path};

use ais_core::{Fleet, PositionReport};
use snafu::{ResultExt, ensure};
use tracing::{debug, info, instrument, warn};

use crate::{
    AisCsvRow, Result, RowRejection,
    error::error::{CsvSnafu, MissingColumnSnafu, OpenSnafu},
};

static REQUIRED_COLUMNS: &[&str] = &["MMSI", "Latitude", "Longitude"];
static TIMESTAMP_COLUMNS: &[&str] = &["# Timestamp", "Timestamp", "timestamp"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows: usize,
    pub base_stations: usize,
    pub missing_coordinates: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub fleet: Fleet,
    pub summary: LoadSummary,
}

impl LoadSummary {
    pub fn accepted(&self) -> usize {
        self.rows - self.base_stations - self.missing_coordinates - self.malformed
    }
}

#[instrument]
pub fn load_fleet(path: &Path) -> Result<LoadOutcome> {
    info!("loading AIS data...");
    let file = File::open(path).context(OpenSnafu { path })?;
    read_fleet(file)
}

/// Reads a cleaned fleet from csv data.
///
/// Base stations, rows without usable coordinates and rows that fail to parse
/// are skipped and counted. Reports are ordered by vessel and then timestamp,
/// keeping input order for equal timestamps.
pub fn read_fleet<R: Read>(source: R) -> Result<LoadOutcome> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context(CsvSnafu)?.clone();
    for column in REQUIRED_COLUMNS {
        ensure!(headers.iter().any(|h| h == *column), MissingColumnSnafu { column: *column });
    }
    ensure!(
        headers
            .iter()
            .any(|h| TIMESTAMP_COLUMNS.iter().any(|c| *c == h)),
        MissingColumnSnafu {
            column: TIMESTAMP_COLUMNS[0]
        }
    );

    let mut summary = LoadSummary::default();
    let mut reports = Vec::new();

    for row in reader.deserialize::<AisCsvRow>() {
        summary.rows += 1;

        let row = match row {
            Ok(v) => v,
            Err(e) if e.is_io_error() => return Err(e).context(CsvSnafu),
            Err(e) => {
                debug!("skipping malformed AIS row: {e}");
                summary.malformed += 1;
                continue;
            }
        };

        match PositionReport::try_from(row) {
            Ok(v) => reports.push(v),
            Err(RowRejection::BaseStation) => summary.base_stations += 1,
            Err(RowRejection::MissingCoordinates) => summary.missing_coordinates += 1,
            Err(RowRejection::InvalidTimestamp(v)) => {
                debug!("skipping AIS row with invalid timestamp: '{v}'");
                summary.malformed += 1;
            }
        }
    }

    if summary.malformed > 0 {
        warn!("skipped {} malformed AIS rows", summary.malformed);
    }

    reports.sort_by_key(|r| (r.mmsi, r.timestamp));

    let fleet = Fleet::new(reports);
    info!(
        "loaded {} AIS records across {} vessels",
        fleet.len(),
        fleet.num_vessels()
    );

    Ok(LoadOutcome { fleet, summary })
}
