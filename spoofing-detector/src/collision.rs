use std::collections::{BTreeSet, HashMap, HashSet};

use ais_core::{
    AnomalyRecord, Fleet, GridCell, GridResolution, MeasurementKind, Mmsi, PositionReport,
    SourceTag,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use snafu::ensure;
use strum::{AsRefStr, EnumString};
use tracing::{info, instrument};

use crate::{Result, error::error::CollisionCellLimitSnafu};

/// What a collision scan emits for each conflicting cell.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CollisionMode {
    /// Only the identifiers of vessels in conflicting cells.
    IdentifiersOnly,
    /// One record per conflicting cell.
    #[default]
    Representative,
    /// One record per report inside a conflicting cell.
    Exhaustive,
}

/// Finds distinct vessels reporting the same place at the same time.
#[derive(Debug, Clone)]
pub struct CollisionScan {
    resolution: GridResolution,
    max_vessels: Option<usize>,
    mode: CollisionMode,
    max_cells: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutput {
    Identifiers(BTreeSet<Mmsi>),
    Records(Vec<AnomalyRecord>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionSummary {
    pub included_cells: usize,
    pub skipped_cells: usize,
    pub conflict_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionReport {
    pub output: CollisionOutput,
    /// Every vessel occupying a conflicting cell, regardless of mode.
    pub vessels: BTreeSet<Mmsi>,
    pub summary: CollisionSummary,
}

impl CollisionOutput {
    /// Records for the merge step, identifiers carry none.
    pub fn records(&self) -> &[AnomalyRecord] {
        match self {
            CollisionOutput::Identifiers(_) => &[],
            CollisionOutput::Records(records) => records,
        }
    }
}

impl CollisionScan {
    /// `max_vessels` of `None` treats every cell with more than one vessel as
    /// a conflict, no matter how crowded.
    pub fn new(resolution: GridResolution, max_vessels: Option<usize>, mode: CollisionMode) -> Self {
        Self {
            resolution,
            max_vessels,
            mode,
            max_cells: None,
        }
    }

    /// Fails the scan instead of tracking more than `max_cells` cells.
    pub fn with_max_cells(mut self, max_cells: Option<usize>) -> Self {
        self.max_cells = max_cells;
        self
    }

    #[instrument(skip_all)]
    pub fn scan(&self, fleet: &Fleet) -> Result<CollisionReport> {
        let reports = fleet.reports();

        let mut cells: HashMap<GridCell, Vec<usize>> = HashMap::new();
        for (i, report) in reports.iter().enumerate() {
            let Some(cell) = GridCell::new(report, &self.resolution) else {
                continue;
            };
            cells.entry(cell).or_default().push(i);

            if let Some(limit) = self.max_cells {
                ensure!(
                    cells.len() <= limit,
                    CollisionCellLimitSnafu {
                        cells: cells.len(),
                        limit,
                    }
                );
            }
        }

        let mut summary = CollisionSummary::default();
        let mut vessels = BTreeSet::new();
        let mut records = Vec::new();

        for (_, indices) in cells
            .into_iter()
            .sorted_unstable_by_key(|(cell, _)| *cell)
        {
            let num_vessels = self.distinct_vessels(reports, &indices);
            if !self.is_conflict(num_vessels) {
                summary.skipped_cells += 1;
                continue;
            }
            summary.included_cells += 1;

            let conflict = |report: &PositionReport| {
                AnomalyRecord::new(report, SourceTag::Collision)
                    .with_measurement(MeasurementKind::ConflictVesselCount, num_vessels as f64)
            };

            vessels.extend(indices.iter().map(|i| reports[*i].mmsi));

            match self.mode {
                CollisionMode::IdentifiersOnly => {}
                CollisionMode::Representative => {
                    records.push(conflict(&reports[indices[0]]));
                }
                CollisionMode::Exhaustive => {
                    records.extend(indices.iter().map(|i| conflict(&reports[*i])));
                }
            }
        }

        summary.conflict_rows = records.len();

        info!(
            included_cells = summary.included_cells,
            skipped_cells = summary.skipped_cells,
            conflict_rows = summary.conflict_rows,
            mode = %self.mode,
            "collision scan done"
        );

        let output = match self.mode {
            CollisionMode::IdentifiersOnly => CollisionOutput::Identifiers(vessels.clone()),
            CollisionMode::Representative | CollisionMode::Exhaustive => {
                CollisionOutput::Records(records)
            }
        };

        Ok(CollisionReport {
            output,
            vessels,
            summary,
        })
    }

    pub fn is_conflict(&self, num_vessels: usize) -> bool {
        num_vessels > 1 && self.max_vessels.is_none_or(|max| num_vessels <= max)
    }

    /// Stops counting once the occupancy bound is exceeded.
    fn distinct_vessels(&self, reports: &[PositionReport], indices: &[usize]) -> usize {
        let mut seen = HashSet::new();
        for i in indices {
            seen.insert(reports[*i].mmsi);
            if self.max_vessels.is_some_and(|max| seen.len() > max) {
                break;
            }
        }
        seen.len()
    }
}
