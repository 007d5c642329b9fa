use std::collections::BTreeMap;

use ais_core::{AnomalyRecord, Mmsi};
use itertools::Itertools;
use tracing::debug;

/// Folds the trajectory and collision tables into one row per report.
#[derive(Debug, Clone, Default)]
pub struct ResultMerger {
    min_anomalies_per_vessel: Option<usize>,
}

impl ResultMerger {
    /// Vessels with fewer than `min_anomalies_per_vessel` rows are dropped
    /// from the merged table.
    pub fn new(min_anomalies_per_vessel: Option<usize>) -> Self {
        Self {
            min_anomalies_per_vessel,
        }
    }

    pub fn min_anomalies_per_vessel(&self) -> Option<usize> {
        self.min_anomalies_per_vessel
    }

    /// Deduplicates by vessel and timestamp, a report found by several sources
    /// keeps the union of their provenance and measurements. The result is
    /// ordered by vessel and timestamp.
    pub fn merge(
        &self,
        trajectory: impl IntoIterator<Item = AnomalyRecord>,
        collision: impl IntoIterator<Item = AnomalyRecord>,
    ) -> Vec<AnomalyRecord> {
        let mut merged: BTreeMap<_, AnomalyRecord> = BTreeMap::new();

        for record in trajectory.into_iter().chain(collision) {
            let key = record.key();
            let record = match merged.remove(&key) {
                Some(existing) => existing.merge(record),
                None => record,
            };
            merged.insert(key, record);
        }

        self.apply_threshold(merged.into_values().collect())
    }

    /// Keeps only vessels with at least the configured number of rows.
    pub fn apply_threshold(&self, records: Vec<AnomalyRecord>) -> Vec<AnomalyRecord> {
        let Some(min) = self.min_anomalies_per_vessel else {
            return records;
        };

        let counts = records.iter().counts_by(|r| r.mmsi);
        let before = records.len();

        let records: Vec<AnomalyRecord> = records
            .into_iter()
            .filter(|r| counts.get(&r.mmsi).is_some_and(|n| *n >= min))
            .collect();

        debug!(
            "vessel threshold {min} kept {}/{} rows",
            records.len(),
            before
        );

        records
    }
}

/// Vessels by number of anomaly rows, most anomalous first.
pub fn rank_vessels(records: &[AnomalyRecord]) -> Vec<(Mmsi, usize)> {
    records
        .iter()
        .counts_by(|r| r.mmsi)
        .into_iter()
        .sorted_by(|(a_mmsi, a), (b_mmsi, b)| b.cmp(a).then(a_mmsi.cmp(b_mmsi)))
        .collect()
}
