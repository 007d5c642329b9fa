use std::sync::Arc;

use itertools::Itertools;
use snafu::ensure;

use crate::{
    Mmsi, PositionReport, Result,
    error::error::{InvalidCoordinateSnafu, MixedVesselsSnafu},
};

/// The full, read-only set of position reports under analysis.
///
/// Cloning a `Fleet` is cheap, all clones share the same report storage.
#[derive(Debug, Clone)]
pub struct Fleet {
    reports: Arc<[PositionReport]>,
}

/// The reports of a single vessel, referenced by their index into a [`Fleet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VesselPartition {
    mmsi: Mmsi,
    indices: Vec<usize>,
}

/// A single vessel's reports ordered by timestamp.
///
/// Reports sharing a timestamp keep their input order.
#[derive(Debug, Clone)]
pub struct Trajectory<'a> {
    mmsi: Mmsi,
    reports: Vec<&'a PositionReport>,
    num_skipped: usize,
}

impl Fleet {
    pub fn new(reports: Vec<PositionReport>) -> Self {
        Self {
            reports: reports.into(),
        }
    }

    pub fn reports(&self) -> &[PositionReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn num_vessels(&self) -> usize {
        self.reports.iter().map(|r| r.mmsi).unique().count()
    }

    /// Splits the fleet into one disjoint partition per vessel, ordered by
    /// vessel identifier. Indices within a partition keep input order.
    pub fn partitions(&self) -> Vec<VesselPartition> {
        self.reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.mmsi, i))
            .into_group_map()
            .into_iter()
            .sorted_unstable_by_key(|(mmsi, _)| *mmsi)
            .map(|(mmsi, indices)| VesselPartition { mmsi, indices })
            .collect()
    }

    pub fn trajectory(&self, partition: &VesselPartition) -> Result<Trajectory<'_>> {
        Trajectory::new(
            partition.mmsi,
            partition.indices.iter().map(|i| &self.reports[*i]),
        )
    }
}

impl From<Vec<PositionReport>> for Fleet {
    fn from(value: Vec<PositionReport>) -> Self {
        Self::new(value)
    }
}

impl VesselPartition {
    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<'a> Trajectory<'a> {
    /// Builds a trajectory, re-sorting the reports by timestamp even if the
    /// caller already did so.
    ///
    /// Reports missing a coordinate (NaN or infinite) are left out and counted
    /// in [`Trajectory::num_skipped`], their neighbours are paired directly.
    /// Fails if any report belongs to another vessel or carries a coordinate
    /// outside the valid range.
    pub fn new(mmsi: Mmsi, reports: impl IntoIterator<Item = &'a PositionReport>) -> Result<Self> {
        let mut kept = Vec::new();
        let mut num_skipped = 0;

        for r in reports {
            ensure!(
                r.mmsi == mmsi,
                MixedVesselsSnafu {
                    expected: mmsi,
                    found: r.mmsi,
                }
            );

            if !r.latitude.is_finite() || !r.longitude.is_finite() {
                num_skipped += 1;
                continue;
            }

            ensure!(
                r.has_valid_coordinates(),
                InvalidCoordinateSnafu {
                    mmsi,
                    timestamp: r.timestamp,
                    latitude: r.latitude,
                    longitude: r.longitude,
                }
            );
            kept.push(r);
        }

        kept.sort_by_key(|r| r.timestamp);

        Ok(Self {
            mmsi,
            reports: kept,
            num_skipped,
        })
    }

    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn reports(&self) -> &[&'a PositionReport] {
        &self.reports
    }

    pub fn num_skipped(&self) -> usize {
        self.num_skipped
    }

    /// Consecutive `(previous, current)` pairs along with the index of `current`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, &'a PositionReport, &'a PositionReport)> + '_ {
        self.reports
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i + 1, w[0], w[1]))
    }
}
