use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use crate::{Mmsi, PositionReport};

/// The detection rule that flagged a report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceTag {
    SpeedJump,
    CourseJump,
    Collision,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeasurementKind {
    DistanceKm,
    SpeedKmh,
    SogChange,
    CogChange,
    ConflictVesselCount,
}

/// The set of rules that flagged a report, rendered as `speed_jump+collision`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Provenance(BTreeSet<SourceTag>);

/// A position report flagged as a spoofing candidate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnomalyRecord {
    pub mmsi: Mmsi,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    provenance: Provenance,
    measurements: BTreeMap<MeasurementKind, f64>,
}

impl Provenance {
    pub fn single(tag: SourceTag) -> Self {
        Self(BTreeSet::from([tag]))
    }

    pub fn contains(&self, tag: SourceTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = SourceTag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(mut self, other: Provenance) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(tag.as_ref())?;
        }
        Ok(())
    }
}

impl FromIterator<SourceTag> for Provenance {
    fn from_iter<T: IntoIterator<Item = SourceTag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl AnomalyRecord {
    pub fn new(report: &PositionReport, tag: SourceTag) -> Self {
        Self {
            mmsi: report.mmsi,
            timestamp: report.timestamp,
            latitude: report.latitude,
            longitude: report.longitude,
            provenance: Provenance::single(tag),
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_measurement(mut self, kind: MeasurementKind, value: f64) -> Self {
        self.measurements.insert(kind, value);
        self
    }

    pub fn key(&self) -> (Mmsi, DateTime<Utc>) {
        (self.mmsi, self.timestamp)
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn measurements(&self) -> &BTreeMap<MeasurementKind, f64> {
        &self.measurements
    }

    pub fn measurement(&self, kind: MeasurementKind) -> Option<f64> {
        self.measurements.get(&kind).copied()
    }

    /// Combines two records of the same report into one carrying the union of
    /// both provenance tags and measurements. Measurements already present on
    /// `self` take precedence.
    pub fn merge(mut self, other: AnomalyRecord) -> Self {
        debug_assert_eq!(self.key(), other.key());

        self.provenance = self.provenance.union(other.provenance);
        for (kind, value) in other.measurements {
            self.measurements.entry(kind).or_insert(value);
        }
        self
    }
}
