use std::{collections::BTreeMap, fmt::Debug};

use ais_core::{AnomalyRecord, Fleet, PositionReport, SourceTag, Trajectory, VesselPartition};
use tracing::debug;

mod inconsistent_motion;
mod unrealistic_speed;

pub use inconsistent_motion::*;
pub use unrealistic_speed::*;

/// A check over consecutive reports of a single vessel.
pub trait TrajectoryRule: Debug + Send + Sync + 'static {
    fn tag(&self) -> SourceTag;

    /// Flagged reports along with their index in the trajectory.
    fn evaluate(&self, trajectory: &Trajectory<'_>) -> Vec<(usize, AnomalyRecord)>;
}

/// The set of rules applied to every vessel.
#[derive(Debug)]
pub struct TrajectoryRules {
    rules: Vec<Box<dyn TrajectoryRule>>,
}

impl Default for TrajectoryRules {
    fn default() -> Self {
        let unrealistic_speed = Box::<UnrealisticSpeed>::default();
        let inconsistent_motion = Box::<InconsistentMotion>::default();

        Self::new(vec![
            unrealistic_speed as Box<dyn TrajectoryRule>,
            inconsistent_motion as Box<dyn TrajectoryRule>,
        ])
    }
}

impl TrajectoryRules {
    pub fn new(rules: Vec<Box<dyn TrajectoryRule>>) -> Self {
        Self { rules }
    }

    /// Runs every rule and folds records flagging the same report into one.
    /// Records are returned in trajectory order.
    pub fn detect(&self, trajectory: &Trajectory<'_>) -> Vec<AnomalyRecord> {
        let mut flagged: BTreeMap<usize, AnomalyRecord> = BTreeMap::new();

        for rule in &self.rules {
            for (index, record) in rule.evaluate(trajectory) {
                let record = match flagged.remove(&index) {
                    Some(existing) => existing.merge(record),
                    None => record,
                };
                flagged.insert(index, record);
            }
        }

        flagged.into_values().collect()
    }

    pub fn detect_partition(
        &self,
        fleet: &Fleet,
        partition: &VesselPartition,
    ) -> ais_core::Result<Vec<AnomalyRecord>> {
        let trajectory = fleet.trajectory(partition)?;
        if trajectory.num_skipped() > 0 {
            debug!(
                "skipped {} reports without coordinates for vessel '{}'",
                trajectory.num_skipped(),
                trajectory.mmsi()
            );
        }
        Ok(self.detect(&trajectory))
    }
}

/// Seconds from `previous` to `current`, negative if out of order.
pub fn elapsed_secs(previous: &PositionReport, current: &PositionReport) -> f64 {
    (current.timestamp - previous.timestamp).num_milliseconds() as f64 / 1000.0
}
