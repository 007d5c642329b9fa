use ais_core::{AnomalyRecord, Fleet};
use snafu::ResultExt;
use tracing::{info, instrument, warn};

use crate::{
    CollisionReport, CollisionScan, FanoutExecutor, ResultMerger, Result,
    error::error::CollisionTaskSnafu,
};

/// Runs both detection phases over a fleet and merges their output.
#[derive(Debug, Clone)]
pub struct Pipeline {
    executor: FanoutExecutor,
    collision: Option<CollisionScan>,
    merger: ResultMerger,
}

#[derive(Debug)]
pub struct DetectionOutcome {
    /// Trajectory anomalies ordered by vessel and timestamp.
    pub trajectory: Vec<AnomalyRecord>,
    /// `None` if the collision phase is disabled.
    pub collision: Option<Result<CollisionReport>>,
    pub merged: Vec<AnomalyRecord>,
}

impl Pipeline {
    pub fn new(
        executor: FanoutExecutor,
        collision: Option<CollisionScan>,
        merger: ResultMerger,
    ) -> Self {
        Self {
            executor,
            collision,
            merger,
        }
    }

    pub fn executor(&self) -> &FanoutExecutor {
        &self.executor
    }

    /// The collision phase runs on the blocking pool alongside the trajectory
    /// phase. Its failure is kept in the outcome and leaves the trajectory
    /// table untouched.
    #[instrument(skip_all, fields(reports = fleet.len()))]
    pub async fn run(&self, fleet: &Fleet) -> DetectionOutcome {
        let collision_task = self.collision.clone().map(|scan| {
            let fleet = fleet.clone();
            tokio::task::spawn_blocking(move || scan.scan(&fleet))
        });

        let trajectory = self.executor.run(fleet).await;
        info!("trajectory phase found {} anomalies", trajectory.len());

        let collision = match collision_task {
            Some(task) => Some(task.await.context(CollisionTaskSnafu).and_then(|r| r)),
            None => None,
        };

        let collision_records = match &collision {
            Some(Ok(report)) => report.output.records().to_vec(),
            Some(Err(e)) => {
                warn!("collision phase failed, merging trajectory anomalies only: {e:?}");
                vec![]
            }
            None => vec![],
        };

        let merged = self
            .merger
            .merge(trajectory.iter().cloned(), collision_records);

        DetectionOutcome {
            trajectory,
            collision,
            merged,
        }
    }
}
