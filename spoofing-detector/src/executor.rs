use std::{
    num::NonZeroUsize,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
    thread::available_parallelism,
};

use ais_core::{AnomalyRecord, Fleet, VesselPartition};
use itertools::Itertools;
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use crate::TrajectoryRules;

static PROGRESS_INTERVAL: usize = 1000;

/// Runs [`TrajectoryRules`] over every vessel of a fleet on a pool of workers.
///
/// Vessels are grouped into batches of `batch_size` partitions, a batch being
/// the unit of work handed to a worker. The result does not depend on the
/// number of workers, the batch size or the order in which batches complete.
#[derive(Debug, Clone)]
pub struct FanoutExecutor {
    rules: Arc<TrajectoryRules>,
    num_workers: usize,
    batch_size: usize,
}

impl FanoutExecutor {
    /// `num_workers` of `None` uses the available parallelism of the host.
    pub fn new(rules: TrajectoryRules, num_workers: Option<usize>, batch_size: usize) -> Self {
        let num_workers = num_workers.unwrap_or_else(|| {
            available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });

        Self {
            rules: Arc::new(rules),
            num_workers: num_workers.max(1),
            batch_size: batch_size.max(1),
        }
    }

    pub fn rules(&self) -> &Arc<TrajectoryRules> {
        &self.rules
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[instrument(skip_all, fields(num_workers = self.num_workers, batch_size = self.batch_size))]
    pub async fn run(&self, fleet: &Fleet) -> Vec<AnomalyRecord> {
        let partitions = fleet.partitions();
        let num_partitions = partitions.len();

        let batches: Vec<Vec<VesselPartition>> = partitions
            .into_iter()
            .chunks(self.batch_size)
            .into_iter()
            .map(|c| c.collect())
            .collect();

        let len = batches.len();
        if len == 0 {
            return vec![];
        }

        let (worker_tx, worker_rx) = async_channel::bounded(len);
        let (master_tx, master_rx) = async_channel::bounded(len);

        let mut set = JoinSet::new();

        for _ in 0..self.num_workers.min(len) {
            let fleet = fleet.clone();
            let rules = self.rules.clone();
            let worker_rx = worker_rx.clone();
            let master_tx = master_tx.clone();

            set.spawn(async move {
                while let Ok((index, batch)) = worker_rx.recv().await {
                    let res = process_batch(fleet.clone(), rules.clone(), batch).await;
                    if master_tx.send((index, res)).await.is_err() {
                        break;
                    }
                }
            });
        }

        for (index, batch) in batches.into_iter().enumerate() {
            // The channel holds every batch and `worker_rx` is still in scope,
            // so this can neither block nor fail.
            if let Err(e) = worker_tx.try_send((index, batch)) {
                error!("failed to queue batch: {e:?}");
            }
        }

        drop(worker_rx);
        drop(worker_tx);
        drop(master_tx);

        let mut partials = Vec::with_capacity(len);
        let mut processed = 0;

        while let Ok((index, (num_vessels, records))) = master_rx.recv().await {
            let before = processed / PROGRESS_INTERVAL;
            processed += num_vessels;
            partials.push((index, records));

            if processed / PROGRESS_INTERVAL > before || processed == num_partitions {
                info!(
                    "processed {}/{} ({:.2}%)",
                    processed,
                    num_partitions,
                    processed as f64 * 100. / (num_partitions as f64),
                );
            }
        }

        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                error!("trajectory worker failed: {e:?}");
            }
        }

        partials.sort_unstable_by_key(|(index, _)| *index);
        merge_partials(partials.into_iter().map(|(_, records)| records))
    }
}

/// Runs a batch on the blocking pool. Panics are caught per vessel in
/// [`detect_batch`], a join error here only drops the batch if that fails.
async fn process_batch(
    fleet: Fleet,
    rules: Arc<TrajectoryRules>,
    batch: Vec<VesselPartition>,
) -> (usize, Vec<AnomalyRecord>) {
    let num_vessels = batch.len();
    let vessels = batch.iter().map(|p| p.mmsi()).join(", ");

    match tokio::task::spawn_blocking(move || detect_batch(&fleet, &rules, &batch)).await {
        Ok(records) => (num_vessels, records),
        Err(e) => {
            error!("failed to process batch with vessels [{vessels}]: {e:?}");
            (num_vessels, vec![])
        }
    }
}

/// Applies the rules to every partition of the batch, a partition that fails
/// or panics contributes nothing.
pub fn detect_batch(
    fleet: &Fleet,
    rules: &TrajectoryRules,
    batch: &[VesselPartition],
) -> Vec<AnomalyRecord> {
    let mut records = Vec::new();

    for partition in batch {
        match catch_unwind(AssertUnwindSafe(|| rules.detect_partition(fleet, partition))) {
            Ok(Ok(r)) => records.extend(r),
            Ok(Err(e)) => {
                error!("failed to process vessel '{}': {e:?}", partition.mmsi());
            }
            Err(e) => {
                let msg = e
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| e.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!("panicked while processing vessel '{}': {msg}", partition.mmsi());
            }
        }
    }

    records
}

/// Single-threaded equivalent of [`FanoutExecutor::run`].
#[instrument(skip_all)]
pub fn detect_sequential(fleet: &Fleet, rules: &TrajectoryRules) -> Vec<AnomalyRecord> {
    let partitions = fleet.partitions();
    merge_partials([detect_batch(fleet, rules, &partitions)])
}

/// Concatenates partial results and stable sorts them by vessel and timestamp.
pub fn merge_partials(
    partials: impl IntoIterator<Item = Vec<AnomalyRecord>>,
) -> Vec<AnomalyRecord> {
    let mut records: Vec<AnomalyRecord> = partials.into_iter().flatten().collect();
    records.sort_by_key(|r| r.key());
    records
}
