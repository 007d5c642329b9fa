use std::time::{Duration, Instant};

use ais_core::Fleet;
use snafu::ResultExt;
use tracing::{info, instrument};

use crate::{
    AnomalySummary, FanoutExecutor, Result, detect_sequential, error::error::JoinSnafu,
};

/// Timings of a sequential and a parallel trajectory run over the same fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub sequential: Duration,
    pub parallel: Duration,
    pub num_workers: usize,
    pub sequential_summary: AnomalySummary,
    pub parallel_summary: AnomalySummary,
    /// Whether both runs produced the exact same table.
    pub identical: bool,
}

impl BenchmarkReport {
    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.as_secs_f64();
        if parallel > 0. {
            self.sequential.as_secs_f64() / parallel
        } else {
            f64::INFINITY
        }
    }

    pub fn log(&self) {
        info!(
            "sequential: {:.3}s, {} anomalies across {} vessels",
            self.sequential.as_secs_f64(),
            self.sequential_summary.rows,
            self.sequential_summary.vessels,
        );
        info!(
            "parallel ({} workers): {:.3}s, {} anomalies across {} vessels",
            self.num_workers,
            self.parallel.as_secs_f64(),
            self.parallel_summary.rows,
            self.parallel_summary.vessels,
        );
        info!(
            "speedup: {:.2}x, identical results: {}",
            self.speedup(),
            self.identical
        );
    }
}

#[instrument(skip_all, fields(reports = fleet.len()))]
pub async fn run_benchmark(fleet: &Fleet, executor: &FanoutExecutor) -> Result<BenchmarkReport> {
    let rules = executor.rules().clone();

    let start = Instant::now();
    let sequential_records = {
        let fleet = fleet.clone();
        tokio::task::spawn_blocking(move || detect_sequential(&fleet, &rules))
            .await
            .context(JoinSnafu)?
    };
    let sequential = start.elapsed();

    let start = Instant::now();
    let parallel_records = executor.run(fleet).await;
    let parallel = start.elapsed();

    Ok(BenchmarkReport {
        sequential,
        parallel,
        num_workers: executor.num_workers(),
        sequential_summary: AnomalySummary::new(&sequential_records),
        parallel_summary: AnomalySummary::new(&parallel_records),
        identical: sequential_records == parallel_records,
    })
}
