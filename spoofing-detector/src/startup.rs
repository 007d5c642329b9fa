use std::path::{Path, PathBuf};

use ais_core::Fleet;
use ais_loader::{LoadOutcome, load_fleet};
use snafu::ResultExt;
use tracing::{info, warn};

use crate::{
    AnomalySummary, BenchmarkReport, CollisionOutput, DetectionOutcome, Pipeline, Result,
    error::error::{JoinSnafu, LoaderSnafu},
    rank_vessels, run_benchmark,
    settings::Settings,
    write_report,
};

static TOP_VESSELS: usize = 10;

pub struct App {
    pipeline: Pipeline,
}

impl App {
    pub fn build(settings: Settings) -> Result<Self> {
        Ok(Self {
            pipeline: settings.pipeline()?,
        })
    }

    /// Loads `input`, runs both detection phases and writes the merged table
    /// to `output` if given.
    pub async fn detect(&self, input: &Path, output: Option<&Path>) -> Result<DetectionOutcome> {
        let fleet = load(input).await?;
        let outcome = self.pipeline.run(&fleet).await;

        AnomalySummary::new(&outcome.trajectory).log("trajectory rules");

        match &outcome.collision {
            Some(Ok(report)) => {
                if let CollisionOutput::Records(records) = &report.output {
                    AnomalySummary::new(records).log("collision scan");
                }
                info!(
                    "collision scan: {} vessels in conflicting cells",
                    report.vessels.len()
                );
            }
            Some(Err(_)) => warn!("collision scan produced no output"),
            None => info!("collision scan disabled"),
        }

        AnomalySummary::new(&outcome.merged).log("merged");

        for (mmsi, count) in rank_vessels(&outcome.merged).into_iter().take(TOP_VESSELS) {
            info!("vessel '{mmsi}': {count} anomalies");
        }

        if let Some(output) = output {
            write_report(output, &outcome.merged)?;
            info!("wrote {} rows to '{}'", outcome.merged.len(), output.display());
        }

        Ok(outcome)
    }

    pub async fn benchmark(&self, input: &Path) -> Result<BenchmarkReport> {
        let fleet = load(input).await?;
        let report = run_benchmark(&fleet, self.pipeline.executor()).await?;
        report.log();
        Ok(report)
    }
}

async fn load(input: &Path) -> Result<Fleet> {
    let path = PathBuf::from(input);
    let LoadOutcome { fleet, summary } = tokio::task::spawn_blocking(move || load_fleet(&path))
        .await
        .context(JoinSnafu)?
        .context(LoaderSnafu)?;

    info!(
        "accepted {}/{} rows, base stations: {}, missing coordinates: {}, malformed: {}",
        summary.accepted(),
        summary.rows,
        summary.base_stations,
        summary.missing_coordinates,
        summary.malformed,
    );

    Ok(fleet)
}
