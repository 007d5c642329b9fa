use std::{path::Path, time::Duration};

use ais_core::GridResolution;
use config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use snafu::ResultExt;

use crate::{
    CollisionMode, CollisionScan, FanoutExecutor, InconsistentMotion, Pipeline, Result,
    ResultMerger, TrajectoryRule, TrajectoryRules, UnrealisticSpeed,
    error::error::{CoreSnafu, SettingsSnafu},
};

static DEFAULT_SETTINGS: &str = include_str!("../config/default.yml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub trajectory: TrajectorySettings,
    pub collision: CollisionSettings,
    #[serde(default)]
    pub executor: ExecutorSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrajectorySettings {
    pub speed_limit_kmh: f64,
    pub jump_distance_km: f64,
    #[serde(with = "humantime_serde")]
    pub jump_window: Duration,
    pub sog_change_knots: f64,
    pub cog_change_degrees: f64,
    #[serde(with = "humantime_serde")]
    pub consistency_window: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollisionSettings {
    pub enabled: bool,
    #[serde(with = "humantime_serde")]
    pub time_window: Duration,
    pub coordinate_precision: u32,
    pub max_vessels: Option<usize>,
    #[serde(default)]
    pub mode: CollisionMode,
    pub max_cells: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorSettings {
    pub num_workers: Option<usize>,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSettings {
    pub min_anomalies_per_vessel: Option<usize>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            num_workers: None,
            batch_size: 1,
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl Settings {
    /// Layers the built-in defaults, the optional file at `path` and
    /// `SPOOFING_DETECTOR__*` environment variables, in that order.
    pub fn new(path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Yaml));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(config::Environment::with_prefix("SPOOFING_DETECTOR").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::new(path).context(SettingsSnafu)
    }

    pub fn trajectory_rules(&self) -> TrajectoryRules {
        let t = &self.trajectory;

        let unrealistic_speed = Box::new(UnrealisticSpeed {
            speed_limit_kmh: t.speed_limit_kmh,
            jump_distance_km: t.jump_distance_km,
            jump_window: t.jump_window,
        });
        let inconsistent_motion = Box::new(InconsistentMotion {
            sog_change_knots: t.sog_change_knots,
            cog_change_degrees: t.cog_change_degrees,
            window: t.consistency_window,
        });

        TrajectoryRules::new(vec![
            unrealistic_speed as Box<dyn TrajectoryRule>,
            inconsistent_motion as Box<dyn TrajectoryRule>,
        ])
    }

    pub fn collision_scan(&self) -> Result<Option<CollisionScan>> {
        let c = &self.collision;
        if !c.enabled {
            return Ok(None);
        }

        let resolution =
            GridResolution::new(c.time_window, c.coordinate_precision).context(CoreSnafu)?;

        Ok(Some(
            CollisionScan::new(resolution, c.max_vessels, c.mode).with_max_cells(c.max_cells),
        ))
    }

    pub fn executor(&self) -> FanoutExecutor {
        FanoutExecutor::new(
            self.trajectory_rules(),
            self.executor.num_workers,
            self.executor.batch_size,
        )
    }

    pub fn merger(&self) -> ResultMerger {
        ResultMerger::new(self.report.min_anomalies_per_vessel)
    }

    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(Pipeline::new(
            self.executor(),
            self.collision_scan()?,
            self.merger(),
        ))
    }
}
