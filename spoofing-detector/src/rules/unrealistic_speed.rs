use std::time::Duration;

use ais_core::{AnomalyRecord, MeasurementKind, SourceTag, Trajectory, distances_km};
use geoutils::Location;

use crate::{TrajectoryRule, elapsed_secs};

static SECONDS_PER_HOUR: f64 = 3600.0;

/// Flags reports that could only be reached from the previous one by moving
/// faster than any vessel can, or by jumping a long distance in a short time.
#[derive(Debug, Clone)]
pub struct UnrealisticSpeed {
    pub speed_limit_kmh: f64,
    pub jump_distance_km: f64,
    pub jump_window: Duration,
}

impl Default for UnrealisticSpeed {
    fn default() -> Self {
        UnrealisticSpeed {
            speed_limit_kmh: 100.0,
            jump_distance_km: 50.0,
            jump_window: Duration::from_secs(300),
        }
    }
}

/// Implied speed in km/h, `None` when no time has passed.
pub fn estimated_speed_kmh(distance_km: f64, elapsed_secs: f64) -> Option<f64> {
    (elapsed_secs > 0.0).then(|| distance_km / (elapsed_secs / SECONDS_PER_HOUR))
}

impl UnrealisticSpeed {
    pub fn is_unrealistic(&self, distance_km: f64, speed_kmh: f64, elapsed_secs: f64) -> bool {
        speed_kmh > self.speed_limit_kmh
            || (distance_km > self.jump_distance_km
                && elapsed_secs < self.jump_window.as_secs_f64())
    }
}

impl TrajectoryRule for UnrealisticSpeed {
    fn tag(&self) -> SourceTag {
        SourceTag::SpeedJump
    }

    fn evaluate(&self, trajectory: &Trajectory<'_>) -> Vec<(usize, AnomalyRecord)> {
        if trajectory.len() < 2 {
            return vec![];
        }

        let pairs: Vec<_> = trajectory.pairs().collect();
        let (from, to): (Vec<Location>, Vec<Location>) = pairs
            .iter()
            .map(|(_, previous, current)| (previous.location(), current.location()))
            .unzip();

        pairs
            .into_iter()
            .zip(distances_km(&from, &to))
            .filter_map(|((index, previous, current), distance)| {
                let elapsed = elapsed_secs(previous, current);
                let speed = estimated_speed_kmh(distance, elapsed)?;

                self.is_unrealistic(distance, speed, elapsed).then(|| {
                    let record = AnomalyRecord::new(current, self.tag())
                        .with_measurement(MeasurementKind::DistanceKm, distance)
                        .with_measurement(MeasurementKind::SpeedKmh, speed);
                    (index, record)
                })
            })
            .collect()
    }
}
