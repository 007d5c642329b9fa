use std::time::Duration;

use ais_core::{AnomalyRecord, MeasurementKind, SourceTag, Trajectory};

use crate::{TrajectoryRule, elapsed_secs};

/// Flags reports whose reported speed or course changed more than a vessel
/// can manage within a short time.
#[derive(Debug, Clone)]
pub struct InconsistentMotion {
    pub sog_change_knots: f64,
    pub cog_change_degrees: f64,
    pub window: Duration,
}

impl Default for InconsistentMotion {
    fn default() -> Self {
        InconsistentMotion {
            sog_change_knots: 15.0,
            cog_change_degrees: 90.0,
            window: Duration::from_secs(120),
        }
    }
}

/// Smallest angle between two courses, 359 -> 1 is a 2 degree turn.
pub fn course_change(previous: f64, current: f64) -> f64 {
    let delta = (current - previous).abs() % 360.0;
    if delta > 180.0 { 360.0 - delta } else { delta }
}

impl TrajectoryRule for InconsistentMotion {
    fn tag(&self) -> SourceTag {
        SourceTag::CourseJump
    }

    fn evaluate(&self, trajectory: &Trajectory<'_>) -> Vec<(usize, AnomalyRecord)> {
        if trajectory.len() < 3 {
            return vec![];
        }

        let window = self.window.as_secs_f64();

        trajectory
            .pairs()
            .filter_map(|(index, previous, current)| {
                let (previous_sog, previous_cog) = previous.kinematics()?;
                let (current_sog, current_cog) = current.kinematics()?;

                let elapsed = elapsed_secs(previous, current);
                if elapsed <= 0.0 || elapsed >= window {
                    return None;
                }

                let sog_change = (current_sog - previous_sog).abs();
                let cog_change = course_change(previous_cog, current_cog);

                (sog_change > self.sog_change_knots || cog_change > self.cog_change_degrees).then(
                    || {
                        let record = AnomalyRecord::new(current, self.tag())
                            .with_measurement(MeasurementKind::SogChange, sog_change)
                            .with_measurement(MeasurementKind::CogChange, cog_change);
                        (index, record)
                    },
                )
            })
            .collect()
    }
}
