use crate::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// 2025-03-14T00:00:00Z offset by `seconds`.
pub fn test_time(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap() + Duration::seconds(seconds)
}

impl PositionReport {
    pub fn test_new(mmsi: i32, seconds: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            mmsi: Mmsi::new(mmsi),
            timestamp: test_time(seconds),
            latitude,
            longitude,
            speed_over_ground: None,
            course_over_ground: None,
        }
    }

    pub fn with_kinematics(mut self, speed_over_ground: f64, course_over_ground: f64) -> Self {
        self.speed_over_ground = Some(speed_over_ground);
        self.course_over_ground = Some(course_over_ground);
        self
    }
}

#[derive(Debug, Default)]
pub struct FleetBuilder {
    reports: Vec<PositionReport>,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(mut self, report: PositionReport) -> Self {
        self.reports.push(report);
        self
    }

    /// Adds one report per position, `interval` seconds apart starting at `start`.
    pub fn track(mut self, mmsi: i32, start: i64, interval: i64, positions: &[(f64, f64)]) -> Self {
        for (i, (lat, lon)) in positions.iter().enumerate() {
            self.reports.push(PositionReport::test_new(
                mmsi,
                start + interval * i as i64,
                *lat,
                *lon,
            ));
        }
        self
    }

    pub fn build(self) -> Fleet {
        Fleet::new(self.reports)
    }
}

/// A reproducible fleet with widely varying report counts per vessel, missing
/// kinematics, duplicate timestamps, occasional teleports and shared cells,
/// shuffled so vessels are interleaved.
pub fn random_fleet(seed: u64, num_vessels: usize, max_reports: usize) -> Fleet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::new();

    for v in 0..num_vessels {
        let mmsi = 219_000_000 + v as i32;
        let num_reports = if rng.random_bool(0.2) {
            rng.random_range(0..3)
        } else {
            rng.random_range(1..=max_reports.max(1))
        };

        let mut lat = rng.random_range(54.0..58.0);
        let mut lon = rng.random_range(8.0..13.0);
        let mut seconds = rng.random_range(0..600);

        for _ in 0..num_reports {
            if rng.random_bool(0.05) {
                lat += rng.random_range(-1.0..1.0);
                lon += rng.random_range(-1.0..1.0);
            } else {
                lat += rng.random_range(-0.001..0.001);
                lon += rng.random_range(-0.001..0.001);
            }

            if !rng.random_bool(0.05) {
                seconds += rng.random_range(1..180);
            }

            let mut report = PositionReport::test_new(mmsi, seconds, lat, lon);
            if rng.random_bool(0.8) {
                report = report.with_kinematics(
                    rng.random_range(0.0..30.0),
                    rng.random_range(0.0..360.0),
                );
            }
            reports.push(report);
        }
    }

    if let Some(first) = reports.first().cloned() {
        for mmsi in 0..3 {
            let mut shared = first.clone();
            shared.mmsi = Mmsi::new(218_000_000 + mmsi);
            reports.push(shared);
        }
    }

    reports.shuffle(&mut rng);
    Fleet::new(reports)
}
