use std::{collections::BTreeSet, time::Duration};

use ais_core::{FleetBuilder, GridResolution, MeasurementKind, Mmsi, PositionReport, random_fleet};
use spoofing_detector::{CollisionMode, CollisionOutput, CollisionScan, Error};

fn scan(max_vessels: Option<usize>, mode: CollisionMode) -> CollisionScan {
    let resolution = GridResolution::new(Duration::from_secs(120), 3).unwrap();
    CollisionScan::new(resolution, max_vessels, mode)
}

/// `num_vessels` distinct vessels reporting the same position at the same time.
fn crowd(builder: FleetBuilder, first_mmsi: i32, num_vessels: i32, lat: f64) -> FleetBuilder {
    (0..num_vessels).fold(builder, |b, i| {
        b.report(PositionReport::test_new(first_mmsi + i, 30, lat, 10.0))
    })
}

#[test]
fn test_cell_at_occupancy_bound_is_included_and_above_is_excluded() {
    let mut builder = FleetBuilder::new();
    builder = crowd(builder, 100, 1, 55.0);
    builder = crowd(builder, 200, 15, 56.0);
    builder = crowd(builder, 300, 16, 57.0);
    let fleet = builder.build();

    let report = scan(Some(15), CollisionMode::IdentifiersOnly)
        .scan(&fleet)
        .unwrap();

    let expected: BTreeSet<Mmsi> = (200..215).map(Mmsi::new).collect();
    assert_eq!(report.output, CollisionOutput::Identifiers(expected));
    assert_eq!(report.summary.included_cells, 1);
    assert_eq!(report.summary.skipped_cells, 2);
}

#[test]
fn test_modes_agree_on_conflicting_vessels() {
    let fleet = random_fleet(5, 150, 30);

    let identifiers = scan(Some(15), CollisionMode::IdentifiersOnly)
        .scan(&fleet)
        .unwrap();
    let representative = scan(Some(15), CollisionMode::Representative)
        .scan(&fleet)
        .unwrap();
    let exhaustive = scan(Some(15), CollisionMode::Exhaustive)
        .scan(&fleet)
        .unwrap();

    assert!(!identifiers.vessels.is_empty());
    assert_eq!(identifiers.vessels, exhaustive.vessels);
    assert_eq!(representative.vessels, exhaustive.vessels);
    assert_eq!(
        identifiers.output,
        CollisionOutput::Identifiers(exhaustive.vessels.clone())
    );
    assert!(
        representative
            .output
            .records()
            .iter()
            .all(|r| representative.vessels.contains(&r.mmsi))
    );

    assert_eq!(
        representative.output.records().len(),
        representative.summary.included_cells
    );
    assert!(exhaustive.output.records().len() >= 2 * exhaustive.summary.included_cells);
    assert_eq!(identifiers.summary.included_cells, exhaustive.summary.included_cells);
}

#[test]
fn test_unbounded_exhaustive_scan_covers_capped_scan() {
    let mut builder = FleetBuilder::new();
    builder = crowd(builder, 100, 2, 55.0);
    builder = crowd(builder, 200, 20, 56.0);
    let fleet = builder.build();

    let capped = scan(Some(15), CollisionMode::Exhaustive).scan(&fleet).unwrap();
    let unbounded = scan(None, CollisionMode::Exhaustive).scan(&fleet).unwrap();

    assert_eq!(capped.output.records().len(), 2);
    assert_eq!(unbounded.output.records().len(), 22);
    assert!(
        unbounded
            .output
            .records()
            .iter()
            .filter(|r| r.latitude == 56.0)
            .all(|r| r.measurement(MeasurementKind::ConflictVesselCount) == Some(20.0))
    );
}

#[test]
fn test_nearby_reports_share_a_cell() {
    // 0.0003 degrees apart rounds to the same 3 decimal cell, 40 seconds apart
    // rounds to the same 2 minute bucket.
    let fleet = FleetBuilder::new()
        .report(PositionReport::test_new(1, 130, 55.0001, 10.0001))
        .report(PositionReport::test_new(2, 170, 55.0004, 10.0004))
        .build();

    let report = scan(Some(15), CollisionMode::Exhaustive).scan(&fleet).unwrap();

    assert_eq!(report.output.records().len(), 2);
}

#[test]
fn test_cell_limit_is_a_recoverable_failure() {
    let fleet = random_fleet(9, 50, 20);

    let err = scan(Some(15), CollisionMode::Representative)
        .with_max_cells(Some(10))
        .scan(&fleet)
        .unwrap_err();

    assert!(matches!(err, Error::CollisionCellLimit { limit: 10, .. }));
}

#[test]
fn test_empty_fleet_has_no_conflicts() {
    let report = scan(Some(15), CollisionMode::Exhaustive)
        .scan(&FleetBuilder::new().build())
        .unwrap();

    assert!(report.output.records().is_empty());
    assert_eq!(report.summary.included_cells, 0);
}
