use ais_core::{AnomalyRecord, MeasurementKind, PositionReport, SourceTag};
use spoofing_detector::{AnomalySummary, Error, write_report};

use crate::helper::TempFile;

fn records() -> Vec<AnomalyRecord> {
    vec![
        AnomalyRecord::new(
            &PositionReport::test_new(219000001, 60, 1.0, 0.0),
            SourceTag::SpeedJump,
        )
        .with_measurement(MeasurementKind::DistanceKm, 111.19)
        .with_measurement(MeasurementKind::SpeedKmh, 6671.7),
        AnomalyRecord::new(
            &PositionReport::test_new(219000002, 30, 55.0, 10.0),
            SourceTag::Collision,
        )
        .with_measurement(MeasurementKind::ConflictVesselCount, 3.0),
    ]
}

#[test]
fn test_csv_report_is_written_to_disk() {
    let file = TempFile::new("report.csv");

    write_report(file.path(), &records()).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("mmsi"));
    assert_eq!(headers.get(4), Some("source"));
    assert_eq!(headers.len(), 10);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "219000001");
    assert_eq!(&rows[0][4], "speed_jump");
    assert_eq!(&rows[0][9], "");
    assert_eq!(&rows[1][4], "collision");
    assert_eq!(&rows[1][9], "3.0");
}

#[test]
fn test_json_extension_writes_json_lines() {
    let file = TempFile::new("report.json");

    write_report(file.path(), &records()).unwrap();

    let content = std::fs::read_to_string(file.path()).unwrap();
    let rows: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["mmsi"], 219000001);
    assert_eq!(rows[0]["timestamp"], "2025-03-14T00:01:00Z");
    assert_eq!(rows[1]["conflict_vessel_count"], 3.0);
}

#[test]
fn test_empty_table_writes_no_rows() {
    let file = TempFile::new("empty.csv");

    write_report(file.path(), &[]).unwrap();

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    assert_eq!(reader.records().count(), 0);
    assert!(AnomalySummary::new(&[]).by_source.is_empty());
}

#[test]
fn test_unwritable_path_is_an_io_error() {
    let dir = std::env::temp_dir().join("spoofing-detector-missing-dir/nested");

    let err = write_report(&dir.join("report.csv"), &records()).unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
}
