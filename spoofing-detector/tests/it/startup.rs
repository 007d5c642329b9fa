use ais_core::{MeasurementKind, SourceTag};
use spoofing_detector::startup::App;

use crate::helper::{TempFile, test_helper};

static DMA_CSV: &str = "\
# Timestamp,Type of mobile,MMSI,Latitude,Longitude,Navigational status,ROT,SOG,COG,Heading
14/03/2025 00:00:00,Class A,219000001,0.000000,0.000000,Under way using engine,,10.0,90.0,90
14/03/2025 00:01:00,Class A,219000001,1.000000,0.000000,Under way using engine,,10.0,90.0,90
14/03/2025 00:00:00,Base Station,2190000,55.000000,10.000000,Unknown value,,,,
14/03/2025 00:00:30,Class A,219000002,91.000000,181.000000,Unknown value,,,,
14/03/2025 00:00:30,Class B,219000003,56.000000,11.000000,Unknown value,,0.0,,
14/03/2025 00:01:30,Class B,219000003,56.000100,11.000000,Unknown value,,0.1,,
";

#[tokio::test(flavor = "multi_thread")]
async fn test_detect_loads_input_and_writes_merged_table() {
    let input = TempFile::new("input.csv");
    let output = TempFile::new("output.csv");
    std::fs::write(input.path(), DMA_CSV).unwrap();

    let app = App::build(test_helper().settings).unwrap();
    let outcome = app.detect(input.path(), Some(output.path())).await.unwrap();

    assert_eq!(outcome.merged.len(), 1);
    let record = &outcome.merged[0];
    assert_eq!(record.mmsi.into_inner(), 219000001);
    assert!(record.provenance().contains(SourceTag::SpeedJump));
    assert!(record.measurement(MeasurementKind::SpeedKmh).unwrap() > 100.0);

    let mut reader = csv::Reader::from_path(output.path()).unwrap();
    assert_eq!(reader.records().count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_benchmark_runs_are_identical() {
    let input = TempFile::new("benchmark.csv");
    std::fs::write(input.path(), DMA_CSV).unwrap();

    let app = App::build(test_helper().workers(2, 1).settings).unwrap();
    let report = app.benchmark(input.path()).await.unwrap();

    assert!(report.identical);
    assert_eq!(report.parallel_summary.rows, 1);
    assert_eq!(report.num_workers, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_input_is_an_error() {
    let app = App::build(test_helper().settings).unwrap();

    assert!(
        app.detect(std::path::Path::new("/nonexistent/ais.csv"), None)
            .await
            .is_err()
    );
}
