use ais_core::{
    AnomalyRecord, Fleet, FleetBuilder, Mmsi, PositionReport, SourceTag, Trajectory, random_fleet,
};
use spoofing_detector::{
    FanoutExecutor, TrajectoryRule, TrajectoryRules, UnrealisticSpeed, detect_sequential,
};

use crate::helper::test_helper;

#[derive(Debug)]
struct PanicsOn(Mmsi);

impl TrajectoryRule for PanicsOn {
    fn tag(&self) -> SourceTag {
        SourceTag::SpeedJump
    }

    fn evaluate(&self, trajectory: &Trajectory<'_>) -> Vec<(usize, AnomalyRecord)> {
        if trajectory.mmsi() == self.0 {
            panic!("rule failed on vessel '{}'", self.0);
        }
        vec![]
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_result_is_identical_for_any_worker_count() {
    let _helper = test_helper();
    let fleet = random_fleet(42, 300, 60);
    let expected = detect_sequential(&fleet, &TrajectoryRules::default());

    assert!(!expected.is_empty());

    for num_workers in [1, 2, 3, 8] {
        for batch_size in [1, 7, 64, 1000] {
            let executor = FanoutExecutor::new(TrajectoryRules::default(), Some(num_workers), batch_size);
            let records = executor.run(&fleet).await;

            assert_eq!(
                records, expected,
                "workers: {num_workers}, batch size: {batch_size}"
            );
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_result_is_sorted_by_vessel_and_timestamp() {
    let fleet = random_fleet(3, 100, 40);
    let executor = FanoutExecutor::new(TrajectoryRules::default(), Some(4), 5);

    let records = executor.run(&fleet).await;

    assert!(records.windows(2).all(|w| w[0].key() <= w[1].key()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_each_report_is_flagged_at_most_once() {
    let fleet = random_fleet(11, 200, 60);
    let executor = FanoutExecutor::new(TrajectoryRules::default(), Some(4), 2);

    let records = executor.run(&fleet).await;

    assert!(records.windows(2).all(|w| w[0].key() != w[1].key()));
}

fn panicking_rules(failing: Mmsi) -> TrajectoryRules {
    TrajectoryRules::new(vec![
        Box::<UnrealisticSpeed>::default() as Box<dyn TrajectoryRule>,
        Box::new(PanicsOn(failing)) as Box<dyn TrajectoryRule>,
    ])
}

fn three_jumping_vessels() -> Fleet {
    FleetBuilder::new()
        .track(1, 0, 60, &[(0.0, 0.0), (1.0, 0.0)])
        .track(2, 0, 60, &[(0.0, 0.0), (1.0, 0.0)])
        .track(3, 0, 60, &[(0.0, 0.0), (1.0, 0.0)])
        .build()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_panicking_partition_contributes_nothing() {
    let _helper = test_helper();
    let fleet = three_jumping_vessels();

    for batch_size in [1, 2, 3] {
        let executor = FanoutExecutor::new(panicking_rules(Mmsi::new(2)), Some(2), batch_size);

        let records = executor.run(&fleet).await;

        let vessels: Vec<Mmsi> = records.iter().map(|r| r.mmsi).collect();
        assert_eq!(
            vessels,
            vec![Mmsi::new(1), Mmsi::new(3)],
            "batch size: {batch_size}"
        );
    }
}

#[test]
fn test_sequential_run_isolates_panicking_partition() {
    let _helper = test_helper();
    let fleet = three_jumping_vessels();

    let records = detect_sequential(&fleet, &panicking_rules(Mmsi::new(2)));

    let vessels: Vec<Mmsi> = records.iter().map(|r| r.mmsi).collect();
    assert_eq!(vessels, vec![Mmsi::new(1), Mmsi::new(3)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_coordinates_fail_only_their_vessel() {
    let fleet = FleetBuilder::new()
        .track(1, 0, 60, &[(0.0, 0.0), (1.0, 0.0)])
        .report(PositionReport::test_new(2, 0, 0.0, 0.0))
        .report(PositionReport::test_new(2, 60, 95.0, 0.0))
        .track(3, 0, 60, &[(0.0, 0.0), (1.0, 0.0)])
        .build();

    for batch_size in [1, 3] {
        let executor = FanoutExecutor::new(TrajectoryRules::default(), Some(2), batch_size);
        let records = executor.run(&fleet).await;

        let vessels: Vec<Mmsi> = records.iter().map(|r| r.mmsi).collect();
        assert_eq!(vessels, vec![Mmsi::new(1), Mmsi::new(3)]);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_coordinate_keeps_other_flags_of_its_vessel() {
    let fleet = FleetBuilder::new()
        .track(1, 0, 60, &[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
        .report(PositionReport::test_new(1, 600, f64::NAN, 0.0))
        .report(PositionReport::test_new(1, 660, 2.0, f64::NAN))
        .build();
    let executor = FanoutExecutor::new(TrajectoryRules::default(), Some(2), 1);

    let records = executor.run(&fleet).await;

    let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp.timestamp()).collect();
    let reports = fleet.reports();
    assert_eq!(
        timestamps,
        vec![reports[1].timestamp.timestamp(), reports[3].timestamp.timestamp()]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fleet_without_anomalies_yields_empty_table() {
    let fleet = FleetBuilder::new()
        .track(1, 0, 60, &[(55.0, 10.0), (55.001, 10.0), (55.002, 10.0)])
        .track(2, 0, 60, &[(56.0, 10.0)])
        .build();
    let executor = FanoutExecutor::new(TrajectoryRules::default(), None, 1);

    assert!(executor.run(&fleet).await.is_empty());
}
