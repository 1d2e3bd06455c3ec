// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::fs;

use approx::assert_relative_eq;
use nocsweep_engine::DEFAULT_METRIC;
use nocsweep_engine::traits::MetricExtractor;
use nocsweep_engine::types::SweepError;
use nocsweep_garnet::stats::StatsExtractor;

const STATS: &str = "
---------- Begin Simulation Statistics ----------
sim_seconds                                  0.000010                       # Number of seconds simulated
system.ruby.network.average_flit_latency    19.562500                       # (Unspecified)
system.ruby.network.average_packet_latency    21.250000                       # (Unspecified)
---------- End Simulation Statistics   ----------
";

#[test]
fn reads_metric_from_stats_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stats.txt"), STATS).unwrap();

    let latency = StatsExtractor::new()
        .extract(dir.path(), DEFAULT_METRIC)
        .unwrap();
    assert_relative_eq!(latency, 19.5625);
}

#[test]
fn other_metrics_can_be_selected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stats.txt"), STATS).unwrap();

    let latency = StatsExtractor::new()
        .extract(dir.path(), "average_packet_latency")
        .unwrap();
    assert_relative_eq!(latency, 21.25);
}

#[test]
fn searches_nested_files_and_last_wins() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();
    fs::write(dir.path().join("a.txt"), "average_flit_latency 5.0\n").unwrap();
    fs::write(
        dir.path().join("b").join("stats.txt"),
        concat!(
            "system.ruby.network.average_flit_latency 7.0\n",
            "system.ruby.network.average_flit_latency 9.0\n",
        ),
    )
    .unwrap();

    let latency = StatsExtractor::new()
        .extract(dir.path(), DEFAULT_METRIC)
        .unwrap();
    assert_relative_eq!(latency, 9.0);
}

#[test]
fn artifact_may_be_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("stats.txt");
    fs::write(&file, STATS).unwrap();

    let latency = StatsExtractor::new().extract(&file, DEFAULT_METRIC).unwrap();
    assert_relative_eq!(latency, 19.5625);
}

#[test]
fn missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("inj-0.02");
    assert_eq!(
        StatsExtractor::new().extract(&missing, DEFAULT_METRIC),
        Err(SweepError::ArtifactMissing { path: missing })
    );
}

#[test]
fn empty_run_directory_has_no_metric() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("config.ini"), "[root]\ntype=Root\n").unwrap();

    assert_eq!(
        StatsExtractor::new().extract(dir.path(), DEFAULT_METRIC),
        Err(SweepError::MetricAbsent {
            metric: DEFAULT_METRIC.to_string(),
            path: dir.path().to_path_buf(),
        })
    );
}

#[test]
fn unparseable_value() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("stats.txt"),
        "system.ruby.network.average_flit_latency nan\n",
    )
    .unwrap();

    assert_eq!(
        StatsExtractor::new().extract(dir.path(), DEFAULT_METRIC),
        Err(SweepError::MalformedMetric {
            metric: DEFAULT_METRIC.to_string(),
            path: dir.path().to_path_buf(),
            value: "nan".to_string(),
        })
    );

    fs::write(
        dir.path().join("stats.txt"),
        "system.ruby.network.average_flit_latency -3.5\n",
    )
    .unwrap();
    assert_eq!(
        StatsExtractor::new().extract(dir.path(), DEFAULT_METRIC),
        Err(SweepError::MalformedMetric {
            metric: DEFAULT_METRIC.to_string(),
            path: dir.path().to_path_buf(),
            value: "-3.5".to_string(),
        })
    );
}
