// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use nocsweep_engine::controller::{Pass, SweepController};
use nocsweep_engine::policy::StoppingRule;
use nocsweep_engine::record::{Probe, SaturationResult};
use nocsweep_engine::schedule::LoadSchedule;
use nocsweep_engine::test_helpers::{SyntheticSimulator, small_space};
use nocsweep_engine::types::SweepError;

fn rising_latency() -> SyntheticSimulator {
    SyntheticSimulator::new(|probe| {
        let cores = probe.configuration.core_count as f64;
        Some(10.0 + cores * probe.offered_load * probe.offered_load * 20.0)
    })
}

#[test]
fn replay_matches_live_sweep() {
    let sim = rising_latency();
    let space = small_space().unwrap();

    for rule in [StoppingRule::sweep_default(), StoppingRule::saturation_default()] {
        let mut live = SweepController::with_simulator(&sim, LoadSchedule::default(), rule);
        let live_report = live.sweep_space(&space, Pass::Live, |_, _| {}).unwrap().report();
        let executed = sim.executed().len();
        let artifacts = sim.num_artifacts();

        let mut replay = SweepController::with_simulator(&sim, LoadSchedule::default(), rule);
        let replay_report = replay
            .sweep_space(&space, Pass::Replay, |_, _| {})
            .unwrap()
            .report();

        assert_eq!(live_report, replay_report);
        assert_eq!(live_report.num_failed(), 0);
        // Nothing is run during a replay
        assert_eq!(sim.executed().len(), executed);
        assert_eq!(sim.num_artifacts(), artifacts);
    }
}

#[test]
fn replay_without_output_is_saturated_at_start() {
    let sim = rising_latency();
    let space = small_space().unwrap();

    for rule in [StoppingRule::sweep_default(), StoppingRule::saturation_default()] {
        let mut controller = SweepController::with_simulator(&sim, LoadSchedule::default(), rule);
        let results = controller.sweep_space(&space, Pass::Replay, |_, _| {}).unwrap();

        for (index, _) in space.iter() {
            assert_eq!(results.get(index), Some(&SaturationResult::NotFound));
        }
    }
    assert!(sim.executed().is_empty());
}

#[test]
fn replay_curve_stops_at_first_gap() {
    let sim = rising_latency();
    let space = small_space().unwrap();
    let (_, configuration) = space.iter().next().unwrap();

    let mut controller = SweepController::with_simulator(
        &sim,
        LoadSchedule::default(),
        StoppingRule::sweep_default(),
    );
    let live_points = match controller.search(&configuration).unwrap() {
        SaturationResult::Curve(points) => points,
        other => panic!("expected a curve, got {other:?}"),
    };
    assert!(live_points.len() > 4);

    sim.remove_artifact(&Probe {
        configuration,
        offered_load: live_points[3].offered_load,
    });

    match controller.replay(&configuration).unwrap() {
        SaturationResult::Curve(points) => assert_eq!(points, live_points[..3]),
        other => panic!("expected a curve, got {other:?}"),
    }
}

#[test]
fn replay_saturation_with_gap_is_not_found() {
    let sim = SyntheticSimulator::from_sequence(&[10.0, 20.0, 70.0]);
    let space = small_space().unwrap();
    let (_, configuration) = space.iter().next().unwrap();

    let mut controller = SweepController::with_simulator(
        &sim,
        LoadSchedule::default(),
        StoppingRule::saturation_default(),
    );
    match controller.search(&configuration).unwrap() {
        SaturationResult::Throughput(load) => assert_relative_eq!(load, 0.06),
        other => panic!("expected a throughput, got {other:?}"),
    }

    sim.remove_artifact(&Probe {
        configuration,
        offered_load: 0.06,
    });
    assert_eq!(
        controller.replay(&configuration).unwrap(),
        SaturationResult::NotFound
    );
}

#[test]
fn replay_with_unreadable_metric_fails_configuration() {
    let sim = SyntheticSimulator::from_sequence(&[10.0, 70.0]);
    let space = small_space().unwrap();
    let mut live = SweepController::with_simulator(
        &sim,
        LoadSchedule::default(),
        StoppingRule::saturation_default(),
    );
    live.sweep_space(&space, Pass::Live, |_, _| {}).unwrap();

    let mut replay = SweepController::with_simulator(
        &sim,
        LoadSchedule::default(),
        StoppingRule::saturation_default(),
    )
    .with_metric("average_hops");
    let results = replay.sweep_space(&space, Pass::Replay, |_, _| {}).unwrap();
    assert_eq!(results.report().num_failed(), space.len());

    let (_, configuration) = space.iter().next().unwrap();
    let err = replay.replay(&configuration).unwrap_err();
    assert!(matches!(err.root_cause(), SweepError::MetricAbsent { .. }));
}
