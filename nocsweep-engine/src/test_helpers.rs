// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Stub collaborators for exercising the controller without a simulator.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config_space::{Benchmark, ConfigSpace, RoutingAlgorithm};
use crate::record::Probe;
use crate::schedule::LoadSchedule;
use crate::traits::{ArtifactLayout, MetricExtractor, RunExecutor};
use crate::types::{SweepError, SweepResult};

type LatencyFn = dyn Fn(&Probe) -> Option<f64>;

#[derive(Default)]
struct SimulatorState {
    artifacts: HashMap<PathBuf, f64>,
    executed: Vec<Probe>,
}

/// An in-memory simulator whose latency is a function of the probe.
///
/// It acts as executor, layout and extractor at once. Clones share the same
/// artifacts, so a controller built with
/// [with_simulator](crate::controller::SweepController::with_simulator) can
/// be inspected afterwards through the instance it was cloned from.
///
/// Returning `None` from the latency function means the run produced no
/// artifact.
#[derive(Clone)]
pub struct SyntheticSimulator {
    latency_fn: Rc<LatencyFn>,
    state: Rc<RefCell<SimulatorState>>,
}

impl SyntheticSimulator {
    pub fn new<F>(latency_fn: F) -> Self
    where
        F: Fn(&Probe) -> Option<f64> + 'static,
    {
        Self {
            latency_fn: Rc::new(latency_fn),
            state: Rc::new(RefCell::new(SimulatorState::default())),
        }
    }

    /// Latency taken from `latencies` by probe position in the default
    /// [LoadSchedule]. Probes beyond the end produce no artifact.
    #[must_use]
    pub fn from_sequence(latencies: &[f64]) -> Self {
        let latencies = latencies.to_vec();
        let schedule = LoadSchedule::default();
        Self::new(move |probe| {
            let idx = ((probe.offered_load - schedule.start()) / schedule.step()).round() as usize;
            latencies.get(idx).copied()
        })
    }

    /// Every probe executed so far, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<Probe> {
        self.state.borrow().executed.clone()
    }

    #[must_use]
    pub fn num_artifacts(&self) -> usize {
        self.state.borrow().artifacts.len()
    }

    /// Drop the artifact of `probe` as if it had been deleted from disk.
    pub fn remove_artifact(&self, probe: &Probe) {
        let path = self.artifact_for(probe);
        self.state.borrow_mut().artifacts.remove(&path);
    }
}

impl RunExecutor for SyntheticSimulator {
    fn execute(&mut self, probe: &Probe, artifact: &Path) -> SweepResult {
        let mut state = self.state.borrow_mut();
        state.executed.push(*probe);
        if let Some(latency) = (self.latency_fn)(probe) {
            state.artifacts.insert(artifact.to_path_buf(), latency);
        }
        Ok(())
    }
}

impl ArtifactLayout for SyntheticSimulator {
    fn artifact_for(&self, probe: &Probe) -> PathBuf {
        let config = &probe.configuration;
        PathBuf::from(format!(
            "{}/{}/{}/vc-{}/inj-{:.2}",
            config.core_count, config.benchmark, config.routing, config.vc_count, probe.offered_load
        ))
    }

    fn exists(&self, artifact: &Path) -> bool {
        self.state.borrow().artifacts.contains_key(artifact)
    }
}

impl MetricExtractor for SyntheticSimulator {
    fn extract(&self, artifact: &Path, metric: &str) -> Result<f64, SweepError> {
        let state = self.state.borrow();
        match state.artifacts.get(artifact) {
            Some(latency) if metric == crate::DEFAULT_METRIC => Ok(*latency),
            Some(_) => Err(SweepError::MetricAbsent {
                metric: metric.to_string(),
                path: artifact.to_path_buf(),
            }),
            None => Err(SweepError::Io {
                path: artifact.to_path_buf(),
                message: "No such file or directory".to_string(),
            }),
        }
    }
}

/// A 2x2x2x2 space used by tests.
pub fn small_space() -> Result<ConfigSpace, SweepError> {
    ConfigSpace::new(
        vec![16, 64],
        vec![RoutingAlgorithm::Xy, RoutingAlgorithm::EscapeVc],
        vec![Benchmark::Shuffle, Benchmark::Transpose],
        vec![1, 4],
    )
}
