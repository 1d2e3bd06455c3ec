// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The load-sweep controller.
//!
//! For one [Configuration] the controller walks the
//! [LoadSchedule], probing the simulator at each offered load until its
//! [StoppingRule] fires. The same controller serves both deployment modes,
//! the rule decides what is recorded:
//!  - a curve of every [LoadPoint] for [StoppingRule::AbsoluteCeiling],
//!  - the load of the stopping probe for
//!    [StoppingRule::RelativeDegradationOrBaseline].
//!
//! A search is either *live*, where the simulator is run for every probe, or a
//! *replay* of the artifacts a previous live search left behind. The two
//! differ in how a missing artifact is treated. Live, it is an error for the
//! configuration. In replay it means the earlier search had already stopped,
//! so the configuration is considered saturated at that point.

use log::{debug, error, info};

use crate::aggregator::ResultAggregator;
use crate::config_space::{ConfigSpace, Configuration};
use crate::policy::{Decision, StoppingRule};
use crate::record::{LoadPoint, Probe, SaturationResult};
use crate::schedule::LoadSchedule;
use crate::traits::{ArtifactLayout, MetricExtractor, RunExecutor};
use crate::types::SweepError;

/// Whether the simulator is run or only its previous output read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pass {
    Live,
    Replay,
}

pub struct SweepController {
    executor: Box<dyn RunExecutor>,
    layout: Box<dyn ArtifactLayout>,
    extractor: Box<dyn MetricExtractor>,
    schedule: LoadSchedule,
    rule: StoppingRule,
    metric: String,
}

impl SweepController {
    #[must_use]
    pub fn new(
        executor: Box<dyn RunExecutor>,
        layout: Box<dyn ArtifactLayout>,
        extractor: Box<dyn MetricExtractor>,
        schedule: LoadSchedule,
        rule: StoppingRule,
    ) -> Self {
        Self {
            executor,
            layout,
            extractor,
            schedule,
            rule,
            metric: crate::DEFAULT_METRIC.to_string(),
        }
    }

    /// Create a controller where one object plays all three collaborator
    /// roles (typically a stub sharing state between its clones).
    #[must_use]
    pub fn with_simulator<S>(simulator: &S, schedule: LoadSchedule, rule: StoppingRule) -> Self
    where
        S: RunExecutor + ArtifactLayout + MetricExtractor + Clone + 'static,
    {
        Self::new(
            Box::new(simulator.clone()),
            Box::new(simulator.clone()),
            Box::new(simulator.clone()),
            schedule,
            rule,
        )
    }

    /// Set the name of the metric read from each artifact.
    #[must_use]
    pub fn with_metric(mut self, metric: &str) -> Self {
        self.metric = metric.to_string();
        self
    }

    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Search one configuration, running the simulator for every probe.
    ///
    /// Any probe failure ends the search with an error naming the
    /// configuration and offered load. There are no retries.
    pub fn search(
        &mut self,
        configuration: &Configuration,
    ) -> Result<SaturationResult, SweepError> {
        let schedule = self.schedule;
        let mut state = self.rule.start();
        let mut points = Vec::new();
        let mut last_probe = None;

        for (_, offered_load) in schedule.loads() {
            let probe = Probe {
                configuration: *configuration,
                offered_load,
            };
            let latency = self.run_probe(&probe).map_err(|e| e.for_probe(&probe))?;
            let point = LoadPoint::new(&probe, latency);
            debug!("{point}");

            points.push(point);
            if let Decision::Stop(reason) = state.evaluate(latency) {
                info!("{configuration}: stopped at injection_rate={offered_load:.2} ({reason})");
                return Ok(self.finish(points, offered_load));
            }
            last_probe = Some(probe);
        }

        Err(self.non_termination(last_probe))
    }

    /// Search one configuration using only artifacts left by an earlier live
    /// search.
    ///
    /// The first missing artifact ends the search without error. If nothing
    /// at all was found the result is [SaturationResult::NotFound].
    pub fn replay(&self, configuration: &Configuration) -> Result<SaturationResult, SweepError> {
        let mut state = self.rule.start();
        let mut points = Vec::new();
        let mut last_probe = None;

        for (_, offered_load) in self.schedule.loads() {
            let probe = Probe {
                configuration: *configuration,
                offered_load,
            };
            let artifact = self.layout.artifact_for(&probe);
            if !self.layout.exists(&artifact) {
                debug!(
                    "{probe}: no output at {}, treating as saturated",
                    artifact.display()
                );
                return Ok(self.replay_ended(points));
            }

            let latency = self
                .extractor
                .extract(&artifact, &self.metric)
                .map_err(|e| e.for_probe(&probe))?;
            let point = LoadPoint::new(&probe, latency);
            debug!("{point}");

            points.push(point);
            if let Decision::Stop(reason) = state.evaluate(latency) {
                debug!(
                    "{configuration}: replay stopped at injection_rate={offered_load:.2} ({reason})"
                );
                return Ok(self.finish(points, offered_load));
            }
            last_probe = Some(probe);
        }

        Err(self.non_termination(last_probe))
    }

    /// Search every configuration of `space` in enumeration order.
    ///
    /// A failed search is recorded as [SaturationResult::Failed] and the
    /// sweep moves on to the next configuration. `on_result` is called once
    /// per configuration as soon as its result is known.
    pub fn sweep_space<F>(
        &mut self,
        space: &ConfigSpace,
        pass: Pass,
        mut on_result: F,
    ) -> Result<ResultAggregator, SweepError>
    where
        F: FnMut(&Configuration, &SaturationResult),
    {
        let mut results = ResultAggregator::new(space);
        for (index, configuration) in space.iter() {
            info!("{configuration}");
            let outcome = match pass {
                Pass::Live => self.search(&configuration),
                Pass::Replay => self.replay(&configuration),
            };
            let result = match outcome {
                Ok(result) => result,
                Err(e) => {
                    error!("{e}");
                    SaturationResult::Failed(e.to_string())
                }
            };
            on_result(&configuration, &result);
            results.record(index, result)?;
        }
        Ok(results)
    }

    fn run_probe(&mut self, probe: &Probe) -> Result<f64, SweepError> {
        let artifact = self.layout.artifact_for(probe);
        debug!("{probe}: output to {}", artifact.display());

        self.executor.execute(probe, &artifact)?;
        if !self.layout.exists(&artifact) {
            return Err(SweepError::ArtifactMissing { path: artifact });
        }
        self.extractor.extract(&artifact, &self.metric)
    }

    fn finish(&self, points: Vec<LoadPoint>, offered_load: f64) -> SaturationResult {
        if self.rule.records_curve() {
            SaturationResult::Curve(points)
        } else {
            SaturationResult::Throughput(offered_load)
        }
    }

    fn replay_ended(&self, points: Vec<LoadPoint>) -> SaturationResult {
        if self.rule.records_curve() && !points.is_empty() {
            SaturationResult::Curve(points)
        } else {
            SaturationResult::NotFound
        }
    }

    fn non_termination(&self, last_probe: Option<Probe>) -> SweepError {
        let err = SweepError::NonTermination {
            max_offered_load: self.schedule.max_offered_load(),
            probes: self.schedule.num_probes(),
        };
        match last_probe {
            Some(probe) => err.for_probe(&probe),
            None => err,
        }
    }
}
