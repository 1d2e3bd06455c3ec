// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Traits for the collaborators the controller depends on.
//!
//! Each probe passes through all three: the [ArtifactLayout] names where
//! the simulator output for the probe lives, the [RunExecutor] runs the
//! simulator so that the output appears there, and the [MetricExtractor]
//! reads the latency back out of it.

use std::path::{Path, PathBuf};

use crate::record::Probe;
use crate::types::{SweepError, SweepResult};

/// Runs the simulator for one probe.
pub trait RunExecutor {
    /// Run to completion, writing output to `artifact`.
    ///
    /// Returning `Ok` does not imply the artifact exists. The controller
    /// checks that separately.
    fn execute(&mut self, probe: &Probe, artifact: &Path) -> SweepResult;
}

/// Names the artifact produced for each probe.
pub trait ArtifactLayout {
    /// Path of the artifact for `probe`. Distinct probes get distinct paths.
    fn artifact_for(&self, probe: &Probe) -> PathBuf;

    fn exists(&self, artifact: &Path) -> bool {
        artifact.exists()
    }
}

/// Reads a named scalar metric from an artifact.
pub trait MetricExtractor {
    fn extract(&self, artifact: &Path, metric: &str) -> Result<f64, SweepError>;
}
