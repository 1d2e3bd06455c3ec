// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::record::Probe;

// Sweep errors

#[macro_export]
/// Build a [SweepError] from a message that supports `to_string`
macro_rules! sweep_error {
    ($msg:expr) => {
        Err($crate::types::SweepError::Other($msg.to_string()))
    };
}

/// The `SweepError` is what should be returned in the case of an error
#[derive(Clone, Debug, PartialEq)]
pub enum SweepError {
    /// The run executor did not produce the expected output artifact.
    ArtifactMissing { path: PathBuf },

    /// The artifact exists but contains no line for the metric.
    MetricAbsent { metric: String, path: PathBuf },

    /// The metric line was found but its value is not a finite number.
    MalformedMetric {
        metric: String,
        path: PathBuf,
        value: String,
    },

    /// No stopping rule fired before the offered load passed its upper bound.
    NonTermination { max_offered_load: f64, probes: usize },

    /// A probe failed. Carries the configuration and load that failed.
    ProbeFailed { probe: Probe, cause: Box<SweepError> },

    /// The simulator (or its build) could not be run.
    Execution(String),

    /// A filesystem operation failed.
    Io { path: PathBuf, message: String },

    /// Rejected settings or axis lists.
    InvalidConfig(String),

    /// Anything else, see [sweep_error!].
    Other(String),
}

impl SweepError {
    /// Wrap this error with the probe that caused it.
    ///
    /// Errors that already carry a probe are returned unchanged.
    #[must_use]
    pub fn for_probe(self, probe: &Probe) -> Self {
        match self {
            SweepError::ProbeFailed { .. } => self,
            cause => SweepError::ProbeFailed {
                probe: *probe,
                cause: Box::new(cause),
            },
        }
    }

    /// Build an `Io` error from a path and an [std::io::Error].
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, e: &std::io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            message: e.to_string(),
        }
    }

    /// The innermost error, looking through any probe wrapper.
    #[must_use]
    pub fn root_cause(&self) -> &SweepError {
        match self {
            SweepError::ProbeFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SweepError::ArtifactMissing { path } => {
                write!(f, "no output produced at {}", path.display())
            }
            SweepError::MetricAbsent { metric, path } => {
                write!(f, "metric '{metric}' not found in {}", path.display())
            }
            SweepError::MalformedMetric {
                metric,
                path,
                value,
            } => write!(
                f,
                "metric '{metric}' in {} has invalid value '{value}'",
                path.display()
            ),
            SweepError::NonTermination {
                max_offered_load,
                probes,
            } => write!(
                f,
                "no stopping rule fired after {probes} probes (maximum offered load {max_offered_load:.2})"
            ),
            SweepError::ProbeFailed { probe, cause } => write!(f, "{probe}: {cause}"),
            SweepError::Execution(msg) => write!(f, "execution failed: {msg}"),
            SweepError::Io { path, message } => write!(f, "{}: {message}", path.display()),
            SweepError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SweepError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl Error for SweepError {}

/// The SweepResult is the return type for functions with no value to return
pub type SweepResult = Result<(), SweepError>;
