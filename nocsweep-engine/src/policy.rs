// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Stopping rules that end a search along the offered-load axis.
//!
//! Two rules exist, one per deployment mode:
//!  - [StoppingRule::AbsoluteCeiling]: stop as soon as latency exceeds a fixed
//!    number of cycles. Used when the whole latency-vs-load curve is wanted.
//!  - [StoppingRule::RelativeDegradationOrBaseline]: stop when latency has
//!    degraded by a factor relative to the low-load latency, or when the
//!    low-load latency itself is above a ceiling. The load of the probe that
//!    fired is the saturation throughput.
//!
//! A rule is stateless. The per-search state (the low-load baseline) lives in
//! a [RuleState] created by [StoppingRule::start].

use std::fmt;

use crate::types::SweepError;

/// Which criterion ended a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StopReason {
    LatencyCeiling,
    RelativeDegradation,
    BaselineCeiling,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StopReason::LatencyCeiling => write!(f, "latency above ceiling"),
            StopReason::RelativeDegradation => write!(f, "latency degraded relative to low load"),
            StopReason::BaselineCeiling => write!(f, "low-load latency above ceiling"),
        }
    }
}

/// Result of evaluating a rule against one probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoppingRule {
    AbsoluteCeiling {
        latency_ceiling: f64,
    },
    RelativeDegradationOrBaseline {
        degradation_factor: f64,
        baseline_ceiling: f64,
    },
}

impl StoppingRule {
    /// The sweep-and-report rule with its usual 200 cycle ceiling.
    #[must_use]
    pub fn sweep_default() -> Self {
        StoppingRule::AbsoluteCeiling {
            latency_ceiling: 200.0,
        }
    }

    /// The saturation-detection rule with its usual thresholds.
    #[must_use]
    pub fn saturation_default() -> Self {
        StoppingRule::RelativeDegradationOrBaseline {
            degradation_factor: 6.0,
            baseline_ceiling: 70.0,
        }
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        let positive = |name: &str, value: f64| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SweepError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )))
            }
        };
        match self {
            StoppingRule::AbsoluteCeiling { latency_ceiling } => {
                positive("latency_ceiling", *latency_ceiling)
            }
            StoppingRule::RelativeDegradationOrBaseline {
                degradation_factor,
                baseline_ceiling,
            } => {
                positive("degradation_factor", *degradation_factor)?;
                positive("baseline_ceiling", *baseline_ceiling)
            }
        }
    }

    /// Whether a search with this rule records every probe rather than a
    /// single saturation load.
    #[must_use]
    pub fn records_curve(&self) -> bool {
        matches!(self, StoppingRule::AbsoluteCeiling { .. })
    }

    /// Begin a new search.
    #[must_use]
    pub fn start(&self) -> RuleState {
        RuleState {
            rule: *self,
            low_load_latency: None,
        }
    }
}

/// Per-search state of a [StoppingRule].
#[derive(Debug)]
pub struct RuleState {
    rule: StoppingRule,
    low_load_latency: Option<f64>,
}

impl RuleState {
    /// Latency of the first probe of this search, once it has been seen.
    #[must_use]
    pub fn low_load_latency(&self) -> Option<f64> {
        self.low_load_latency
    }

    /// Evaluate the rule for the latency measured by the next probe.
    ///
    /// The first call captures the low-load baseline. The baseline is never
    /// replaced by later probes.
    pub fn evaluate(&mut self, latency: f64) -> Decision {
        match self.rule {
            StoppingRule::AbsoluteCeiling { latency_ceiling } => {
                if latency > latency_ceiling {
                    Decision::Stop(StopReason::LatencyCeiling)
                } else {
                    Decision::Continue
                }
            }
            StoppingRule::RelativeDegradationOrBaseline {
                degradation_factor,
                baseline_ceiling,
            } => {
                let baseline = match self.low_load_latency {
                    Some(baseline) => {
                        if latency > degradation_factor * baseline {
                            return Decision::Stop(StopReason::RelativeDegradation);
                        }
                        baseline
                    }
                    None => {
                        self.low_load_latency = Some(latency);
                        latency
                    }
                };

                // Checked on the baseline probe too
                if baseline > baseline_ceiling {
                    Decision::Stop(StopReason::BaselineCeiling)
                } else {
                    Decision::Continue
                }
            }
        }
    }
}
