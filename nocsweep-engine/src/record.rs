// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Records produced while sweeping.

use std::fmt;

use serde::Serialize;

use crate::config_space::Configuration;

/// A single request to the simulator: one configuration at one offered load.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Probe {
    pub configuration: Configuration,
    pub offered_load: f64,
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} injection_rate={:.2}",
            self.configuration, self.offered_load
        )
    }
}

/// The outcome of one probe.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LoadPoint {
    #[serde(skip)]
    pub configuration: Configuration,
    pub offered_load: f64,
    pub latency: f64,
}

impl LoadPoint {
    #[must_use]
    pub fn new(probe: &Probe, latency: f64) -> Self {
        Self {
            configuration: probe.configuration,
            offered_load: probe.offered_load,
            latency,
        }
    }
}

impl fmt::Display for LoadPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "injection_rate={:.2} \t Packet Latency: {:.6}",
            self.offered_load, self.latency
        )
    }
}

/// What is recorded for one configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationResult {
    /// Every probe of a sweep-and-report search, in increasing load.
    Curve(Vec<LoadPoint>),

    /// The offered load at which saturation was detected.
    Throughput(f64),

    /// No output was ever found for this configuration, it is treated as
    /// saturated at the start of the search.
    NotFound,

    /// The search for this configuration failed.
    Failed(String),
}

impl SaturationResult {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SaturationResult::Failed(_))
    }
}

impl fmt::Display for SaturationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SaturationResult::Curve(points) => {
                for (i, point) in points.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{point}")?;
                }
                Ok(())
            }
            SaturationResult::Throughput(load) => write!(f, "{load:.2}"),
            SaturationResult::NotFound => write!(f, "not found"),
            SaturationResult::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
