// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The space of interconnect configurations to sweep.
//!
//! A [ConfigSpace] is the cross product of four ordered axes. It is always
//! enumerated with the core count outermost, then routing algorithm, then
//! benchmark pattern and finally the virtual-channel count innermost. The
//! position of a [Configuration] in that enumeration is its identity: the
//! [aggregator](crate::aggregator) stores results under it and reports them
//! back in the same order.

use std::fmt;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::types::SweepError;

/// Routing algorithms understood by the simulator.
///
/// The order of the variants is the numbering the simulator uses for its
/// `--routing-algorithm` option.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RoutingAlgorithm {
    /// Routing tables computed from link weights
    #[serde(rename = "TABLE")]
    #[value(name = "TABLE")]
    Table,

    /// Dimension order routing
    #[serde(rename = "XY")]
    #[value(name = "XY")]
    Xy,

    /// West-first turn model
    #[serde(rename = "WestFirst")]
    #[value(name = "WestFirst")]
    WestFirst,

    /// Random minimal output port
    #[serde(rename = "RANDOM")]
    #[value(name = "RANDOM")]
    Random,

    /// Adaptive, random choice between minimal ports
    #[serde(rename = "ADAPT_RAND")]
    #[value(name = "ADAPT_RAND")]
    AdaptRand,

    /// Adaptive west-first
    #[serde(rename = "ADAPT_WF")]
    #[value(name = "ADAPT_WF")]
    AdaptWf,

    /// Fully adaptive with an escape virtual channel
    #[serde(rename = "ESCAPE_VC")]
    #[value(name = "ESCAPE_VC")]
    EscapeVc,
}

impl RoutingAlgorithm {
    pub const ALL: [RoutingAlgorithm; 7] = [
        RoutingAlgorithm::Table,
        RoutingAlgorithm::Xy,
        RoutingAlgorithm::WestFirst,
        RoutingAlgorithm::Random,
        RoutingAlgorithm::AdaptRand,
        RoutingAlgorithm::AdaptWf,
        RoutingAlgorithm::EscapeVc,
    ];

    /// The value passed to the simulator's `--routing-algorithm` option.
    #[must_use]
    pub fn simulator_index(&self) -> usize {
        *self as usize
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RoutingAlgorithm::Table => "TABLE",
            RoutingAlgorithm::Xy => "XY",
            RoutingAlgorithm::WestFirst => "WestFirst",
            RoutingAlgorithm::Random => "RANDOM",
            RoutingAlgorithm::AdaptRand => "ADAPT_RAND",
            RoutingAlgorithm::AdaptWf => "ADAPT_WF",
            RoutingAlgorithm::EscapeVc => "ESCAPE_VC",
        }
    }
}

impl fmt::Display for RoutingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Synthetic traffic patterns.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Benchmark {
    BitRotation,
    Shuffle,
    Transpose,
}

impl Benchmark {
    pub const ALL: [Benchmark; 3] = [
        Benchmark::BitRotation,
        Benchmark::Shuffle,
        Benchmark::Transpose,
    ];

    /// Upper-case name used in reports and output directories.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Benchmark::BitRotation => "BIT_ROTATION",
            Benchmark::Shuffle => "SHUFFLE",
            Benchmark::Transpose => "TRANSPOSE",
        }
    }

    /// Lower-case name expected by the simulator's `--synthetic` option.
    #[must_use]
    pub fn synthetic_name(&self) -> &'static str {
        match self {
            Benchmark::BitRotation => "bit_rotation",
            Benchmark::Shuffle => "shuffle",
            Benchmark::Transpose => "transpose",
        }
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One point in the configuration space.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Configuration {
    pub core_count: usize,
    pub routing: RoutingAlgorithm,
    pub benchmark: Benchmark,
    pub vc_count: usize,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cores: {} routing_algorithm: {} benchmark: {} vc-{}",
            self.core_count, self.routing, self.benchmark, self.vc_count
        )
    }
}

/// The ordered cross product of the four configuration axes.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigSpace {
    core_counts: Vec<usize>,
    routing_algorithms: Vec<RoutingAlgorithm>,
    benchmarks: Vec<Benchmark>,
    vc_counts: Vec<usize>,
}

impl ConfigSpace {
    /// Create a space from its axes.
    ///
    /// Every axis must be non-empty, free of duplicates, and core and
    /// virtual-channel counts must be positive.
    pub fn new(
        core_counts: Vec<usize>,
        routing_algorithms: Vec<RoutingAlgorithm>,
        benchmarks: Vec<Benchmark>,
        vc_counts: Vec<usize>,
    ) -> Result<Self, SweepError> {
        let mut errors = Vec::new();
        check_axis("core_counts", &core_counts, &mut errors);
        check_axis("routing_algorithms", &routing_algorithms, &mut errors);
        check_axis("benchmarks", &benchmarks, &mut errors);
        check_axis("vc_counts", &vc_counts, &mut errors);

        if core_counts.contains(&0) {
            errors.push("core_counts must be positive".to_string());
        }
        if vc_counts.contains(&0) {
            errors.push("vc_counts must be positive".to_string());
        }

        if !errors.is_empty() {
            return Err(SweepError::InvalidConfig(errors.join("\n")));
        }

        Ok(Self {
            core_counts,
            routing_algorithms,
            benchmarks,
            vc_counts,
        })
    }

    #[must_use]
    pub fn core_counts(&self) -> &[usize] {
        &self.core_counts
    }

    #[must_use]
    pub fn routing_algorithms(&self) -> &[RoutingAlgorithm] {
        &self.routing_algorithms
    }

    #[must_use]
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    #[must_use]
    pub fn vc_counts(&self) -> &[usize] {
        &self.vc_counts
    }

    /// Total number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.core_counts.len()
            * self.routing_algorithms.len()
            * self.benchmarks.len()
            * self.vc_counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten per-axis positions into the enumeration index.
    ///
    /// Must mirror the nesting used by [ConfigSpace::iter].
    #[must_use]
    pub fn flat_index(
        &self,
        core_idx: usize,
        routing_idx: usize,
        benchmark_idx: usize,
        vc_idx: usize,
    ) -> usize {
        ((core_idx * self.routing_algorithms.len() + routing_idx) * self.benchmarks.len()
            + benchmark_idx)
            * self.vc_counts.len()
            + vc_idx
    }

    /// Position of `configuration` in the enumeration, if it is in the space.
    #[must_use]
    pub fn index_of(&self, configuration: &Configuration) -> Option<usize> {
        let core_idx = position(&self.core_counts, &configuration.core_count)?;
        let routing_idx = position(&self.routing_algorithms, &configuration.routing)?;
        let benchmark_idx = position(&self.benchmarks, &configuration.benchmark)?;
        let vc_idx = position(&self.vc_counts, &configuration.vc_count)?;
        Some(self.flat_index(core_idx, routing_idx, benchmark_idx, vc_idx))
    }

    /// The configuration at enumeration position `index`.
    #[must_use]
    pub fn configuration_at(&self, index: usize) -> Option<Configuration> {
        if index >= self.len() {
            return None;
        }
        let vc_idx = index % self.vc_counts.len();
        let rest = index / self.vc_counts.len();
        let benchmark_idx = rest % self.benchmarks.len();
        let rest = rest / self.benchmarks.len();
        let routing_idx = rest % self.routing_algorithms.len();
        let core_idx = rest / self.routing_algorithms.len();

        Some(Configuration {
            core_count: self.core_counts[core_idx],
            routing: self.routing_algorithms[routing_idx],
            benchmark: self.benchmarks[benchmark_idx],
            vc_count: self.vc_counts[vc_idx],
        })
    }

    /// Enumerate `(index, configuration)` pairs in the fixed nested order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Configuration)> + '_ {
        iproduct!(
            self.core_counts.iter(),
            self.routing_algorithms.iter(),
            self.benchmarks.iter(),
            self.vc_counts.iter()
        )
        .map(|(core_count, routing, benchmark, vc_count)| Configuration {
            core_count: *core_count,
            routing: *routing,
            benchmark: *benchmark,
            vc_count: *vc_count,
        })
        .enumerate()
    }
}

fn position<T: PartialEq>(axis: &[T], value: &T) -> Option<usize> {
    axis.iter().position(|v| v == value)
}

fn check_axis<T: PartialEq + fmt::Debug>(name: &str, axis: &[T], errors: &mut Vec<String>) {
    if axis.is_empty() {
        errors.push(format!("{name} must not be empty"));
        return;
    }
    for (i, value) in axis.iter().enumerate() {
        if axis[..i].contains(value) {
            errors.push(format!("{name} contains duplicate {value:?}"));
        }
    }
}
