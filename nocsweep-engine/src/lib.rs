// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `nocsweep-engine` - the search core of the saturation sweep
//!
//! The engine enumerates interconnect [configurations](crate::config_space)
//! and, for each one, drives a [controller](crate::controller) that probes
//! the network at increasing offered load until a
//! [stopping rule](crate::policy) fires. Results are collected by the
//! [aggregator](crate::aggregator) keyed by the position of the
//! configuration in the enumeration.
//!
//! The simulator itself is never touched directly. Running it, naming its
//! output and scraping a metric from that output are all behind the
//! [collaborator traits](crate::traits), so the search can be exercised with
//! the stubs in [test_helpers](crate::test_helpers).
//!
//! # Simple Application
//!
//! ```rust
//! use nocsweep_engine::config_space::{Benchmark, ConfigSpace, RoutingAlgorithm};
//! use nocsweep_engine::controller::{Pass, SweepController};
//! use nocsweep_engine::policy::StoppingRule;
//! use nocsweep_engine::record::SaturationResult;
//! use nocsweep_engine::schedule::LoadSchedule;
//! use nocsweep_engine::test_helpers::SyntheticSimulator;
//!
//! let space = ConfigSpace::new(
//!     vec![16],
//!     vec![RoutingAlgorithm::Xy],
//!     vec![Benchmark::Shuffle],
//!     vec![2],
//! )
//! .expect("axes should be valid");
//!
//! // Latency grows tenfold once the load passes 0.31
//! let sim = SyntheticSimulator::new(|probe| {
//!     Some(if probe.offered_load > 0.31 { 100.0 } else { 10.0 })
//! });
//! let mut controller = SweepController::with_simulator(
//!     &sim,
//!     LoadSchedule::default(),
//!     StoppingRule::saturation_default(),
//! );
//!
//! let results = controller
//!     .sweep_space(&space, Pass::Live, |_, _| {})
//!     .expect("results should be recorded");
//! match results.get(0) {
//!     Some(SaturationResult::Throughput(load)) => assert!((load - 0.32).abs() < 1e-9),
//!     other => panic!("unexpected result {other:?}"),
//! }
//! ```

pub mod aggregator;
pub mod config_space;
pub mod controller;
pub mod policy;
pub mod record;
pub mod schedule;
pub mod test_helpers;
pub mod traits;
pub mod types;

/// Name of the simulator statistic used as the latency metric by default.
pub const DEFAULT_METRIC: &str = "average_flit_latency";
