// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Front end of the `nocsweep` command-line tool.
//!
//! [config] layers the settings of a run and resolves them into a
//! [config::SweepPlan], [run] builds the controller for a plan and writes the
//! report.

pub mod config;
pub mod run;
