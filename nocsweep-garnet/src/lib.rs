// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Collaborators that connect the `nocsweep` engine to the Garnet standalone
//! build of gem5.
//!
//! - [layout]: where the output of each run is written.
//! - [command]: the simulator command line for a probe.
//! - [runner]: running the simulator (and building it).
//! - [stats]: reading the latency back out of the statistics file.
//! - [test_helpers]: a fake simulator for tests.

pub mod command;
pub mod layout;
pub mod runner;
pub mod stats;
pub mod test_helpers;
