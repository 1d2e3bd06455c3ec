// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Command line of a single Garnet synthetic traffic run.

use std::path::{Path, PathBuf};

use nocsweep_engine::record::Probe;
use nocsweep_engine::types::SweepError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BINARY: &str = "build/Garnet_standalone/gem5.opt";
pub const DEFAULT_SCRIPT: &str = "configs/example/garnet_synth_traffic.py";

/// Fixed settings passed to every simulator run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorSettings {
    pub binary: PathBuf,
    pub script: PathBuf,
    pub topology: String,
    pub network: String,
    pub sim_cycles: u64,
    pub inj_vnet: u32,
    pub router_latency: u32,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            script: PathBuf::from(DEFAULT_SCRIPT),
            topology: "Mesh_XY".to_string(),
            network: "garnet2.0".to_string(),
            sim_cycles: 10_000,
            inj_vnet: 0,
            router_latency: 1,
        }
    }
}

impl SimulatorSettings {
    /// Arguments for running `probe` with its output written to `out_dir`.
    ///
    /// The mesh is square, so the row count is derived from the core count.
    pub fn args_for(&self, probe: &Probe, out_dir: &Path) -> Result<Vec<String>, SweepError> {
        let configuration = &probe.configuration;
        let cores = configuration.core_count;
        let rows = mesh_rows(cores)?;

        Ok(vec![
            "-d".to_string(),
            out_dir.display().to_string(),
            self.script.display().to_string(),
            format!("--topology={}", self.topology),
            format!("--num-cpus={cores}"),
            format!("--num-dirs={cores}"),
            format!("--mesh-rows={rows}"),
            format!("--inj-vnet={}", self.inj_vnet),
            format!("--network={}", self.network),
            format!("--router-latency={}", self.router_latency),
            format!("--vcs-per-vnet={}", configuration.vc_count),
            format!("--sim-cycles={}", self.sim_cycles),
            format!("--injectionrate={:.2}", probe.offered_load),
            format!("--synthetic={}", configuration.benchmark.synthetic_name()),
            format!(
                "--routing-algorithm={}",
                configuration.routing.simulator_index()
            ),
        ])
    }
}

/// Number of rows of the square mesh holding `core_count` routers.
pub fn mesh_rows(core_count: usize) -> Result<usize, SweepError> {
    let rows = (core_count as f64).sqrt().round() as usize;
    if core_count == 0 || rows * rows != core_count {
        return Err(SweepError::InvalidConfig(format!(
            "{core_count} cores cannot be laid out as a square mesh"
        )));
    }
    Ok(rows)
}
