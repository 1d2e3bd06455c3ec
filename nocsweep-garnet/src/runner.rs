// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Running the simulator as a child process.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use log::{debug, error, info, warn};
use nocsweep_engine::record::Probe;
use nocsweep_engine::traits::RunExecutor;
use nocsweep_engine::types::{SweepError, SweepResult};

use crate::command::SimulatorSettings;

/// Tool used to build the simulator.
pub const BUILD_TOOL: &str = "scons";

/// Runs one simulator process per probe, waiting for it to finish.
///
/// A run that exits with an error is only logged: whether it produced
/// anything usable is decided when its output is read.
#[derive(Clone, Debug, Default)]
pub struct GarnetRunner {
    settings: SimulatorSettings,
}

impl GarnetRunner {
    #[must_use]
    pub fn new(settings: SimulatorSettings) -> Self {
        Self { settings }
    }
}

impl RunExecutor for GarnetRunner {
    fn execute(&mut self, probe: &Probe, artifact: &Path) -> SweepResult {
        let args = self.settings.args_for(probe, artifact)?;
        let mut command = Command::new(&self.settings.binary);
        command.args(&args);

        let output = run(&mut command)?;
        if !output.status.success() {
            warn!("FAILED: {probe} ({})", output.status);
            log_output(&output);
        }
        Ok(())
    }
}

/// Build the simulator binary with `jobs` parallel jobs.
pub fn build_simulator(binary: &Path, jobs: usize) -> SweepResult {
    let mut command = Command::new(BUILD_TOOL);
    command.arg(format!("-j{jobs}")).arg(binary);

    info!("Building {}", binary.display());
    let output = run(&mut command)?;
    if !output.status.success() {
        error!("FAILED: build of {}", binary.display());
        log_output(&output);
        return Err(SweepError::Execution(format!(
            "{BUILD_TOOL} failed to build {} ({})",
            binary.display(),
            output.status
        )));
    }
    Ok(())
}

fn run(command: &mut Command) -> Result<Output, SweepError> {
    let program = PathBuf::from(command.get_program());
    debug!("Running {command:?}");

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            SweepError::Execution(format!("unable to run {}: {e}", program.display()))
        })
}

fn log_output(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        info!("{stdout}");
    }
    if !stderr.trim().is_empty() {
        error!("{stderr}");
    }
}
