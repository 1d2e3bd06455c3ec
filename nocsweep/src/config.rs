// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Settings of a run.
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. the preset of the selected [Mode],
//! 2. a TOML file ([CONF_FILE] in the working directory, or a file given on
//!    the command line) with optional `[default]`, `[sweep]` and
//!    `[saturation]` tables,
//! 3. environment variables prefixed with [ENV_PREFIX],
//! 4. command-line flags.

use std::fmt;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use color_eyre::eyre::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use nocsweep_engine::DEFAULT_METRIC;
use nocsweep_engine::config_space::{Benchmark, ConfigSpace, RoutingAlgorithm};
use nocsweep_engine::policy::StoppingRule;
use nocsweep_engine::schedule::LoadSchedule;
use nocsweep_engine::types::SweepError;
use nocsweep_garnet::command::{DEFAULT_BINARY, DEFAULT_SCRIPT, SimulatorSettings, mesh_rows};
use serde::{Deserialize, Serialize};

/// Configuration file read from the working directory when none is given.
pub const CONF_FILE: &str = "nocsweep.toml";

/// Prefix of environment variables that override settings.
pub const ENV_PREFIX: &str = "NOCSWEEP_";

/// Which search is run for every configuration.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Record the latency curve up to a fixed latency ceiling
    Sweep,

    /// Find the offered load at which latency degrades past the low-load
    /// baseline
    Saturation,
}

impl Mode {
    /// Name of the configuration file table for this mode.
    #[must_use]
    pub fn profile(&self) -> &'static str {
        match self {
            Mode::Sweep => "sweep",
            Mode::Saturation => "saturation",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.profile())
    }
}

/// Every setting that can come from a file, the environment or the command
/// line.
///
/// All fields are optional so that a layer only overrides what it sets.
#[derive(Args, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Settings {
    /// Simulator binary to run (and build)
    #[arg(long)]
    pub simulator_binary: Option<PathBuf>,

    /// Simulation script passed to the simulator
    #[arg(long)]
    pub simulator_script: Option<PathBuf>,

    /// Directory all run output is written below
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// Core counts to sweep (each must be a square number)
    #[arg(long, value_delimiter = ',')]
    pub core_counts: Option<Vec<usize>>,

    /// Routing algorithms to sweep
    #[arg(long, value_delimiter = ',')]
    pub routing_algorithms: Option<Vec<RoutingAlgorithm>>,

    /// Synthetic traffic patterns to sweep
    #[arg(long, value_delimiter = ',')]
    pub benchmarks: Option<Vec<Benchmark>>,

    /// Virtual channels per virtual network to sweep
    #[arg(long, value_delimiter = ',')]
    pub vc_counts: Option<Vec<usize>>,

    /// Offered load of the first probe (flits/node/cycle)
    #[arg(long)]
    pub start_load: Option<f64>,

    /// Increase in offered load between probes
    #[arg(long)]
    pub load_step: Option<f64>,

    /// A search that reaches this load without stopping has failed
    #[arg(long)]
    pub max_offered_load: Option<f64>,

    /// Sweep mode: stop once latency exceeds this many cycles
    #[arg(long)]
    pub latency_ceiling: Option<f64>,

    /// Saturation mode: stop once latency exceeds the baseline by this factor
    #[arg(long)]
    pub degradation_factor: Option<f64>,

    /// Saturation mode: stop once the baseline itself exceeds this many cycles
    #[arg(long)]
    pub baseline_ceiling: Option<f64>,

    /// Statistic read from the simulator output
    #[arg(long)]
    pub metric: Option<String>,

    /// Cycles simulated per probe
    #[arg(long)]
    pub sim_cycles: Option<u64>,

    /// Virtual network traffic is injected on
    #[arg(long)]
    pub inj_vnet: Option<u32>,

    /// Router pipeline latency in cycles
    #[arg(long)]
    pub router_latency: Option<u32>,

    /// Simulator topology
    #[arg(long)]
    pub topology: Option<String>,

    /// Simulator network model
    #[arg(long)]
    pub network: Option<String>,

    /// Build the simulator before a live run
    #[arg(long)]
    pub build: Option<bool>,

    /// Parallel jobs used when building the simulator
    #[arg(long)]
    pub scons_jobs: Option<usize>,

    /// Empty the output root before a live run
    #[arg(long)]
    pub clean_output: Option<bool>,
}

impl Settings {
    /// The preset for `mode`.
    ///
    /// Every field is set, including the thresholds of the other mode, so
    /// that each layer above can be partial.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        let (output_root, core_counts, vc_counts) = match mode {
            Mode::Sweep => ("./results", vec![64, 256], vec![4]),
            Mode::Saturation => ("./results_sat_thrpt", vec![16, 64, 256], vec![1, 2, 4]),
        };

        Self {
            simulator_binary: Some(PathBuf::from(DEFAULT_BINARY)),
            simulator_script: Some(PathBuf::from(DEFAULT_SCRIPT)),
            output_root: Some(PathBuf::from(output_root)),
            core_counts: Some(core_counts),
            routing_algorithms: Some(vec![
                RoutingAlgorithm::Xy,
                RoutingAlgorithm::WestFirst,
                RoutingAlgorithm::EscapeVc,
            ]),
            benchmarks: Some(Benchmark::ALL.to_vec()),
            vc_counts: Some(vc_counts),
            start_load: Some(0.02),
            load_step: Some(0.02),
            max_offered_load: Some(1.0),
            latency_ceiling: Some(200.0),
            degradation_factor: Some(6.0),
            baseline_ceiling: Some(70.0),
            metric: Some(DEFAULT_METRIC.to_string()),
            sim_cycles: Some(10_000),
            inj_vnet: Some(0),
            router_latency: Some(1),
            topology: Some("Mesh_XY".to_string()),
            network: Some("garnet2.0".to_string()),
            build: Some(false),
            scons_jobs: Some(15),
            clean_output: Some(false),
        }
    }

    /// Override every field that `cli` sets.
    pub fn merge(&mut self, cli: Settings) {
        macro_rules! merge_fields {
            ($($field:ident),* $(,)?) => {
                $(
                    if cli.$field.is_some() {
                        self.$field = cli.$field;
                    }
                )*
            };
        }

        merge_fields!(
            simulator_binary,
            simulator_script,
            output_root,
            core_counts,
            routing_algorithms,
            benchmarks,
            vc_counts,
            start_load,
            load_step,
            max_offered_load,
            latency_ceiling,
            degradation_factor,
            baseline_ceiling,
            metric,
            sim_cycles,
            inj_vnet,
            router_latency,
            topology,
            network,
            build,
            scons_jobs,
            clean_output,
        );
    }

    /// Check the settings and turn them into a plan for `mode`.
    ///
    /// All problems found are reported together.
    pub fn resolve(&self, mode: Mode) -> Result<SweepPlan, SweepError> {
        let mut errors = Vec::new();

        let space = ConfigSpace::new(
            required(&self.core_counts, "core_counts")?,
            required(&self.routing_algorithms, "routing_algorithms")?,
            required(&self.benchmarks, "benchmarks")?,
            required(&self.vc_counts, "vc_counts")?,
        );
        let space = collect(space, &mut errors);
        if let Some(space) = &space {
            for cores in space.core_counts() {
                collect(mesh_rows(*cores), &mut errors);
            }
        }

        let schedule = collect(
            LoadSchedule::new(
                required(&self.start_load, "start_load")?,
                required(&self.load_step, "load_step")?,
                required(&self.max_offered_load, "max_offered_load")?,
            ),
            &mut errors,
        );

        let rule = match mode {
            Mode::Sweep => StoppingRule::AbsoluteCeiling {
                latency_ceiling: required(&self.latency_ceiling, "latency_ceiling")?,
            },
            Mode::Saturation => StoppingRule::RelativeDegradationOrBaseline {
                degradation_factor: required(&self.degradation_factor, "degradation_factor")?,
                baseline_ceiling: required(&self.baseline_ceiling, "baseline_ceiling")?,
            },
        };
        collect(rule.validate(), &mut errors);

        let metric = required(&self.metric, "metric")?;
        if metric.trim().is_empty() {
            errors.push("metric must not be empty".to_string());
        }

        let scons_jobs = required(&self.scons_jobs, "scons_jobs")?;
        if scons_jobs == 0 {
            errors.push("scons_jobs must be positive".to_string());
        }

        let simulator = SimulatorSettings {
            binary: required(&self.simulator_binary, "simulator_binary")?,
            script: required(&self.simulator_script, "simulator_script")?,
            topology: required(&self.topology, "topology")?,
            network: required(&self.network, "network")?,
            sim_cycles: required(&self.sim_cycles, "sim_cycles")?,
            inj_vnet: required(&self.inj_vnet, "inj_vnet")?,
            router_latency: required(&self.router_latency, "router_latency")?,
        };

        match (space, schedule) {
            (Some(space), Some(schedule)) if errors.is_empty() => Ok(SweepPlan {
                mode,
                space,
                schedule,
                rule,
                metric: metric.trim().to_string(),
                simulator,
                output_root: required(&self.output_root, "output_root")?,
                build: required(&self.build, "build")?,
                scons_jobs,
                clean_output: required(&self.clean_output, "clean_output")?,
            }),
            _ => Err(SweepError::InvalidConfig(errors.join("\n"))),
        }
    }
}

fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T, SweepError> {
    value
        .clone()
        .ok_or_else(|| SweepError::InvalidConfig(format!("{name} is not set")))
}

/// Keep the value, or the message of the error for reporting later.
fn collect<T>(result: Result<T, SweepError>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(SweepError::InvalidConfig(msg)) => {
            errors.push(msg);
            None
        }
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    }
}

/// Everything needed to run a sweep, checked.
#[derive(Clone, Debug)]
pub struct SweepPlan {
    pub mode: Mode,
    pub space: ConfigSpace,
    pub schedule: LoadSchedule,
    pub rule: StoppingRule,
    pub metric: String,
    pub simulator: SimulatorSettings,
    pub output_root: PathBuf,
    pub build: bool,
    pub scons_jobs: usize,
    pub clean_output: bool,
}

/// The file, environment and preset layers for `mode`.
///
/// An explicitly given `conf_file` must exist. The default [CONF_FILE] is
/// optional.
pub fn figment(mode: Mode, conf_file: Option<&Path>) -> Result<Figment, Error> {
    let toml = match conf_file {
        Some(conf_file) => {
            if conf_file.is_dir() {
                return Err(Error::new(
                    ErrorKind::IsADirectory,
                    format!("{} is not a file path", conf_file.display()),
                ));
            }
            if !conf_file.exists() {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("{} not found", conf_file.display()),
                ));
            }
            Toml::file(conf_file)
        }
        None => Toml::file(CONF_FILE),
    };

    Ok(Figment::new()
        .merge(Serialized::defaults(Settings::for_mode(mode)))
        .merge(toml.nested())
        .merge(Env::prefixed(ENV_PREFIX).global())
        .select(mode.profile()))
}

/// Layer every source of settings for `mode`, with `cli` on top.
pub fn load(mode: Mode, conf_file: Option<&Path>, cli: Settings) -> Result<Settings> {
    let figment = figment(mode, conf_file)?;
    let mut settings: Settings = figment
        .extract()
        .wrap_err("Failed to read nocsweep settings")?;
    settings.merge(cli);
    Ok(settings)
}
