// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! # NoC saturation sweeps
//!
//! `nocsweep` runs the Garnet synthetic traffic simulation over a space of
//! network configurations, raising the offered load until each one
//! saturates, and reports the result per configuration.
//!
//! For example:
//!   nocsweep --progress saturation --core-counts 16,64 --vc-counts 4

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{Context, bail};
use log::{LevelFilter, info, warn};
use nocsweep::config::{self, Mode, Settings};
use nocsweep::run;
use nocsweep_engine::controller::Pass;

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Sweep offered load over NoC configurations until they saturate")]
struct Cli {
    /// Enable debug log messages
    #[arg(short, long)]
    debug: bool,

    /// TOML file of settings (default: nocsweep.toml if present)
    #[arg(short, long)]
    conf_file: Option<PathBuf>,

    /// Show a progress bar over configurations
    #[arg(long)]
    progress: bool,

    /// Also write the report to this file as YAML
    #[arg(long)]
    results_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: CommandArg,
}

#[derive(Debug, Subcommand)]
enum CommandArg {
    /// Build the simulator
    Build {
        #[command(flatten)]
        settings: Settings,
    },
    /// Record the latency curve of every configuration up to a ceiling
    Sweep {
        #[command(flatten)]
        settings: Settings,
    },
    /// Find the saturation throughput of every configuration
    Saturation {
        #[command(flatten)]
        settings: Settings,
    },
    /// Rebuild a report from the output of an earlier run
    Replay {
        /// Which search to replay
        #[arg(long, value_enum)]
        mode: Mode,

        #[command(flatten)]
        settings: Settings,
    },
}

/// Configure the logger level and formating string.
fn setup_logger(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    setup_logger(args.debug);

    let (mode, pass, settings) = match args.command {
        CommandArg::Build { settings } => {
            // Build settings do not depend on the mode
            let settings = config::load(Mode::Sweep, args.conf_file.as_deref(), settings)?;
            let plan = settings.resolve(Mode::Sweep)?;
            return run::build(&plan);
        }
        CommandArg::Sweep { settings } => (Mode::Sweep, Pass::Live, settings),
        CommandArg::Saturation { settings } => (Mode::Saturation, Pass::Live, settings),
        CommandArg::Replay { mode, settings } => (mode, Pass::Replay, settings),
    };

    let settings = config::load(mode, args.conf_file.as_deref(), settings)?;
    let plan = settings
        .resolve(mode)
        .wrap_err("Invalid nocsweep settings")?;

    let report = run::sweep(&plan, pass, args.progress)?;
    print!("{report}");

    if let Some(results_file) = &args.results_file {
        run::save_report(&report, results_file)?;
        info!("Report written to {}", results_file.display());
    }

    let num_failed = report.num_failed();
    if num_failed == report.entries().len() && num_failed > 0 {
        bail!("All {num_failed} configurations failed");
    }
    if num_failed > 0 {
        warn!("{num_failed} of {} configurations failed", report.entries().len());
    }
    Ok(())
}
