// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Running a [SweepPlan] against the Garnet simulator.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use indicatif::ProgressBar;
use log::info;
use nocsweep_engine::aggregator::Report;
use nocsweep_engine::controller::{Pass, SweepController};
use nocsweep_garnet::layout::{OutputLayout, OutputLock};
use nocsweep_garnet::runner::{GarnetRunner, build_simulator};
use nocsweep_garnet::stats::StatsExtractor;

use crate::config::SweepPlan;

/// Build the simulator named by the plan.
pub fn build(plan: &SweepPlan) -> Result<()> {
    build_simulator(&plan.simulator.binary, plan.scons_jobs)
        .wrap_err_with(|| format!("Failed to build {}", plan.simulator.binary.display()))
}

/// A controller for `plan` that writes below `layout`.
#[must_use]
pub fn controller(plan: &SweepPlan, layout: OutputLayout) -> SweepController {
    SweepController::new(
        Box::new(GarnetRunner::new(plan.simulator.clone())),
        Box::new(layout),
        Box::new(StatsExtractor::new()),
        plan.schedule,
        plan.rule,
    )
    .with_metric(&plan.metric)
}

/// Search every configuration of the plan and return the report.
///
/// The output root is locked for the whole pass. A live pass first cleans
/// the output root and builds the simulator if the plan asks for it.
pub fn sweep(plan: &SweepPlan, pass: Pass, progress: bool) -> Result<Report> {
    let root = &plan.output_root;
    let _lock = OutputLock::acquire(root)
        .wrap_err_with(|| format!("Failed to lock {}", root.display()))?;

    let layout = OutputLayout::new(root);
    if pass == Pass::Live {
        if plan.clean_output {
            info!("Cleaning {}", layout.root().display());
            layout
                .clean()
                .wrap_err_with(|| format!("Failed to clean {}", layout.root().display()))?;
        }
        if plan.build {
            build(plan)?;
        }
    }

    info!(
        "{} pass over {} configurations in {} mode",
        match pass {
            Pass::Live => "Live",
            Pass::Replay => "Replay",
        },
        plan.space.len(),
        plan.mode
    );

    let mut controller = controller(plan, layout);
    let progress_bar = progress.then(|| ProgressBar::new(plan.space.len() as u64));
    let results = controller.sweep_space(&plan.space, pass, |configuration, _| {
        if let Some(progress_bar) = &progress_bar {
            progress_bar.set_message(configuration.to_string());
            progress_bar.inc(1);
        }
    })?;
    if let Some(progress_bar) = progress_bar {
        progress_bar.finish();
    }

    Ok(results.report())
}

/// Write `report` to `path` as YAML.
pub fn save_report(report: &Report, path: &Path) -> Result<()> {
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    serde_yaml::to_writer(BufWriter::new(file), report)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))
}
