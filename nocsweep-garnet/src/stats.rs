// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Reading a metric from the statistics a run leaves behind.
//!
//! gem5 writes lines of the form
//!
//! ```text
//! system.ruby.network.average_flit_latency    19.562500   (Unspecified)
//! ```
//!
//! The metric name is matched case-insensitively, either on its own or as the
//! last component of a dotted path, and the first whitespace-separated token
//! after it is the value. Every file below the run directory is searched in
//! path order and the last match found wins. Latencies are never negative.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::trace;
use nocsweep_engine::traits::MetricExtractor;
use nocsweep_engine::types::SweepError;
use regex::Regex;

#[derive(Clone, Copy, Debug, Default)]
pub struct StatsExtractor;

impl StatsExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MetricExtractor for StatsExtractor {
    fn extract(&self, artifact: &Path, metric: &str) -> Result<f64, SweepError> {
        if !artifact.exists() {
            return Err(SweepError::ArtifactMissing {
                path: artifact.to_path_buf(),
            });
        }

        let re = metric_regex(metric)?;
        let mut files = Vec::new();
        collect_files(artifact, &mut files).map_err(|e| SweepError::io(artifact, &e))?;
        files.sort();

        let mut found = None;
        for file in &files {
            let bytes = fs::read(file).map_err(|e| SweepError::io(file, &e))?;
            let contents = String::from_utf8_lossy(&bytes);
            for caps in re.captures_iter(&contents) {
                trace!("{}: {}", file.display(), &caps[0]);
                found = Some(caps["value"].to_string());
            }
        }

        let Some(value) = found else {
            return Err(SweepError::MetricAbsent {
                metric: metric.to_string(),
                path: artifact.to_path_buf(),
            });
        };

        match value.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(SweepError::MalformedMetric {
                metric: metric.to_string(),
                path: artifact.to_path_buf(),
                value,
            }),
        }
    }
}

fn metric_regex(metric: &str) -> Result<Regex, SweepError> {
    if metric.trim().is_empty() {
        return Err(SweepError::InvalidConfig(
            "metric name must not be empty".to_string(),
        ));
    }
    let pattern = format!(
        r"(?im)^[ \t]*(?:\S+\.)?{}[ \t]+(?<value>\S+)",
        regex::escape(metric.trim())
    );
    Regex::new(&pattern).map_err(|e| SweepError::InvalidConfig(e.to_string()))
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    if path.is_file() {
        files.push(path.to_path_buf());
        return Ok(());
    }
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
