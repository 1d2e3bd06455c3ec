// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Collects one [SaturationResult] per configuration.
//!
//! Results are stored under the configuration's position in the
//! [ConfigSpace] enumeration and always reported in that order, regardless
//! of the order they were recorded in.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config_space::{ConfigSpace, Configuration};
use crate::record::SaturationResult;
use crate::sweep_error;
use crate::types::SweepResult;

pub struct ResultAggregator {
    space: ConfigSpace,
    results: BTreeMap<usize, SaturationResult>,
}

impl ResultAggregator {
    #[must_use]
    pub fn new(space: &ConfigSpace) -> Self {
        Self {
            space: space.clone(),
            results: BTreeMap::new(),
        }
    }

    /// Store the result for the configuration at `index`.
    ///
    /// Each configuration accepts exactly one result.
    pub fn record(&mut self, index: usize, result: SaturationResult) -> SweepResult {
        if index >= self.space.len() {
            return sweep_error!(format!(
                "result index {index} out of range for {} configurations",
                self.space.len()
            ));
        }
        if self.results.contains_key(&index) {
            return sweep_error!(format!("result already recorded for configuration {index}"));
        }
        self.results.insert(index, result);
        Ok(())
    }

    /// Store the result for `configuration`, which must be part of the space.
    pub fn record_for(
        &mut self,
        configuration: &Configuration,
        result: SaturationResult,
    ) -> SweepResult {
        match self.space.index_of(configuration) {
            Some(index) => self.record(index, result),
            None => sweep_error!(format!("{configuration} is not part of the configuration space")),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SaturationResult> {
        self.results.get(&index)
    }

    #[must_use]
    pub fn get_for(&self, configuration: &Configuration) -> Option<&SaturationResult> {
        self.space
            .index_of(configuration)
            .and_then(|index| self.results.get(&index))
    }

    /// Number of results recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True once every configuration has a result.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.results.len() == self.space.len()
    }

    /// Build the report, in enumeration order.
    ///
    /// Does not modify the stored results so can be called repeatedly.
    #[must_use]
    pub fn report(&self) -> Report {
        let entries = self
            .results
            .iter()
            .filter_map(|(index, result)| {
                self.space
                    .configuration_at(*index)
                    .map(|configuration| ReportEntry {
                        index: *index,
                        configuration,
                        result: result.clone(),
                    })
            })
            .collect();
        Report { entries }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportEntry {
    pub index: usize,
    pub configuration: Configuration,
    pub result: SaturationResult,
}

/// The final report: one entry per configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    #[must_use]
    pub fn num_failed(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_failed()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.configuration)?;
            match &entry.result {
                // An empty curve has nothing to print
                SaturationResult::Curve(points) if points.is_empty() => {}
                result => writeln!(f, "{result}")?,
            }
        }
        Ok(())
    }
}
