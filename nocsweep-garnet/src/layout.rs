// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Output directory layout.
//!
//! Each probe gets its own directory:
//!
//! ```text
//! <root>/<cores>/<BENCHMARK>/<ROUTING>/vc-<vcs>/inj-<load>
//! ```
//!
//! with the load printed to two decimal places.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use nocsweep_engine::config_space::Configuration;
use nocsweep_engine::record::Probe;
use nocsweep_engine::traits::ArtifactLayout;
use nocsweep_engine::types::{SweepError, SweepResult};

/// File held in the output root while a controller is using it.
pub const LOCK_FILE_NAME: &str = ".nocsweep.lock";

#[derive(Clone, Debug)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every probe of `configuration`.
    #[must_use]
    pub fn configuration_dir(&self, configuration: &Configuration) -> PathBuf {
        self.root
            .join(configuration.core_count.to_string())
            .join(configuration.benchmark.name())
            .join(configuration.routing.name())
            .join(format!("vc-{}", configuration.vc_count))
    }

    /// Remove everything below the root apart from the lock file.
    pub fn clean(&self) -> SweepResult {
        if !self.root.exists() {
            return fs::create_dir_all(&self.root).map_err(|e| SweepError::io(&self.root, &e));
        }

        let entries = fs::read_dir(&self.root).map_err(|e| SweepError::io(&self.root, &e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SweepError::io(&self.root, &e))?;
            let path = entry.path();
            if entry.file_name() == LOCK_FILE_NAME {
                continue;
            }
            debug!("Removing {}", path.display());
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| SweepError::io(&path, &e))?;
        }
        Ok(())
    }
}

impl ArtifactLayout for OutputLayout {
    fn artifact_for(&self, probe: &Probe) -> PathBuf {
        self.configuration_dir(&probe.configuration)
            .join(format!("inj-{:.2}", probe.offered_load))
    }
}

/// Exclusive use of an output root.
///
/// Two controllers writing or reading the same root at once would race on the
/// same per-probe directories, so the second one to start is refused. The
/// lock is released when this is dropped.
#[derive(Debug)]
pub struct OutputLock {
    path: PathBuf,
}

impl OutputLock {
    pub fn acquire(root: &Path) -> Result<Self, SweepError> {
        fs::create_dir_all(root).map_err(|e| SweepError::io(root, &e))?;

        let path = root.join(LOCK_FILE_NAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(SweepError::Io {
                    path,
                    message: "output root is in use by another run".to_string(),
                });
            }
            Err(e) => return Err(SweepError::io(&path, &e)),
        };
        writeln!(file, "{}", std::process::id()).map_err(|e| SweepError::io(&path, &e))?;

        debug!("Locked {}", root.display());
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OutputLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Unable to remove {}: {e}", self.path.display());
        }
    }
}
