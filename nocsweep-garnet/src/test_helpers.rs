// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A stand-in simulator for tests that run real processes.

#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
#[cfg(unix)]
use std::path::{Path, PathBuf};

/// Shell script accepting the simulator command line. It writes a stats file
/// whose flit latency is `10 + 1000 * rate^2` for the requested injection
/// rate.
pub const FAKE_SIMULATOR: &str = r#"#!/bin/sh
out="$2"
rate=0
for arg in "$@"; do
    case "$arg" in
        --injectionrate=*) rate="${arg#--injectionrate=}" ;;
    esac
done
mkdir -p "$out"
awk -v r="$rate" 'BEGIN { printf "system.ruby.network.average_flit_latency %f\n", 10 + 1000 * r * r }' > "$out/stats.txt"
"#;

/// Write [FAKE_SIMULATOR] into `dir` as an executable and return its path.
#[cfg(unix)]
pub fn fake_simulator(dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join("gem5.opt");
    fs::write(&path, FAKE_SIMULATOR)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}
