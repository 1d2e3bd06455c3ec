// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clap::Parser;
use figment::Jail;
use nocsweep::config::{CONF_FILE, Mode, Settings, load};
use nocsweep_engine::config_space::{Benchmark, RoutingAlgorithm};
use nocsweep_engine::policy::StoppingRule;

#[derive(Parser)]
struct SettingsCli {
    #[command(flatten)]
    settings: Settings,
}

const PROFILES: &str = r#"
[default]
scons_jobs = 4

[sweep]
latency_ceiling = 150.0

[saturation]
core_counts = [16]
output_root = "/scratch/sat"
"#;

#[test]
fn presets_apply_without_a_file() {
    Jail::expect_with(|_| {
        let settings = load(Mode::Saturation, None, Settings::default()).unwrap();
        assert_eq!(settings, Settings::for_mode(Mode::Saturation));
        assert_eq!(settings.output_root, Some(PathBuf::from("./results_sat_thrpt")));
        assert_eq!(settings.vc_counts, Some(vec![1, 2, 4]));

        let settings = load(Mode::Sweep, None, Settings::default()).unwrap();
        assert_eq!(settings.output_root, Some(PathBuf::from("./results")));
        assert_eq!(settings.core_counts, Some(vec![64, 256]));
        Ok(())
    });
}

#[test]
fn selected_mode_table_overrides_default_table() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, PROFILES)?;

        let saturation = load(Mode::Saturation, None, Settings::default()).unwrap();
        assert_eq!(saturation.scons_jobs, Some(4));
        assert_eq!(saturation.core_counts, Some(vec![16]));
        assert_eq!(saturation.output_root, Some(PathBuf::from("/scratch/sat")));
        assert_eq!(saturation.latency_ceiling, Some(200.0));

        let sweep = load(Mode::Sweep, None, Settings::default()).unwrap();
        assert_eq!(sweep.scons_jobs, Some(4));
        assert_eq!(sweep.core_counts, Some(vec![64, 256]));
        assert_eq!(sweep.latency_ceiling, Some(150.0));
        Ok(())
    });
}

#[test]
fn environment_overrides_file_and_cli_overrides_environment() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, PROFILES)?;
        jail.set_env("NOCSWEEP_SCONS_JOBS", "8");
        jail.set_env("NOCSWEEP_CORE_COUNTS", "[64]");
        jail.set_env("NOCSWEEP_ROUTING_ALGORITHMS", "[XY]");

        let settings = load(Mode::Saturation, None, Settings::default()).unwrap();
        assert_eq!(settings.scons_jobs, Some(8));
        assert_eq!(settings.core_counts, Some(vec![64]));
        assert_eq!(settings.routing_algorithms, Some(vec![RoutingAlgorithm::Xy]));

        let cli = Settings {
            scons_jobs: Some(2),
            ..Settings::default()
        };
        let settings = load(Mode::Saturation, None, cli).unwrap();
        assert_eq!(settings.scons_jobs, Some(2));
        assert_eq!(settings.core_counts, Some(vec![64]));
        Ok(())
    });
}

#[test]
fn explicit_file_replaces_default_file() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, PROFILES)?;
        jail.create_file("other.toml", "[default]\nscons_jobs = 32\n")?;

        let settings = load(Mode::Saturation, Some(Path::new("other.toml")), Settings::default())
            .unwrap();
        assert_eq!(settings.scons_jobs, Some(32));
        assert_eq!(settings.core_counts, Some(vec![16, 64, 256]));
        Ok(())
    });
}

#[test]
fn explicit_file_must_exist() {
    Jail::expect_with(|jail| {
        let err = load(Mode::Sweep, Some(Path::new("missing.toml")), Settings::default())
            .unwrap_err();
        let io_err = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), ErrorKind::NotFound);

        let dir = jail.directory().to_path_buf();
        let err = load(Mode::Sweep, Some(dir.as_path()), Settings::default()).unwrap_err();
        let io_err = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), ErrorKind::IsADirectory);
        Ok(())
    });
}

#[test]
fn badly_typed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file(CONF_FILE, "[default]\ncore_counts = \"many\"\n")?;
        assert!(load(Mode::Sweep, None, Settings::default()).is_err());
        Ok(())
    });
}

#[test]
fn command_line_flags() {
    let cli = SettingsCli::try_parse_from([
        "nocsweep",
        "--core-counts",
        "16,64",
        "--routing-algorithms",
        "XY,ESCAPE_VC",
        "--benchmarks",
        "BIT_ROTATION",
        "--latency-ceiling",
        "300",
        "--build",
        "true",
    ])
    .unwrap();

    let settings = cli.settings;
    assert_eq!(settings.core_counts, Some(vec![16, 64]));
    assert_eq!(
        settings.routing_algorithms,
        Some(vec![RoutingAlgorithm::Xy, RoutingAlgorithm::EscapeVc])
    );
    assert_eq!(settings.benchmarks, Some(vec![Benchmark::BitRotation]));
    assert_eq!(settings.latency_ceiling, Some(300.0));
    assert_eq!(settings.build, Some(true));
    assert_eq!(settings.vc_counts, None);
}

#[test]
fn resolve_picks_rule_for_mode() {
    let settings = Settings::for_mode(Mode::Sweep);
    assert_eq!(
        settings.resolve(Mode::Sweep).unwrap().rule,
        StoppingRule::sweep_default()
    );
    assert_eq!(
        settings.resolve(Mode::Saturation).unwrap().rule,
        StoppingRule::saturation_default()
    );
}

#[test]
fn resolve_reports_every_problem() {
    let mut settings = Settings::for_mode(Mode::Saturation);
    settings.merge(Settings {
        core_counts: Some(vec![16, 32]),
        load_step: Some(0.0),
        scons_jobs: Some(0),
        ..Settings::default()
    });

    let err = settings.resolve(Mode::Saturation).unwrap_err().to_string();
    assert!(err.contains("32 cores cannot be laid out as a square mesh"), "{err}");
    assert!(err.contains("load step must be positive"), "{err}");
    assert!(err.contains("scons_jobs must be positive"), "{err}");
}

#[test]
#[should_panic(expected = "core_counts is not set")]
fn resolve_requires_every_setting() {
    Settings::default().resolve(Mode::Sweep).unwrap();
}

#[test]
fn offered_load_above_one_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("NOCSWEEP_MAX_OFFERED_LOAD", "5.0");
        let settings = load(Mode::Saturation, None, Settings::default()).unwrap();
        assert_eq!(settings.max_offered_load, Some(5.0));

        let err = settings.resolve(Mode::Saturation).unwrap_err().to_string();
        assert!(err.contains("maximum offered load must not exceed 1"), "{err}");
        Ok(())
    });
}
