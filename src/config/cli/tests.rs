use super::*;
use crate::config::{ReportFormat, TuneConfig};
use crate::search::StrategyKind;
use std::path::PathBuf;

fn run_args(extra: &[&str]) -> RunArgs {
    let mut argv = vec!["afinar", "run"];
    argv.extend_from_slice(extra);
    match parse_args(argv).unwrap().command {
        Command::Run(args) => args,
        other => panic!("Expected Run command, got {other:?}"),
    }
}

#[test]
fn test_parse_run_defaults() {
    let args = run_args(&[]);
    assert_eq!(args, RunArgs::default());
}

#[test]
fn test_parse_run_with_overrides() {
    let args = run_args(&[
        "--config",
        "tune.yaml",
        "--host",
        "127.0.0.1",
        "--listen-port",
        "6003",
        "--send-port",
        "6005",
        "--strategy",
        "exhaustive",
        "--threshold",
        "-0.5",
        "--n-calls",
        "30",
        "--seed",
        "9",
        "--report",
        "out.yaml",
        "--format",
        "yaml",
    ]);
    assert_eq!(args.config, Some(PathBuf::from("tune.yaml")));
    assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
    assert_eq!(args.listen_port, Some(6003));
    assert_eq!(args.send_port, Some(6005));
    assert_eq!(args.strategy, Some(StrategyKind::Exhaustive));
    assert_eq!(args.threshold, Some(-0.5));
    assert_eq!(args.n_calls, Some(30));
    assert_eq!(args.seed, Some(9));
    assert_eq!(args.report, Some(PathBuf::from("out.yaml")));
    assert_eq!(args.format, Some(ReportFormat::Yaml));
}

#[test]
fn test_parse_invalid_strategy() {
    assert!(parse_args(["afinar", "run", "--strategy", "annealing"]).is_err());
}

#[test]
fn test_parse_invalid_port() {
    assert!(parse_args(["afinar", "run", "--listen-port", "70000"]).is_err());
}

#[test]
fn test_parse_validate_command() {
    let cli = parse_args(["afinar", "validate", "tune.yaml", "--detailed"]).unwrap();
    match cli.command {
        Command::Validate(args) => {
            assert_eq!(args.config, PathBuf::from("tune.yaml"));
            assert!(args.detailed);
        }
        _ => panic!("Expected Validate command"),
    }
}

#[test]
fn test_parse_init_command() {
    let cli = parse_args(["afinar", "init", "-o", "tune.yaml"]).unwrap();
    match cli.command {
        Command::Init(args) => {
            assert_eq!(args.output, Some(PathBuf::from("tune.yaml")));
            assert!(!args.force);
        }
        _ => panic!("Expected Init command"),
    }
}

#[test]
fn test_global_flags() {
    let cli = parse_args(["afinar", "run", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(!cli.quiet);

    let cli = parse_args(["afinar", "-q", "validate", "tune.yaml"]).unwrap();
    assert!(cli.quiet);
}

#[test]
fn test_parse_missing_subcommand() {
    assert!(parse_args(["afinar"]).is_err());
}

#[test]
fn test_apply_overrides_network() {
    let mut config = TuneConfig::default();
    let args = RunArgs {
        host: Some("10.0.0.2".to_string()),
        listen_port: Some(7003),
        send_port: Some(7005),
        ..Default::default()
    };
    apply_overrides(&mut config, &args);
    assert_eq!(config.network.host, "10.0.0.2");
    assert_eq!(config.network.listen_port, 7003);
    assert_eq!(config.network.send_port, 7005);
}

#[test]
fn test_apply_overrides_search() {
    let mut config = TuneConfig::default();
    let args = RunArgs {
        strategy: Some(StrategyKind::Random),
        threshold: Some(-0.2),
        seed: Some(5),
        ..Default::default()
    };
    apply_overrides(&mut config, &args);
    assert_eq!(config.strategy, StrategyKind::Random);
    assert_eq!(config.random.threshold, -0.2);
    assert_eq!(config.random.seed, Some(5));
    assert_eq!(config.surrogate.seed, 5);
}

#[test]
fn test_apply_overrides_n_calls_clamps_initial_points() {
    let mut config = TuneConfig::default();
    apply_overrides(&mut config, &RunArgs { n_calls: Some(4), ..Default::default() });
    assert_eq!(config.surrogate.n_calls, 4);
    assert_eq!(config.surrogate.n_initial_points, 4);
}

#[test]
fn test_apply_overrides_report() {
    let mut config = TuneConfig::default();
    let args = RunArgs {
        report: Some(PathBuf::from("r.yaml")),
        format: Some(ReportFormat::Yaml),
        ..Default::default()
    };
    apply_overrides(&mut config, &args);
    assert_eq!(config.report.output, Some(PathBuf::from("r.yaml")));
    assert_eq!(config.report.format, ReportFormat::Yaml);
}

#[test]
fn test_apply_no_overrides_keeps_config() {
    let mut config = TuneConfig::default();
    config.network.listen_port = 9000;
    apply_overrides(&mut config, &RunArgs::default());
    assert_eq!(config.network.listen_port, 9000);
    assert_eq!(config.surrogate, crate::search::SurrogateConfig::default());
}
