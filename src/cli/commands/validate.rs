//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, TuneConfig, ValidateArgs};

/// Format network configuration as a string
pub fn format_network_info(config: &TuneConfig) -> String {
    format!(
        "  Host: {}\n  Listen port: {}\n  Send port: {}",
        config.network.host, config.network.listen_port, config.network.send_port
    )
}

/// Format retry configuration as a string
pub fn format_retry_info(config: &TuneConfig) -> String {
    let limit = |v: Option<usize>| v.map_or_else(|| "unbounded".to_string(), |n| n.to_string());
    format!(
        "  Bind backoff: {}ms ({} attempts)\n  Read backoff: {}ms ({} idle reads)",
        config.retry.bind_backoff_ms,
        limit(config.retry.max_bind_attempts),
        config.retry.read_backoff_ms,
        limit(config.retry.max_idle_reads)
    )
}

/// Format search configuration as a string
pub fn format_search_info(config: &TuneConfig) -> String {
    let mut lines = vec![format!("  Strategy: {}", config.strategy)];
    lines.push(format!("  Random threshold: {}", config.random.threshold));
    if let Some(max) = config.random.max_iterations {
        lines.push(format!("  Random max iterations: {max}"));
    }
    let s = &config.surrogate;
    lines.push(format!(
        "  Surrogate: {} calls, {} initial points, seed {}",
        s.n_calls, s.n_initial_points, s.seed
    ));
    lines.join("\n")
}

/// Format report configuration, if a report is requested
pub fn format_report_info(config: &TuneConfig) -> Option<String> {
    config
        .report
        .output
        .as_ref()
        .map(|path| format!("  Report: {} ({})", path.display(), config.report.format))
}

/// Print detailed configuration summary
pub fn print_detailed_summary(config: &TuneConfig) {
    println!();
    println!("Configuration Summary:");
    println!("{}", format_network_info(config));
    println!();
    println!("{}", format_retry_info(config));
    println!();
    println!("{}", format_search_info(config));

    if let Some(report_info) = format_report_info(config) {
        println!();
        println!("{report_info}");
    }
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(level, LogLevel::Normal, &format!("Validating config: {}", args.config.display()));

    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        print_detailed_summary(&config);
    }

    Ok(())
}
