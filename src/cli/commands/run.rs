//! Run command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, validate_config, RunArgs, TuneConfig};
use crate::progress::format_hms;
use crate::tuner::{TuneOutcome, TuneReport, Tuner};

/// Resolve the effective config: file (or defaults), then CLI overrides
pub fn resolve_config(args: &RunArgs) -> Result<TuneConfig, String> {
    let mut config = match &args.config {
        Some(path) => load_config(path).map_err(|e| format!("Config error: {e}"))?,
        None => TuneConfig::default(),
    };
    apply_overrides(&mut config, args);
    validate_config(&config).map_err(|e| format!("Invalid config: {e}"))?;
    Ok(config)
}

/// Format the end-of-run summary
pub fn format_summary(outcome: &TuneOutcome) -> String {
    let mut lines = vec![
        format!("Strategy: {}", outcome.strategy),
        format!("Evaluations: {}", outcome.iterations()),
        format!("Initial score: {}", outcome.initial_score),
    ];
    match &outcome.best {
        Some(best) => {
            let params: Vec<String> =
                best.assignment.iter().map(|(name, value)| format!("{name}={value}")).collect();
            lines.push(format!("Best score: {}", best.score));
            lines.push(format!("Best parameters: {}", params.join(", ")));
        }
        None => lines.push("Best score: none (no candidate evaluated)".to_string()),
    }
    lines.push(format!("Elapsed: {}", format_hms(outcome.elapsed_secs)));
    lines.join("\n")
}

pub fn run_tune(args: RunArgs, level: LogLevel) -> Result<(), String> {
    let config = resolve_config(&args)?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Waiting for scorer on {}:{} (candidates go to port {})",
            config.network.host, config.network.listen_port, config.network.send_port
        ),
    );

    let mut tuner = Tuner::new(config.clone());
    let outcome = tuner.run().map_err(|e| format!("Tuning failed: {e}"))?;
    log(level, LogLevel::Normal, &format_summary(&outcome));

    if let Some(path) = &config.report.output {
        TuneReport::from_outcome(&outcome)
            .write(path, config.report.format)
            .map_err(|e| format!("Failed to write report {}: {e}", path.display()))?;
        log(level, LogLevel::Normal, &format!("Report written to {}", path.display()));
    }

    Ok(())
}
