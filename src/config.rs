// src/config.rs
// =============================================================================
// This module turns raw command-line values into checked settings.
//
// Anything wrong here (a status code that isn't a number, a zero timeout)
// stops the run before a single link is checked. The checker itself never
// validates its configuration.
// =============================================================================

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use crate::checker::{ReportStream, ValidatorConfig};
use crate::cli::Cli;

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub validator: ValidatorConfig,
    pub logger: LoggerConfig,
    pub target_path: PathBuf,
    /// Extensions of the documents links are extracted from
    pub extensions: Vec<String>,
    /// Print results as JSON
    pub json: bool,
}

/// Where and how log events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Append to this file instead of writing to stdout
    pub file: Option<PathBuf>,
    pub level: Level,
    pub json: bool,
    /// Write to stderr instead of stdout when there is no file
    pub stderr: bool,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let mut validator = parse_validator_config(cli.timeout, &cli.status)?;
        if let Some(max) = cli.concurrency {
            if max == 0 {
                bail!("Concurrency must be at least 1");
            }
            validator = validator.with_max_in_flight(max);
        }

        // With --json, stdout carries nothing but the results array
        let mut logger = parse_logger_config(cli.log_file, &cli.level, cli.log_json);
        if cli.json {
            validator = validator.with_report_to(ReportStream::Stderr);
            logger.stderr = true;
        }

        Ok(Self {
            validator,
            logger,
            target_path: cli.path,
            extensions: cli.extensions,
            json: cli.json,
        })
    }
}

// Builds the validator settings
//
// Parameters:
//   timeout_secs: per-request timeout, must be positive
//   statuses: comma-separated status codes, e.g. "200, 201, 302"
pub fn parse_validator_config(timeout_secs: u64, statuses: &str) -> Result<ValidatorConfig> {
    if timeout_secs == 0 {
        bail!("Timeout must be a positive number of seconds");
    }

    let allowed = statuses
        .split(',')
        .map(|s| {
            let s = s.trim();
            s.parse::<u16>()
                .with_context(|| format!("Invalid status code {s:?}"))
        })
        .collect::<Result<Vec<u16>>>()?;

    Ok(ValidatorConfig::new(allowed, Duration::from_secs(timeout_secs)))
}

// Builds the logger settings. An unknown level falls back to info.
pub fn parse_logger_config(file: Option<PathBuf>, level: &str, json: bool) -> LoggerConfig {
    let level = match level.to_ascii_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    LoggerConfig {
        file: file.filter(|path| !path.as_os_str().is_empty()),
        level,
        json,
        stderr: false,
    }
}
