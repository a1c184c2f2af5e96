// src/logging.rs
// =============================================================================
// Logging init: text or JSON events to stdout, stderr or an append-only log
// file.
//
// Stderr is used when stdout carries the JSON results, so the two never mix.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;

/// Builds the subscriber described by `config` without installing it.
///
/// `RUST_LOG`, when set, overrides the configured level.
pub fn build_subscriber(config: &LoggerConfig) -> Result<Box<dyn Subscriber + Send + Sync>> {
    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None if config.stderr => BoxMakeWriter::new(std::io::stderr),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false);

    let subscriber: Box<dyn Subscriber + Send + Sync> = if config.json {
        Box::new(builder.json().finish())
    } else {
        Box::new(builder.finish())
    };
    Ok(subscriber)
}

/// Installs the global subscriber. Call once, from the binary.
pub fn init_logging(config: &LoggerConfig) -> Result<()> {
    let subscriber = build_subscriber(config)?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to install logger: {e}"))
}
