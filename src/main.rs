// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and validate them
// 2. Set up logging
// 3. Load every file under the target path
// 4. Extract links from the markdown documents and check them all
// 5. Print a summary (or JSON) and exit with the proper code
//    (0 = all links available, 1 = unavailable links, 2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

use link_warden::checker::{self, CheckResult, CheckSummary, CommonMarkParser, HttpTransport};
use link_warden::cli::Cli;
use link_warden::config::AppConfig;
use link_warden::corpus;
use link_warden::logging;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every link available
//   Ok(1) = unavailable links found
//   Err = configuration, logging or file reading failed
async fn run() -> Result<i32> {
    let config = AppConfig::from_cli(Cli::parse())?;
    logging::init_logging(&config.logger)?;
    debug!("Start link-warden");

    debug!(path = %config.target_path.display(), "Read files");
    let corpus = corpus::load_corpus(&config.target_path)?;

    // Links come only from markdown documents, but all files stay in the
    // corpus so relative links to images and sources resolve
    let parser = Arc::new(CommonMarkParser::default());
    let documents = corpus::select_documents(&corpus, &config.extensions);
    let document_count = documents.len();
    let links = checker::extract_links(documents, parser.as_ref());

    if links.is_empty() {
        if config.json {
            println!("[]");
        } else {
            println!("✅ No links found to check");
        }
        return Ok(0);
    }

    if !config.json {
        println!("🌐 Checking {} link(s) in {} file(s)...\n", links.len(), document_count);
    }

    debug!("Create HTTP client for link checks");
    let transport = Arc::new(HttpTransport::new(&config.validator)?);

    let results = checker::validate_all(
        links,
        transport,
        Arc::new(config.validator),
        Arc::new(corpus),
        parser,
    )
    .await;

    print_results(&results, config.json)?;
    debug!("link-warden finished");

    let summary = CheckSummary::from_results(&results);
    if summary.unavailable > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the results either as a summary or JSON
fn print_results(results: &[CheckResult], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(results)?;
        println!("{}", json_output);
    } else {
        print_summary(&CheckSummary::from_results(results));
    }
    Ok(())
}

fn print_summary(summary: &CheckSummary) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Available: {}", summary.available);
    println!("   ❌ Unavailable: {}", summary.unavailable);
    println!("   📋 Total: {}", summary.total);
}
