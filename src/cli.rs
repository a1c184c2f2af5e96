// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Turning these raw values
// into checked settings happens in config.rs.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-warden",
    version,
    about = "Find unavailable links and broken cross-references in markdown docs",
    long_about = "link-warden reads every file under a path, extracts the links from its markdown \
                  documents and checks them: relative links must point at an existing file (and \
                  heading, when they carry a #fragment), external links must answer with an \
                  allowed HTTP status. Each unavailable link is printed as it is found."
)]
pub struct Cli {
    /// Path to a file or directory to scan
    #[arg(long)]
    pub path: PathBuf,

    /// Timeout in seconds for each HTTP request
    #[arg(long, default_value_t = 3)]
    pub timeout: u64,

    /// Comma-separated list of allowed HTTP status codes
    ///
    /// Example: --status 200,301,302
    #[arg(long, default_value = "200")]
    pub status: String,

    /// Maximum number of links checked at the same time (default: no limit)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// File extension of the documents links are extracted from (repeatable)
    ///
    /// Other files are still loaded so relative links to them resolve.
    #[arg(long = "ext", value_name = "EXT", default_values = ["md", "markdown"])]
    pub extensions: Vec<String>,

    /// Path to log file (default: stdout)
    #[arg(long = "log", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub level: String,

    /// Use JSON log format
    #[arg(long)]
    pub log_json: bool,

    /// Print the results as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-warden", "--path", "docs"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("docs"));
        assert_eq!(cli.timeout, 3);
        assert_eq!(cli.status, "200");
        assert_eq!(cli.concurrency, None);
        assert_eq!(cli.extensions, vec!["md", "markdown"]);
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.level, "info");
        assert!(!cli.log_json);
        assert!(!cli.json);
    }

    #[test]
    fn test_repeated_extensions() {
        let cli =
            Cli::try_parse_from(["link-warden", "--path", ".", "--ext", "md", "--ext", "mdx"]).unwrap();
        assert_eq!(cli.extensions, vec!["md", "mdx"]);
    }

    #[test]
    fn test_path_is_required() {
        assert!(Cli::try_parse_from(["link-warden", "--timeout", "3", "--status", "200"]).is_err());
    }
}
