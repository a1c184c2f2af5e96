// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - anchor: Turns heading text into GitHub-style anchors
// - reference: Splits a link destination into scheme, path and fragment
// - markdown: Parses Markdown into a node tree we can walk
// - links: Extracts links from every document
// - relative: Resolves links that point at other documents and headings
// - http: Fetches external links and checks their status codes
// - orchestrator: Runs all checks concurrently and collects the results
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod anchor;
mod http;
mod links;
mod markdown;
mod orchestrator;
mod reference;
mod relative;

#[cfg(test)]
mod test_server;

// Re-export public items from submodules
// This lets users write `checker::validate_all()` instead of
// `checker::orchestrator::validate_all()`
pub use anchor::generate_anchor;
pub use http::{check_external, HttpTransport, Transport, TransportError, ValidatorConfig};
pub use links::{extract_links, Link};
pub use markdown::{CommonMarkParser, Document, DocumentParser, Node, Walk};
pub use orchestrator::{validate_all, CheckResult, CheckSummary, ReportStream};
pub use reference::{Reference, ReferenceError};
pub use relative::{clean_path, join_document_path, resolve};
