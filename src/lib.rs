// src/lib.rs
// =============================================================================
// link-warden: find unavailable links in a tree of markdown documents.
//
// The pipeline:
//   corpus (file path -> bytes)
//     -> checker::extract_links   (every link, with text and fragment)
//     -> checker::validate_all    (relative: resolve in the corpus,
//                                  absolute: fetch over HTTP)
//     -> Vec<CheckResult>         (one per link)
//
// main.rs wires this to the command line; everything here can also be
// driven directly, e.g. from tests.
// =============================================================================

pub mod checker;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod logging;
