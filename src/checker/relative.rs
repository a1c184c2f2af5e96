// src/checker/relative.rs
// =============================================================================
// This module checks links that point inside the documentation itself.
//
// A relative link like "../guide.md#install" found in "docs/intro/a.md" is
// valid when:
// 1. "docs/guide.md" (the link's path joined onto the source's directory)
//    is part of the corpus, and
// 2. if there is a fragment, some heading in that document has the anchor
//    "install" (see anchor.rs)
//
// Every failure is just "this link is broken". We keep the reason around
// only so the debug log can say why.
// =============================================================================

use thiserror::Error;
use tracing::debug;

use super::anchor::generate_anchor;
use super::markdown::{DocumentParser, Node, Walk};
use super::reference::{Reference, ReferenceError};
use crate::corpus::Corpus;

// Why a relative link did not resolve
#[derive(Debug, Error)]
enum Unresolved {
    #[error("unparsable destination: {0}")]
    Unparsable(#[from] ReferenceError),
    #[error("document {0} not found")]
    MissingDocument(String),
    #[error("no heading with anchor #{anchor} in {document}")]
    MissingAnchor { document: String, anchor: String },
}

/// Resolves a relative link against the corpus.
///
/// `destination` is the raw destination as written in `source`. Returns
/// `true` when the target document exists and, if the link has a fragment,
/// one of its headings produces that anchor.
pub fn resolve(
    destination: &str,
    source: &str,
    corpus: &Corpus,
    parser: &dyn DocumentParser,
) -> bool {
    match find_target(destination, source, corpus, parser) {
        Ok(target) => {
            debug!(file = source, url = destination, target = %target, "Relative link resolved");
            true
        }
        Err(reason) => {
            debug!(file = source, url = destination, reason = %reason, "Relative link unresolved");
            false
        }
    }
}

fn find_target(
    destination: &str,
    source: &str,
    corpus: &Corpus,
    parser: &dyn DocumentParser,
) -> Result<String, Unresolved> {
    let reference = Reference::parse(destination)?;
    let target = join_document_path(source, &reference.path);

    let content = corpus
        .get(&target)
        .ok_or_else(|| Unresolved::MissingDocument(target.clone()))?;

    if reference.fragment.is_empty() {
        return Ok(target);
    }

    let document = parser.parse(content);
    let mut found = false;
    document.walk(|node| match node {
        Node::Heading(_) => {
            if generate_anchor(&node.flatten_text()) == reference.fragment {
                found = true;
                Walk::Stop
            } else {
                Walk::SkipChildren
            }
        }
        _ => Walk::Continue,
    });

    if found {
        Ok(target)
    } else {
        Err(Unresolved::MissingAnchor {
            document: target,
            anchor: reference.fragment,
        })
    }
}

// Joins a link path onto the directory of the document containing it
//
// Purely lexical, the filesystem is never consulted:
//   ("docs/a.md", "b.md")         -> "docs/b.md"
//   ("docs/a.md", "../README.md") -> "README.md"
//   ("a.md", "./b.md")            -> "b.md"
//   ("docs/a.md", "")             -> "docs"
pub fn join_document_path(source: &str, path: &str) -> String {
    let dir = match source.rfind('/') {
        Some(i) => &source[..=i],
        None => ".",
    };
    if path.is_empty() {
        clean_path(dir)
    } else {
        clean_path(&format!("{dir}/{path}"))
    }
}

// Lexically normalises a slash-separated path:
// - repeated slashes collapse
// - "." segments disappear
// - ".." removes the segment before it (or is dropped at the root)
// - an empty result becomes "."
//
// Corpus keys go through this too, so they compare equal to joined targets.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
