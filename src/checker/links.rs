// src/checker/links.rs
// =============================================================================
// This module extracts links from every document in the corpus.
//
// For each document we:
// 1. Parse it into a node tree (see markdown.rs)
// 2. Walk the tree looking for Link nodes
// 3. Flatten the link's children into its display text
// 4. Split the destination (see reference.rs) to learn whether it is
//    relative and what fragment it points at
//
// A destination that can't be parsed is skipped with a debug event; it never
// stops the walk or the other documents.
// =============================================================================

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::markdown::{DocumentParser, Node, Walk};
use super::reference::Reference;

/// One link found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    /// Identifier of the document the link was found in
    pub file: String,
    /// Display text, every nested text segment concatenated
    pub text: String,
    /// Destination exactly as written
    pub url: String,
    /// No scheme: resolved against the corpus instead of the network
    pub relative: bool,
    /// Part after '#', empty when there is none
    pub fragment: String,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({}) in file {}", self.text, self.url, self.file)
    }
}

// Extracts all links from a set of documents
//
// Parameters:
//   documents: (identifier, raw content) pairs, e.g. `&corpus`
//   parser: turns raw content into a node tree
//
// Returns: links in document iteration order, then in the order they
// appear inside each document
pub fn extract_links<I, K, V>(documents: I, parser: &dyn DocumentParser) -> Vec<Link>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut links = Vec::new();
    debug!("Start parsing files");

    for (file, content) in documents {
        let file = file.as_ref();
        debug!(path = file, "Parsing file");

        let document = parser.parse(content.as_ref());
        document.walk(|node| {
            if let Node::Link { destination, .. } = node {
                if let Some(link) = link_from_node(file, destination, node) {
                    debug!(
                        path = file,
                        url = %link.url,
                        text = %link.text,
                        relative = link.relative,
                        "Found new link in file"
                    );
                    links.push(link);
                }
            }
            Walk::Continue
        });
    }

    debug!(count = links.len(), "Parsing files finished");
    links
}

fn link_from_node(file: &str, destination: &str, node: &Node) -> Option<Link> {
    let reference = match Reference::parse(destination) {
        Ok(reference) => reference,
        Err(e) => {
            debug!(path = file, url = destination, error = %e, "Skipping unparsable link");
            return None;
        }
    };

    Some(Link {
        file: file.to_string(),
        text: node.flatten_text(),
        url: destination.to_string(),
        relative: reference.is_relative(),
        fragment: reference.fragment,
    })
}
