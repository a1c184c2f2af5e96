// src/corpus.rs
// =============================================================================
// This module loads the documents we check into memory.
//
// The corpus maps a document identifier (its path, as reached from the path
// the user gave us, lexically cleaned) to its raw bytes. Every regular file is loaded, not just
// markdown, so a relative link to an image or a source file can be resolved.
//
// Once loaded the corpus is never modified; the checker shares it read-only
// between all of its concurrent tasks.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::checker::clean_path;

/// Document identifier -> raw content.
pub type Corpus = HashMap<String, Vec<u8>>;

// Reads a file, or every file below a directory
//
// Returns an error if the path doesn't exist or any file can't be read.
// A half-loaded corpus would report links to the missing files as broken,
// so a read failure stops the run instead.
pub fn load_corpus(path: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new();

    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;

        if entry.file_type().is_dir() {
            debug!(path = %entry.path().display(), "Reading directory");
            continue;
        }

        let content = fs::read(entry.path())
            .with_context(|| format!("Failed to read {}", entry.path().display()))?;
        // "./docs/a.md" and "docs/a.md" must be the same document, since
        // relative link targets are always cleaned
        corpus.insert(clean_path(&entry.path().to_string_lossy()), content);
    }

    debug!(files = corpus.len(), "Corpus loaded");
    Ok(corpus)
}

// Checks whether a document identifier ends in one of the given extensions
//
// Comparison ignores ASCII case and a leading '.' on the extension,
// so "md", ".md" and "MD" all match "README.md".
pub fn has_extension(id: &str, extensions: &[String]) -> bool {
    let Some(actual) = Path::new(id).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(actual))
}

/// The documents links are extracted from: every entry whose identifier has
/// one of `extensions`. The rest of the corpus stays available as link targets.
pub fn select_documents<'a>(corpus: &'a Corpus, extensions: &[String]) -> Vec<(&'a str, &'a [u8])> {
    corpus
        .iter()
        .filter(|(id, _)| has_extension(id, extensions))
        .map(|(id, content)| (id.as_str(), content.as_slice()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{extract_links, resolve, CommonMarkParser};

    fn key(path: &Path) -> String {
        clean_path(&path.to_string_lossy())
    }

    // Writes docs/a.md linking to its sibling docs/b.md
    fn sibling_docs() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("x")).unwrap();
        fs::write(docs.join("a.md"), "[See](b.md#intro)").unwrap();
        fs::write(docs.join("b.md"), "## Intro").unwrap();
        dir
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        fs::create_dir(&nested).unwrap();

        let a = dir.path().join("a.md");
        let b = nested.join("b.md");
        let other = dir.path().join("not-markdown");
        fs::write(&a, "# Hello [Go](https://golang.org)").unwrap();
        fs::write(&b, "Some [text](https://example.com) here").unwrap();
        fs::write(&other, "Should still be read").unwrap();

        let corpus = load_corpus(dir.path()).unwrap();

        assert_eq!(corpus.len(), 3);
        let a_key = key(&a);
        assert!(corpus.contains_key(&a_key));
        assert!(corpus.contains_key(&key(&b)));
        assert!(corpus.contains_key(&key(&other)));
        assert!(String::from_utf8_lossy(&corpus[&a_key]).contains("Go"));
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("README.md");
        fs::write(&file, "[x](y.md)").unwrap();

        let corpus = load_corpus(&file).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[&key(&file)], b"[x](y.md)");
    }

    #[test]
    fn test_keys_are_cleaned() {
        let dir = sibling_docs();
        let root = dir.path().join(".").join("docs").join("x").join("..");

        let corpus = load_corpus(&root).unwrap();

        let mut keys: Vec<&String> = corpus.keys().collect();
        keys.sort_unstable();
        let docs = key(&dir.path().join("docs"));
        assert_eq!(keys, vec![&format!("{docs}/a.md"), &format!("{docs}/b.md")]);
    }

    #[test]
    fn test_sibling_links_resolve_from_non_canonical_roots() {
        let dir = sibling_docs();
        let base = dir.path();
        let roots = [
            base.join(".").join("docs"),
            base.join("docs").join(""),
            base.join("docs").join("x").join(".."),
            base.join("docs").join(".").join("."),
        ];

        let parser = CommonMarkParser::default();
        for root in roots {
            let corpus = load_corpus(&root).unwrap();
            let links = extract_links(&corpus, &parser);
            assert_eq!(links.len(), 1, "root {}", root.display());
            let link = &links[0];
            assert!(
                resolve(&link.url, &link.file, &corpus, &parser),
                "{link} did not resolve from root {}",
                root.display()
            );
        }
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_corpus(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["md".to_string(), ".Markdown".to_string()];
        assert!(has_extension("docs/README.md", &exts));
        assert!(has_extension("docs/guide.MARKDOWN", &exts));
        assert!(!has_extension("docs/logo.png", &exts));
        assert!(!has_extension("Makefile", &exts));
    }

    #[test]
    fn test_select_documents() {
        let corpus: Corpus = [
            ("docs/a.md", "[b](b.md)"),
            ("docs/b.markdown", ""),
            ("docs/logo.png", ""),
            ("docs/main.rs", ""),
        ]
        .iter()
        .map(|(id, body)| (id.to_string(), body.as_bytes().to_vec()))
        .collect();
        let exts = vec!["md".to_string(), "markdown".to_string()];

        let mut documents: Vec<&str> = select_documents(&corpus, &exts)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        documents.sort_unstable();

        assert_eq!(documents, vec!["docs/a.md", "docs/b.markdown"]);
        assert_eq!(corpus.len(), 4);
    }
}
