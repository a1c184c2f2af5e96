// src/checker/orchestrator.rs
// =============================================================================
// This module checks every extracted link concurrently.
//
// How it works:
// 1. Spawn one tokio task per link
// 2. Each task resolves a relative link against the corpus, or fetches an
//    absolute one over the network
// 3. Each task reports its outcome (log event, and a line on stdout or
//    stderr for an unavailable link) and sends (index, ok) down a channel
// 4. Wait for every task, then close the channel and pair each outcome back
//    with its link by index
//
// By default nothing caps how many tasks run at once; the request timeout
// bounds each one. `ValidatorConfig::max_in_flight` adds a semaphore so at
// most N checks run at the same time. Either way every link gets exactly one
// result, in the same order the links came in.
//
// Resolving a relative link parses markdown, which is CPU work, so it runs on
// tokio's blocking pool instead of the async workers.
// =============================================================================

use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use super::http::{check_external, Transport, ValidatorConfig};
use super::links::Link;
use super::markdown::DocumentParser;
use super::relative::resolve;
use crate::corpus::Corpus;

/// Stream the per-link "Link unavailable" lines go to.
///
/// Stderr keeps stdout clean when it carries machine-readable output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStream {
    #[default]
    Stdout,
    Stderr,
}

/// Outcome of checking one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    #[serde(flatten)]
    pub link: Link,
    pub ok: bool,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.ok
    }
}

/// Counts over a batch of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub available: usize,
    pub unavailable: usize,
    pub total: usize,
}

impl CheckSummary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let available = results.iter().filter(|r| r.is_ok()).count();
        Self {
            available,
            unavailable: results.len() - available,
            total: results.len(),
        }
    }
}

// Checks all links and returns one result per link, in input order
//
// Parameters:
//   links: the extracted links
//   transport: fetches absolute links
//   config: allowed statuses, timeout and optional concurrency bound
//   corpus: documents relative links are resolved against
//   parser: parses target documents when a link has a fragment
pub async fn validate_all(
    links: Vec<Link>,
    transport: Arc<dyn Transport>,
    config: Arc<ValidatorConfig>,
    corpus: Arc<Corpus>,
    parser: Arc<dyn DocumentParser>,
) -> Vec<CheckResult> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, bool)>();
    let limit = config
        .max_in_flight
        .map(|max| Arc::new(Semaphore::new(max.max(1))));

    debug!(links = links.len(), max_in_flight = ?config.max_in_flight, "Check links for available");

    let handles: Vec<_> = links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let link = link.clone();
            let tx = tx.clone();
            let limit = limit.clone();
            let transport = Arc::clone(&transport);
            let config = Arc::clone(&config);
            let corpus = Arc::clone(&corpus);
            let parser = Arc::clone(&parser);

            tokio::spawn(async move {
                // Held until the check finishes
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                let ok = if link.relative {
                    let (url, file) = (link.url.clone(), link.file.clone());
                    let resolved = tokio::task::spawn_blocking(move || {
                        resolve(&url, &file, &corpus, parser.as_ref())
                    })
                    .await;
                    resolved.unwrap_or_else(|e| {
                        warn!(link = %link, error = %e, "Relative link resolution failed");
                        false
                    })
                } else {
                    check_external(&link.url, transport.as_ref(), &config).await
                };

                report(&link, ok, config.report_to);
                // The receiver outlives every task, so this cannot fail
                let _ = tx.send((index, ok));
            })
        })
        .collect();

    // Barrier: every task has finished (or panicked) before we read results
    for joined in join_all(handles).await {
        if let Err(e) = joined {
            warn!(error = %e, "Link check task failed");
        }
    }
    drop(tx);

    let mut outcomes: Vec<Option<bool>> = vec![None; links.len()];
    while let Some((index, ok)) = rx.recv().await {
        outcomes[index] = Some(ok);
    }

    let results: Vec<CheckResult> = links
        .into_iter()
        .zip(outcomes)
        .map(|(link, outcome)| {
            // A task that died before sending counts as unavailable
            let ok = outcome.unwrap_or_else(|| {
                report(&link, false, config.report_to);
                false
            });
            CheckResult { link, ok }
        })
        .collect();

    info!(total = results.len(), "All links checked");
    results
}

fn report(link: &Link, ok: bool, stream: ReportStream) {
    if ok {
        debug!(link = %link, "Link available");
    } else {
        match stream {
            ReportStream::Stdout => println!("Link unavailable: {link}"),
            ReportStream::Stderr => eprintln!("Link unavailable: {link}"),
        }
        info!(link = %link, "Link unavailable");
    }
}
