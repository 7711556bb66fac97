// src/checker/report.rs
// =============================================================================
// This module builds the final report for one page.
//
// How it works:
// 1. The tree analyzer walks the document once (title, version, headings,
//    login form, raw hrefs)
// 2. Every raw href gets its own tokio task that resolves, classifies and
//    probes it
// 3. Each task merges its LinkRecord into one shared tally under a Mutex
// 4. We wait for ALL tasks, then derive total/internal from the tally
//
// The lock is only held for the merge (two counters + one push), never while
// a request is in flight, otherwise all link checks would run one at a time.
// =============================================================================

use futures::future::join_all;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

use super::link::{LinkRecord, LinkValidator};
use super::probe::LinkProbe;
use super::tree::{analyze_html, HtmlVersion};

// Everything we know about one page
//
// The links collection is in completion order, NOT page order
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub address: String,
    pub title: String,
    pub version: HtmlVersion,
    pub headings: [usize; 6],
    pub login_form: bool,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: usize,
    pub links: Vec<LinkRecord>,
}

// Link part of the report, produced by `aggregate`
#[derive(Debug, Clone, Default)]
pub struct LinkSummary {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub broken: usize,
    pub links: Vec<LinkRecord>,
}

// The only state shared between probe tasks
#[derive(Debug, Default)]
struct Tally {
    broken: usize,
    external: usize,
    links: Vec<LinkRecord>,
}

// Analyzes an already-downloaded page and checks every link on it
//
// Parameters:
//   address: final URL of the page, used as the base for relative links
//   body: page text, already decoded with the response charset
//   probe: how links are checked (HttpProbe in production)
//   max_concurrency: None = one task per link with no limit
pub async fn audit_page(
    address: Url,
    body: &str,
    probe: Arc<dyn LinkProbe>,
    max_concurrency: Option<usize>,
) -> AnalysisResult {
    let (facts, raw_links) = analyze_html(body);

    info!(address = %address, links = raw_links.len(), "checking links");

    let validator = Arc::new(LinkValidator::new(address.clone()));
    let summary = aggregate(validator, probe, raw_links, max_concurrency).await;

    AnalysisResult {
        address: address.to_string(),
        title: facts.title,
        version: facts.version,
        headings: facts.headings,
        login_form: facts.login_form,
        total_links: summary.total,
        internal_links: summary.internal,
        external_links: summary.external,
        broken_links: summary.broken,
        links: summary.links,
    }
}

// Checks every link concurrently and merges the outcomes
//
// Blocks until every task has finished; the tally is never read before that.
// If this future is dropped early the tasks keep running but nobody reads
// their results.
pub async fn aggregate(
    validator: Arc<LinkValidator>,
    probe: Arc<dyn LinkProbe>,
    raw_links: Vec<String>,
    max_concurrency: Option<usize>,
) -> LinkSummary {
    if raw_links.is_empty() {
        return LinkSummary::default();
    }

    let tally = Arc::new(Mutex::new(Tally::default()));
    // Semaphore::new panics above MAX_PERMITS, and 0 permits would never finish
    let limiter = max_concurrency.map(|n| Arc::new(Semaphore::new(n.clamp(1, Semaphore::MAX_PERMITS))));

    let handles: Vec<_> = raw_links
        .into_iter()
        .map(|link| {
            let validator = Arc::clone(&validator);
            let probe = Arc::clone(&probe);
            let tally = Arc::clone(&tally);
            let limiter = limiter.clone();

            tokio::spawn(async move {
                // Held until this task is done; absent when unbounded
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                let record = check_link(&validator, probe.as_ref(), link).await;
                merge(&tally, record);
            })
        })
        .collect();

    for result in join_all(handles).await {
        if let Err(e) = result {
            warn!(error = %e, "link check task failed");
        }
    }

    // Every task has finished, so we should hold the last reference
    let tally = match Arc::try_unwrap(tally) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => std::mem::take(&mut *shared.lock().unwrap_or_else(PoisonError::into_inner)),
    };

    let total = tally.links.len();
    let summary = LinkSummary {
        total,
        internal: total - tally.external,
        external: tally.external,
        broken: tally.broken,
        links: tally.links,
    };

    info!(
        total = summary.total,
        internal = summary.internal,
        external = summary.external,
        broken = summary.broken,
        "links checked"
    );

    summary
}

// Resolves, classifies and probes a single raw href
pub async fn check_link(validator: &LinkValidator, probe: &dyn LinkProbe, link: String) -> LinkRecord {
    let full_path = validator.resolve(&link);
    let is_external = validator.is_external(&link);
    let is_broken = probe.is_broken(&full_path).await;

    debug!(link = %link, full_path = %full_path, is_external, is_broken, "link checked");

    LinkRecord {
        url: link,
        full_path,
        is_external,
        is_broken,
    }
}

// The critical section: two counters and one push
fn merge(tally: &Mutex<Tally>, record: LinkRecord) {
    let mut tally = tally.lock().unwrap_or_else(PoisonError::into_inner);
    if record.is_broken {
        tally.broken += 1;
    }
    if record.is_external {
        tally.external += 1;
    }
    tally.links.push(record);
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Mutex<...>> for the tally?
//    - Every tokio task needs to reach the same counters
//    - Arc gives shared ownership across tasks, Mutex gives one writer at a time
//    - We use std's Mutex because nothing awaits while it is locked
//
// 2. Why tokio::spawn instead of buffer_unordered?
//    - One task per link means every probe can start immediately
//    - A Semaphore adds a cap only when --max-concurrency asks for one
//
// 3. What does join_all do?
//    - Waits for every JoinHandle and gives back their results in a Vec
//    - An Err means that task panicked; its link simply has no record
// -----------------------------------------------------------------------------
