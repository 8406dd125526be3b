//! Deployment listing and log retrieval.

use std::sync::LazyLock;

use deployscout_core::{Deployment, DeploymentId, DeploymentStatus, ResourceTriple};
use deployscout_fetch::{FetchError, resolve_against_base};
use futures::stream::{self, StreamExt};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::extract::{ContentExtractor, ExtractionOutcome};
use crate::markup::{cap_bytes, fragment_text};
use crate::source::PageSource;

/// Default number of deployment pages fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Markup after an identifier that is scanned for its status and timestamps.
const MAX_SEGMENT_BYTES: usize = 4_000;

static DEPLOYMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/deployment/([a-z0-9]+)").expect("Invalid regex"));

/// `Started: 2024-05-01 10:00:00` and friends, on segment text.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(started|ended|finished)(?:[ \t]+at)?[ \t]*:?[ \t]*([0-9][^\n]{0,63})")
        .expect("Invalid regex")
});

// ============================================================================
// Deployment Logs
// ============================================================================

/// Logs recovered from one deployment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentLogs {
    /// Deployment the page belongs to.
    pub deployment: DeploymentId,
    /// Final page URL.
    pub url: String,
    /// HTTP status of the page.
    pub status: u16,
    /// Extraction result with per-strategy attempts.
    pub extraction: ExtractionOutcome,
}

// ============================================================================
// Deployment Fetcher
// ============================================================================

/// Lists an application's deployments and pulls their logs.
#[derive(Debug)]
pub struct DeploymentFetcher<S> {
    source: S,
    extractor: ContentExtractor,
    concurrency: usize,
}

impl<S: PageSource> DeploymentFetcher<S> {
    /// Creates a fetcher with the standard extraction cascade.
    pub fn new(source: S) -> Self {
        Self {
            source,
            extractor: ContentExtractor::new(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many deployment pages [`fetch_logs_many`](Self::fetch_logs_many)
    /// requests at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Replaces the extraction cascade.
    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Deployments linked from the application's deployment listing, in page order.
    #[instrument(skip(self), fields(resources = %resources))]
    pub async fn list(&self, resources: &ResourceTriple) -> Result<Vec<Deployment>, FetchError> {
        let page = self.source.fetch_page(&resources.deployments_path()).await?;
        let deployments = parse_listing(&page.body, resources, self.source.base_url());
        info!(count = deployments.len(), "Listed deployments");
        Ok(deployments)
    }

    /// The first deployment of the listing, which the panel renders newest first.
    pub async fn latest(&self, resources: &ResourceTriple) -> Result<Option<Deployment>, FetchError> {
        Ok(self.list(resources).await?.into_iter().next())
    }

    /// Fetches one deployment page and runs the extraction cascade on it.
    #[instrument(skip(self), fields(resources = %resources, deployment = %deployment))]
    pub async fn fetch_logs(
        &self,
        resources: &ResourceTriple,
        deployment: &DeploymentId,
    ) -> Result<DeploymentLogs, FetchError> {
        let page = self
            .source
            .fetch_page(&resources.deployment_path(deployment.as_str()))
            .await?;
        let extraction = self.extractor.extract(&page.body);
        debug!(
            status = page.status,
            strategy = ?extraction.successful_strategy(),
            "Extracted deployment page"
        );

        Ok(DeploymentLogs {
            deployment: deployment.clone(),
            url: page.url,
            status: page.status,
            extraction,
        })
    }

    /// Fetches several deployment pages with bounded concurrency.
    ///
    /// Results come back in the order of `deployments`; one failure does not
    /// stop the others.
    pub async fn fetch_logs_many(
        &self,
        resources: &ResourceTriple,
        deployments: &[DeploymentId],
    ) -> Vec<Result<DeploymentLogs, FetchError>> {
        stream::iter(deployments)
            .map(|deployment| self.fetch_logs(resources, deployment))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

// ============================================================================
// Listing Parser
// ============================================================================

/// Extracts deployments from a listing page.
///
/// Each entry's segment runs from its first link to the next entry's first
/// link (capped), which is where the panel renders its status badge and
/// timestamps.
pub fn parse_listing(page: &str, resources: &ResourceTriple, base_url: &str) -> Vec<Deployment> {
    let mut firsts: Vec<(DeploymentId, usize)> = Vec::new();
    for caps in DEPLOYMENT_RE.captures_iter(page) {
        let Ok(id) = DeploymentId::parse(&caps[1]) else {
            continue;
        };
        if firsts.iter().all(|(seen, _)| *seen != id) {
            let start = caps.get(0).map_or(0, |m| m.start());
            firsts.push((id, start));
        }
    }

    let mut deployments = Vec::with_capacity(firsts.len());
    for (index, (id, start)) in firsts.iter().enumerate() {
        let end = firsts.get(index + 1).map_or(page.len(), |(_, next)| *next);
        let segment = fragment_text(cap_bytes(&page[*start..end], MAX_SEGMENT_BYTES));

        let url = resolve_against_base(base_url, &resources.deployment_path(id.as_str()));
        let mut deployment =
            Deployment::new(id.clone(), url).with_status(DeploymentStatus::from_text(&segment));
        for caps in TIMESTAMP_RE.captures_iter(&segment) {
            let slot = if caps[1].eq_ignore_ascii_case("started") {
                &mut deployment.started_at
            } else {
                &mut deployment.ended_at
            };
            if slot.is_none() {
                *slot = Some(caps[2].trim().to_string());
            }
        }
        deployments.push(deployment);
    }
    deployments
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://panel.test";

    fn resources() -> ResourceTriple {
        ResourceTriple::parse("p1/prod/app1").unwrap()
    }

    #[test]
    fn test_parse_listing() {
        let a = "a".repeat(24);
        let b = format!("{}1", "b".repeat(23));
        let page = format!(
            r#"
            <div><a href="/project/p1/environment/prod/application/app1/deployment/{a}">open</a>
                <span class="badge">In Progress</span>
                <p>Started: 2024-05-01 10:00:00</p>
            </div>
            <div><a href="/project/p1/environment/prod/application/app1/deployment/{b}">open</a>
                <a href="/project/p1/environment/prod/application/app1/deployment/{a}">again</a>
                <span class="badge">Failed</span>
                <p>Started at 2024-04-30 09:00</p><p>Ended: 2024-04-30 09:05</p>
            </div>
            <a href="/project/p1/environment/prod/application/app1/deployment/short">bad</a>
            "#
        );

        let deployments = parse_listing(&page, &resources(), BASE);
        assert_eq!(deployments.len(), 2);

        assert_eq!(deployments[0].id.as_str(), a);
        assert_eq!(deployments[0].status, DeploymentStatus::Running);
        assert_eq!(deployments[0].started_at.as_deref(), Some("2024-05-01 10:00:00"));
        assert_eq!(deployments[0].ended_at, None);
        assert_eq!(
            deployments[0].raw_page_url,
            format!("{BASE}/project/p1/environment/prod/application/app1/deployment/{a}")
        );

        assert_eq!(deployments[1].id.as_str(), b);
        assert_eq!(deployments[1].status, DeploymentStatus::Failed);
        assert_eq!(deployments[1].started_at.as_deref(), Some("2024-04-30 09:00"));
        assert_eq!(deployments[1].ended_at.as_deref(), Some("2024-04-30 09:05"));
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_listing("<p>No deployments yet</p>", &resources(), BASE).is_empty());
    }
}
