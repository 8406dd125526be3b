//! Resource discovery.
//!
//! Walks `projects → project page` and takes the first identifier at each
//! level in page order. No ranking: when several resources exist the first
//! link rendered wins.

use std::sync::LazyLock;

use deployscout_core::{ResourceId, ResourceLevel, ResourceTriple};
use deployscout_fetch::FetchError;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::source::PageSource;

/// Listing page that links every project.
pub const DASHBOARD_PATH: &str = "/projects";

static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/project/([A-Za-z0-9]+)").expect("Invalid regex"));

static ENVIRONMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/project/([A-Za-z0-9]+)/environment/([A-Za-z0-9]+)").expect("Invalid regex")
});

static APPLICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/project/([A-Za-z0-9]+)/environment/([A-Za-z0-9]+)/application/([A-Za-z0-9]+)")
        .expect("Invalid regex")
});

// ============================================================================
// Discovery Outcome
// ============================================================================

/// Result of [`ResourceDiscoverer::discover`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DiscoveryOutcome {
    /// All three levels resolved.
    Found {
        /// The resolved triple.
        resources: ResourceTriple,
    },
    /// Some level had no match; nothing partial is returned.
    NotFound {
        /// First level without a match.
        level: ResourceLevel,
    },
}

impl DiscoveryOutcome {
    /// The triple, if discovery succeeded.
    pub fn resources(&self) -> Option<&ResourceTriple> {
        match self {
            Self::Found { resources } => Some(resources),
            Self::NotFound { .. } => None,
        }
    }

    /// Consumes the outcome, returning the triple if any.
    pub fn into_resources(self) -> Option<ResourceTriple> {
        match self {
            Self::Found { resources } => Some(resources),
            Self::NotFound { .. } => None,
        }
    }
}

// ============================================================================
// Resource Discoverer
// ============================================================================

/// Infers resource identifiers from rendered pages.
#[derive(Debug, Clone)]
pub struct ResourceDiscoverer<S> {
    source: S,
}

impl<S: PageSource> ResourceDiscoverer<S> {
    /// Creates a discoverer reading pages from `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Resolves the first project, its first environment and that
    /// environment's first application.
    #[instrument(skip(self))]
    pub async fn discover(&self) -> Result<DiscoveryOutcome, FetchError> {
        let Some(project) = self.list_projects().await?.into_iter().next() else {
            debug!("No project links on dashboard");
            return Ok(DiscoveryOutcome::NotFound {
                level: ResourceLevel::Project,
            });
        };

        let project_page = self.project_page(&project).await?;

        let Some(environment) = environments_in(&project_page, &project).into_iter().next() else {
            debug!(project = %project, "No environment links on project page");
            return Ok(DiscoveryOutcome::NotFound {
                level: ResourceLevel::Environment,
            });
        };

        let Some(application) = applications_in(&project_page, &project, &environment)
            .into_iter()
            .next()
        else {
            debug!(project = %project, environment = %environment, "No application links on project page");
            return Ok(DiscoveryOutcome::NotFound {
                level: ResourceLevel::Application,
            });
        };

        let resources = ResourceTriple::new(project, environment, application);
        info!(resources = %resources, "Discovered resources");
        Ok(DiscoveryOutcome::Found { resources })
    }

    /// Every project linked from the dashboard, in page order.
    pub async fn list_projects(&self) -> Result<Vec<ResourceId>, FetchError> {
        let page = self.source.fetch_page(DASHBOARD_PATH).await?;
        Ok(projects_in(&page.body))
    }

    /// Every environment of `project`, in page order.
    pub async fn list_environments(&self, project: &ResourceId) -> Result<Vec<ResourceId>, FetchError> {
        let page = self.project_page(project).await?;
        Ok(environments_in(&page, project))
    }

    /// Every application of `project`/`environment` linked from the project page.
    pub async fn list_applications(
        &self,
        project: &ResourceId,
        environment: &ResourceId,
    ) -> Result<Vec<ResourceId>, FetchError> {
        let page = self.project_page(project).await?;
        Ok(applications_in(&page, project, environment))
    }

    async fn project_page(&self, project: &ResourceId) -> Result<String, FetchError> {
        let path = format!("/{}/{project}", ResourceLevel::Project.path_segment());
        Ok(self.source.fetch_page(&path).await?.body)
    }
}

// ============================================================================
// Page Scans
// ============================================================================

/// Project identifiers in page order, deduplicated.
pub fn projects_in(page: &str) -> Vec<ResourceId> {
    distinct(PROJECT_RE.captures_iter(page).map(|caps| caps[1].to_string()))
}

/// Environment identifiers belonging to `project`, in page order.
pub fn environments_in(page: &str, project: &ResourceId) -> Vec<ResourceId> {
    distinct(
        ENVIRONMENT_RE
            .captures_iter(page)
            .filter(|caps| &caps[1] == project.as_str())
            .map(|caps| caps[2].to_string()),
    )
}

/// Application identifiers belonging to `project`/`environment`, in page order.
pub fn applications_in(page: &str, project: &ResourceId, environment: &ResourceId) -> Vec<ResourceId> {
    distinct(
        APPLICATION_RE
            .captures_iter(page)
            .filter(|caps| &caps[1] == project.as_str() && &caps[2] == environment.as_str())
            .map(|caps| caps[3].to_string()),
    )
}

fn distinct(ids: impl Iterator<Item = String>) -> Vec<ResourceId> {
    let mut out: Vec<ResourceId> = Vec::new();
    for raw in ids {
        if let Ok(id) = ResourceId::parse(&raw) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
    }
    out
}
