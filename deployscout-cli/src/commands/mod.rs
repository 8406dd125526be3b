//! CLI command implementations.
//!
//! Every command starts the same way: resolve configuration and
//! credentials, build one session client and log in. [`Panel`] holds the
//! logged-in client for the rest of the run.

pub mod deployments;
pub mod discover;
pub mod login;
pub mod logs;
pub mod projects;

use anyhow::{Result, bail};
use deployscout_core::ResourceTriple;
use deployscout_fetch::SessionClient;
use deployscout_scrape::{Authenticator, DiscoveryOutcome, LoginOutcome, ResourceDiscoverer};
use tracing::{debug, info, warn};

use crate::Cli;
use crate::config::{FileConfig, Overrides, RunConfig, process_env, resolve_credentials};
use crate::target::Invocation;

/// A logged-in session against one panel.
pub struct Panel {
    /// Client carrying the session cookies.
    pub client: SessionClient,
    /// Deployment pages fetched at once.
    pub concurrency: usize,
    /// How the login went.
    pub login: LoginOutcome,
}

impl Panel {
    /// Resolves configuration, then logs in.
    ///
    /// Configuration and credential problems are reported before any
    /// request is made.
    pub async fn open(invocation: &Invocation, cli: &Cli) -> Result<Self> {
        let overrides = Overrides {
            base_url: invocation.base_url.clone(),
            insecure: cli.insecure,
            timeout_secs: cli.timeout,
            concurrency: cli.concurrency,
        };
        let file = FileConfig::load()?;
        let config = RunConfig::resolve(&overrides, &process_env, &file)?;
        let credentials = resolve_credentials(&process_env)?;

        debug!(base_url = %config.settings.base_url, "Connecting");
        let client = SessionClient::new(config.settings)?;
        let login = Authenticator::new(client.clone())
            .login(&credentials.email, &credentials.password)
            .await?;

        if !login.confirmed {
            warn!(
                status = login.status,
                final_url = %login.final_url,
                "Login was not rejected but did not leave the login page"
            );
        }

        Ok(Self {
            client,
            concurrency: config.concurrency,
            login,
        })
    }

    /// The explicit triple, or the first one discovery finds.
    ///
    /// The result is pinned on the session for the rest of the run.
    pub async fn resources(&self, explicit: Option<&ResourceTriple>) -> Result<ResourceTriple> {
        let triple = match explicit {
            Some(triple) => triple.clone(),
            None => match ResourceDiscoverer::new(&self.client).discover().await? {
                DiscoveryOutcome::Found { resources } => resources,
                DiscoveryOutcome::NotFound { level } => {
                    bail!("Could not discover resources (no {level} found)")
                }
            },
        };

        let resolved = self.client.session().resolve_resources(triple)?;
        info!(resources = %resolved, "Using resources");
        Ok(resolved.clone())
    }
}
