//! Logs command - extract log text from deployment pages.

use anyhow::{Result, anyhow};
use deployscout_core::{DEFAULT_DISPLAY_LIMIT, DeploymentId};
use deployscout_scrape::{DeploymentFetcher, DeploymentLogs};
use tracing::{info, warn};

use super::Panel;
use crate::output::{JsonFormatter, TextFormatter};
use crate::target::Invocation;
use crate::{Cli, OutputFormat};

/// Runs the logs command.
///
/// Without deployment ids the latest deployment is used. Pages that yield
/// no log text are reported, not treated as failures; a page that cannot
/// be fetched fails the command after the others are printed.
pub async fn run(invocation: &Invocation, cli: &Cli) -> Result<()> {
    let panel = Panel::open(invocation, cli).await?;
    let resources = panel.resources(invocation.resources.as_ref()).await?;
    let fetcher = DeploymentFetcher::new(&panel.client).with_concurrency(panel.concurrency);

    let ids: Vec<DeploymentId> = if invocation.deployments.is_empty() {
        match fetcher.latest(&resources).await? {
            Some(latest) => {
                info!(deployment = %latest.id, "Using latest deployment");
                vec![latest.id]
            }
            None => {
                if cli.format == OutputFormat::Json {
                    println!("{}", JsonFormatter::new(cli.pretty).format_logs(&[])?);
                } else if !cli.quiet {
                    println!("No deployments found for {resources}");
                }
                return Ok(());
            }
        }
    } else {
        invocation.deployments.clone()
    };

    let mut fetched: Vec<DeploymentLogs> = Vec::with_capacity(ids.len());
    let mut first_error = None;
    for (id, result) in ids.iter().zip(fetcher.fetch_logs_many(&resources, &ids).await) {
        match result {
            Ok(logs) => fetched.push(logs),
            Err(e) => {
                warn!(deployment = %id, error = %e, "Failed to fetch deployment page");
                if first_error.is_none() {
                    first_error = Some(anyhow!(e).context(format!("Deployment {id}")));
                }
            }
        }
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let limit = (!cli.full).then_some(DEFAULT_DISPLAY_LIMIT);
            let blocks: Vec<String> = fetched
                .iter()
                .map(|logs| formatter.format_logs(logs, limit))
                .collect();
            if !blocks.is_empty() {
                println!("{}", blocks.join("\n\n"));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_logs(&fetched)?);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
