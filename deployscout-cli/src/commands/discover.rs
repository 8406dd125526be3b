//! Discover command - resolve the project, environment and application.

use anyhow::{Result, bail};
use deployscout_scrape::{DiscoveryOutcome, ResourceDiscoverer};

use super::Panel;
use crate::output::{JsonFormatter, TextFormatter};
use crate::target::Invocation;
use crate::{Cli, OutputFormat};

/// Runs the discover command.
///
/// An explicit triple is echoed back without crawling. A failed discovery
/// is still printed in JSON mode before the command fails.
pub async fn run(invocation: &Invocation, cli: &Cli) -> Result<()> {
    let panel = Panel::open(invocation, cli).await?;

    let outcome = match &invocation.resources {
        Some(resources) => DiscoveryOutcome::Found {
            resources: resources.clone(),
        },
        None => ResourceDiscoverer::new(&panel.client).discover().await?,
    };
    if let Some(resources) = outcome.resources() {
        panel.client.session().resolve_resources(resources.clone())?;
    }

    match cli.format {
        OutputFormat::Text => {
            if outcome.resources().is_some() {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_discovery(&outcome));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_discovery(&outcome)?);
        }
    }

    if let DiscoveryOutcome::NotFound { level } = outcome {
        bail!("Could not discover resources (no {level} found)");
    }
    Ok(())
}
