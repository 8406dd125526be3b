//! Deployments command - list deployments of the application.

use anyhow::Result;
use deployscout_scrape::DeploymentFetcher;

use super::Panel;
use crate::output::{JsonFormatter, TextFormatter};
use crate::target::Invocation;
use crate::{Cli, OutputFormat};

/// Runs the deployments command.
pub async fn run(invocation: &Invocation, cli: &Cli) -> Result<()> {
    let panel = Panel::open(invocation, cli).await?;
    let resources = panel.resources(invocation.resources.as_ref()).await?;
    let deployments = DeploymentFetcher::new(&panel.client).list(&resources).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_deployments(&resources, &deployments));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_deployments(&resources, &deployments)?);
        }
    }

    Ok(())
}
