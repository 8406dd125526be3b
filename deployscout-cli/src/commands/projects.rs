//! Projects command - list projects on the dashboard.

use anyhow::Result;
use deployscout_scrape::ResourceDiscoverer;

use super::Panel;
use crate::output::{JsonFormatter, TextFormatter};
use crate::target::Invocation;
use crate::{Cli, OutputFormat};

/// Runs the projects command.
pub async fn run(invocation: &Invocation, cli: &Cli) -> Result<()> {
    let panel = Panel::open(invocation, cli).await?;
    let projects = ResourceDiscoverer::new(&panel.client).list_projects().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_projects(&projects));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_projects(&projects)?);
        }
    }

    Ok(())
}
