//! Login command - authenticate and report the outcome.

use anyhow::Result;

use super::Panel;
use crate::output::{JsonFormatter, TextFormatter};
use crate::target::Invocation;
use crate::{Cli, OutputFormat};

/// Runs the login command.
pub async fn run(invocation: &Invocation, cli: &Cli) -> Result<()> {
    let panel = Panel::open(invocation, cli).await?;
    let base_url = panel.client.base_url();

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                let formatter = TextFormatter::new(!cli.no_color);
                println!("{}", formatter.format_login(base_url, &panel.login));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_login(base_url, &panel.login)?);
        }
    }

    Ok(())
}
