//! Filtering engine queries.

use crate::Context;
use crate::cli::FilterCommand;
use crate::commands;
use anyhow::{Context as _, Result};

/// Run the filter command.
pub fn run(ctx: &Context, cmd: FilterCommand) -> Result<()> {
    match cmd {
        FilterCommand::Check { host } => check(ctx, &host),
    }
}

/// Ask each server how its filtering rules treat a hostname.
///
/// The verdict shape varies with the matching rule kind, so it is passed
/// through as raw JSON rather than forced into a struct.
fn check(ctx: &Context, host: &str) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        let verdict: serde_json::Value = client
            .get_json_with_query(server, "/control/filtering/check_host", &[("name", host)])
            .context("checking host")?;
        Ok(verdict)
    })
}
