//! DNS rewrite rules.
//!
//! Mutations answer with the server's full rule list afterwards, so the
//! caller can see what actually took effect.

use crate::Context;
use crate::cli::RewriteCommand;
use crate::client::Client;
use crate::commands;
use crate::config::ServerConfig;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

/// One DNS rewrite rule, as the API lists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RewriteEntry {
    domain: String,
    answer: String,
}

/// Run the rewrite command.
pub fn run(ctx: &Context, cmd: RewriteCommand) -> Result<()> {
    match cmd {
        RewriteCommand::List => list(ctx),
        RewriteCommand::Add { domain, answer } => add(ctx, RewriteEntry { domain, answer }),
        RewriteCommand::Delete { domain, answer } => delete(ctx, RewriteEntry { domain, answer }),
    }
}

fn list(ctx: &Context) -> Result<()> {
    commands::run_for_targets(ctx, fetch_rules)
}

fn add(ctx: &Context, rule: RewriteEntry) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        // The add endpoint happily stacks identical rules, so drop any
        // matching rule first. A failed delete just means there was none.
        if let Err(err) = client.post_json(server, "/control/rewrite/delete", &rule) {
            log::debug!("{}: pre-delete skipped: {}", server.name, err);
        }
        client
            .post_json(server, "/control/rewrite/add", &rule)
            .context("adding rewrite")?;
        fetch_rules(client, server)
    })
}

fn delete(ctx: &Context, rule: RewriteEntry) -> Result<()> {
    commands::run_for_targets(ctx, |client, server| {
        client
            .post_json(server, "/control/rewrite/delete", &rule)
            .context("deleting rewrite")?;
        fetch_rules(client, server)
    })
}

fn fetch_rules(client: &Client, server: &ServerConfig) -> Result<Vec<RewriteEntry>> {
    client
        .get_json(server, "/control/rewrite/list")
        .context("listing rewrites")
}

// ============================================================================
// Tests
// ============================================================================
