// Protection status and toggling
pub mod protection;

// Blocked services
pub mod service;

// Filtering engine queries
pub mod filter;

// DNS rewrites
pub mod rewrite;

// DHCP server management
pub mod dhcp;

// Server list management
pub mod server;

use crate::Context;
use crate::client::Client;
use crate::config::{Config, ServerConfig, TargetSet};
use crate::fanout;
use anyhow::Result;
use serde::Serialize;

/// Run one unit of work against the selected servers and print the result.
///
/// A single target prints the payload bare, and any failure fails the whole
/// command. A fan-out prints the aggregated report instead; per-server
/// failures become report entries and the command itself still succeeds.
pub fn run_for_targets<T, F>(ctx: &Context, work: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&Client, &ServerConfig) -> Result<T>,
{
    let config = Config::load()?;
    let client = Client::new();

    match config.resolve(&ctx.server)? {
        TargetSet::Single(server) => {
            let payload = work(&client, &server)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        TargetSet::Many(servers) => {
            let report = fanout::execute(&servers, |server| work(&client, server));
            println!("{}", fanout::render(&report));
        }
    }

    Ok(())
}
