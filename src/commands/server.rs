//! Configured-server management.
//!
//! These commands only touch the local config file; no server is contacted.

use crate::Context;
use crate::cli::ServerCommand;
use crate::config::{Config, RESERVED_SERVER_NAME, ServerConfig};
use crate::ui;
use anyhow::{Context as _, Result, bail};
use dialoguer::{Input, Password};
use std::io::IsTerminal;

/// Run the server command.
pub fn run(ctx: &Context, cmd: ServerCommand) -> Result<()> {
    match cmd {
        ServerCommand::Add => add(ctx),
        ServerCommand::List => list(),
        ServerCommand::Remove { name } => remove(ctx, &name),
    }
}

/// Prompt for a new server entry and save it.
fn add(ctx: &Context) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "'server add' needs an interactive terminal.\n\
             Alternatively set AGHCTL_HOST, AGHCTL_USERNAME and AGHCTL_PASSWORD."
        );
    }

    let name: String = Input::new()
        .with_prompt(format!("Server name (not '{}')", RESERVED_SERVER_NAME))
        .interact_text()
        .context("Failed to read name")?;

    let host: String = Input::new()
        .with_prompt("Host and port (e.g. 10.0.0.2:3000)")
        .interact_text()
        .context("Failed to read host")?;

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .context("Failed to read username")?;

    let password: String = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    let mut config = Config::load()?;
    config.add_server(ServerConfig {
        name: name.clone(),
        host,
        username,
        password,
    })?;
    config.save()?;

    if !ctx.quiet {
        ui::success(&format!("Server '{}' added", name));
    }
    Ok(())
}

/// List configured servers with passwords masked.
fn list() -> Result<()> {
    let config = Config::load()?;
    if config.servers.is_empty() {
        ui::info("No servers configured. Run 'aghctl server add' first.");
        return Ok(());
    }

    for server in &config.servers {
        println!("{}", server.name);
        ui::kv("host", &server.host);
        ui::kv("username", &server.username);
        ui::kv("password", "********");
    }
    Ok(())
}

fn remove(ctx: &Context, name: &str) -> Result<()> {
    let mut config = Config::load()?;
    if !config.remove_server(name) {
        bail!("Server '{}' not found in config", name);
    }
    config.save()?;

    if !ctx.quiet {
        ui::success(&format!("Server '{}' removed", name));
    }
    Ok(())
}
