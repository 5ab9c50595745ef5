mod cli;
mod client;
mod commands;
mod config;
mod fanout;
mod reconcile;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands};
use std::io;

/// Global context for the application
pub struct Context {
    /// Selected `--server` target, the reserved "all" by default.
    pub server: String,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        server: cli.server.clone(),
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Status => commands::protection::status(&ctx),
        Commands::Enable => commands::protection::enable(&ctx),
        Commands::Disable { duration } => {
            commands::protection::disable(&ctx, duration.as_deref())
        }
        Commands::Toggle => commands::protection::toggle(&ctx),
        Commands::Service(cmd) => commands::service::run(&ctx, cmd),
        Commands::Filter(cmd) => commands::filter::run(&ctx, cmd),
        Commands::Rewrite(cmd) => commands::rewrite::run(&ctx, cmd),
        Commands::Dhcp(cmd) => commands::dhcp::run(&ctx, cmd),
        Commands::Server(cmd) => commands::server::run(&ctx, cmd),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "aghctl", &mut io::stdout());
            Ok(())
        }
    }
}
