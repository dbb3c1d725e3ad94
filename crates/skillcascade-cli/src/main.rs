//! SkillCascade CLI entry point.
//!
//! Binary name: `skc`
//!
//! Parses CLI arguments, loads the catalog and assessment data, builds the
//! cascade engine, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use skillcascade_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,skillcascade=debug",
        _ => "trace",
    };
    if let Err(e) = init_tracing(filter, cli.otel) {
        eprintln!("Warning: tracing setup failed: {e}");
    }

    let result = run(cli);
    shutdown_tracing();
    result
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "skc", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(&cli)?;
    let json = cli.json;

    match &cli.command {
        Commands::Health => cli::health::health(&state, json)?,

        Commands::SubAreas {
            domain,
            prerequisites,
        } => cli::health::sub_areas(&state, domain, *prerequisites, json)?,

        Commands::Graph => cli::health::graph(&state, json)?,

        Commands::WhatIf { overrides } => cli::cascade::what_if(&state, overrides, json)?,

        Commands::Trigger { domain } => cli::cascade::trigger(&state, domain, json)?,

        Commands::Leverage => cli::insight::leverage(&state, json)?,

        Commands::Risks => cli::insight::risks(&state, json)?,

        Commands::Chain { domain } => cli::path::chain(&state, domain, json)?,

        Commands::Bottlenecks { limit } => cli::path::bottlenecks(&state, *limit, json)?,

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
