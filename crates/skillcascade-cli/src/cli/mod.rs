//! CLI command definitions for the `skc` binary.
//!
//! Uses clap derive macros for argument parsing. Input files are global
//! options so every command sees the same catalog, assessment and history.

pub mod cascade;
pub mod health;
pub mod insight;
pub mod path;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use skillcascade_types::catalog::DomainId;

/// Explore skill health and cascade effects across a framework.
#[derive(Debug, Parser)]
#[command(name = "skc", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export tracing spans through OpenTelemetry. Spans are printed on
    /// stdout, so this cannot be combined with `--json`.
    #[arg(long, global = true, conflicts_with = "json")]
    pub otel: bool,

    /// Framework catalog file (.json or .toml).
    #[arg(long, global = true, env = "SKC_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Current assessment (JSON map of skill id to rating 0-3).
    #[arg(long, global = true, env = "SKC_ASSESSMENT")]
    pub assessment: Option<PathBuf>,

    /// Snapshot history (JSON array).
    #[arg(long, global = true, env = "SKC_SNAPSHOTS")]
    pub snapshots: Option<PathBuf>,

    /// Engine config file (defaults to <config dir>/skillcascade/config.toml).
    #[arg(long, global = true, env = "SKC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Health of every domain.
    Health,

    /// Sub-area health and tier breakdown for one domain.
    #[command(name = "subareas")]
    SubAreas {
        /// Domain id (e.g. d3).
        domain: DomainId,

        /// Include readiness of cross-domain prerequisite skills.
        #[arg(long)]
        prerequisites: bool,
    },

    /// Dependency graph annotated with health.
    Graph,

    /// Project health after hypothetical domain changes.
    #[command(name = "what-if")]
    WhatIf {
        /// Domain targets as DOMAIN=AVG (e.g. d1=2.5). Repeatable.
        #[arg(required = true, value_parser = parse_override)]
        overrides: Vec<(DomainId, f64)>,
    },

    /// Show which domains a change in one domain would reach.
    Trigger {
        /// Source domain id.
        domain: DomainId,
    },

    /// Rank domains by downstream leverage.
    Leverage,

    /// Detect inversions, regressions and bottlenecks.
    Risks,

    /// Prerequisite chain with readiness for one domain.
    Chain {
        /// Target domain id.
        domain: DomainId,
    },

    /// Skills that gate the most higher-tier skills.
    Bottlenecks {
        /// Maximum number of skills to list.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Parse a `DOMAIN=AVG` override.
fn parse_override(raw: &str) -> Result<(DomainId, f64), String> {
    let (domain, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DOMAIN=AVG, got '{raw}'"))?;
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(format!("missing domain in '{raw}'"));
    }
    let target: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid average '{}' in '{raw}'", value.trim()))?;
    if !(0.0..=3.0).contains(&target) {
        return Err(format!("average {target} is outside 0-3"));
    }
    Ok((DomainId::from(domain), target))
}
