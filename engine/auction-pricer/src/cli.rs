//! # Command Line Interface
//!
//! Prices a materialized auction snapshot (candidates, curves, team cap
//! situations) and prints the valuations.

use crate::config::PricingConfig;
use crate::curves::CurveStore;
use crate::engine::PricingEngine;
use crate::models::{PlayerValuation, PricingInput, PricingRun};
use crate::scarcity::NeedsBasedScarcity;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Auction salary predictions for salary-capped fantasy leagues
#[derive(Parser)]
#[command(name = "auction-pricer")]
#[command(about = "Free-agent auction salary predictions for salary-capped fantasy leagues")]
pub struct Cli {
    /// Configuration file layered over the defaults (TOML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log format: compact, pretty or json
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: String,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a snapshot of candidates, curves and team cap situations
    Price {
        /// JSON snapshot with `players`, `curves` and `teams`
        #[arg(short, long)]
        input: PathBuf,

        /// Dynasty rank weight, 0-100; overrides the configuration
        #[arg(long)]
        dynasty_weight: Option<f64>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Rows to print in table output
        #[arg(long, default_value = "25")]
        top: usize,

        /// Skip the needs-based scarcity adjustment
        #[arg(long)]
        neutral_scarcity: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// JSON output envelope
#[derive(Serialize)]
struct PricingReport<'a> {
    generated_at: DateTime<Utc>,
    dynasty_weight: f64,
    run: &'a PricingRun,
}

/// CLI handler
pub struct CliHandler {
    config: PricingConfig,
}

impl CliHandler {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config =
            PricingConfig::load(config_path).context("Failed to load pricing configuration")?;
        Ok(Self { config })
    }

    pub fn with_config(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Price { input, dynasty_weight, format, top, neutral_scarcity } => {
                let run = self.price(&input, dynasty_weight, neutral_scarcity).await?;
                let weight = dynasty_weight.unwrap_or(self.config.ranking.dynasty_weight);
                match format {
                    OutputFormat::Json => {
                        let report = PricingReport {
                            generated_at: Utc::now(),
                            dynasty_weight: weight,
                            run: &run,
                        };
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    OutputFormat::Table => println!("{}", render_table(&run, top)),
                }
            }
            Commands::Config => {
                println!("{}", toml::to_string_pretty(&self.config)?);
            }
        }
        Ok(())
    }

    /// Load a snapshot and run the engine over it
    pub async fn price(
        &self,
        input: &Path,
        dynasty_weight: Option<f64>,
        neutral_scarcity: bool,
    ) -> Result<PricingRun> {
        let raw = tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
        let snapshot = PricingInput::from_json_str(&raw)
            .with_context(|| format!("Failed to parse snapshot {}", input.display()))?;
        info!(
            "Loaded snapshot: {} players, {} curve records, {} teams",
            snapshot.players.len(),
            snapshot.curves.positions.len(),
            snapshot.teams.len()
        );

        let mut config = self.config.clone();
        if let Some(weight) = dynasty_weight {
            config = config.with_dynasty_weight(weight)?;
        }

        let curves = CurveStore::from_snapshot(&snapshot.curves).context("Invalid curve data")?;
        let engine = PricingEngine::new(config, curves);
        let run = if neutral_scarcity {
            engine.price(&snapshot.players, &snapshot.teams)?
        } else {
            engine
                .with_scarcity(NeedsBasedScarcity::default())
                .price(&snapshot.players, &snapshot.teams)?
        };
        Ok(run)
    }
}

fn money(amount: f64) -> String {
    format!("${:.3}M", amount / 1_000_000.0)
}

fn contract_summary(valuation: &PlayerValuation) -> String {
    match valuation.recommended_contract() {
        Some(contract) => format!("{}y @ {}", contract.years, money(contract.annual_salary)),
        None => "-".to_string(),
    }
}

/// Summary plus the `top` most expensive players
pub fn render_table(run: &PricingRun, top: usize) -> String {
    let allocation = &run.allocation;
    let mut lines = vec![
        format!(
            "Envelope: {} teams, {} discretionary, target spend {}, {} open slots",
            run.envelope.total_teams,
            money(run.envelope.total_discretionary),
            money(run.envelope.target_spend),
            run.envelope.open_slots
        ),
        format!(
            "Allocation: {:?}, scale {}, projected spend {} ({} in slot, {} beyond)",
            allocation.status,
            allocation.scale.map(|s| format!("{s:.4}")).unwrap_or_else(|| "-".to_string()),
            money(allocation.projected_spend),
            allocation.in_slot,
            allocation.beyond_slots
        ),
        String::new(),
        format!(
            "{:<24} {:<4} {:<8} {:>7} {:>10} {:>10} {:>5} {:<16}",
            "Player", "Pos", "Tier", "Rank", "Intrinsic", "Final", "Conf", "Contract"
        ),
    ];

    for valuation in run.ranked_by_price().into_iter().take(top) {
        let name = valuation.name.as_deref().unwrap_or(&valuation.player_id);
        lines.push(format!(
            "{:<24} {:<4} {:<8} {:>7.1} {:>10} {:>10} {:>5.2} {:<16}",
            name,
            valuation.position.code(),
            valuation.tier.label(),
            valuation.weighted_rank,
            money(valuation.factors.base_price),
            money(valuation.factors.final_price),
            valuation.factors.confidence,
            contract_summary(valuation)
        ));
    }

    lines.join("\n")
}
