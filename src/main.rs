//! NBA Trade Checker
//!
//! Validates multi-team trade proposals against the CBA's salary-matching
//! and apron rules, and asks an external generator for alternative ideas.

mod cba;
mod db;
mod error;
mod models;
mod narrative;
mod trade;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal_macros::dec;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::cba::{dollars, updated_value, CbaConfig, TeamEvaluation, TradeEvaluation, TradeEvaluator};
use crate::db::Database;
use crate::models::{DraftPick, Player, TradeProposal};
use crate::narrative::{build_prompt, NarrativeClient, NarrativeConfig};

/// NBA trade checker CLI.
#[derive(Parser)]
#[command(name = "tradecheck")]
#[command(about = "Check NBA trade proposals against CBA salary-matching rules", long_about = None)]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "sqlite:./tradecheck.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// JSON file overriding the default rule thresholds
    #[arg(short, long, env = "TRADECHECK_RULES")]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a trade proposal file
    Check {
        /// Proposal JSON file
        proposal: PathBuf,

        /// Store the evaluation in the database
        #[arg(long)]
        save: bool,

        /// Mark the stored trade as accepted (valid trades only)
        #[arg(long, requires = "save")]
        accept: bool,

        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project a cap space figure through a net salary change
    Project {
        /// Current space in dollars (negative when over the line)
        #[arg(long, allow_hyphen_values = true)]
        current: i64,

        /// Net incoming salary in dollars (negative when shedding salary)
        #[arg(long, allow_hyphen_values = true)]
        delta: i64,
    },

    /// Show current rule configuration
    Config,

    /// Evaluate a proposal and ask the generator for alternative trades
    Ideas {
        /// Proposal JSON file
        proposal: PathBuf,

        /// Number of alternatives to ask for
        #[arg(short, long, default_value = "3")]
        max_ideas: usize,

        /// Print the prompt instead of calling the generator
        #[arg(long)]
        prompt_only: bool,

        /// Store the evaluation and generated ideas
        #[arg(long)]
        save: bool,
    },

    /// List stored evaluations
    History {
        /// Maximum number of evaluations to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show a stored evaluation
    Show {
        /// Evaluation id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.rules {
        Some(path) => CbaConfig::from_json_file(path)?,
        None => CbaConfig::default(),
    };
    let evaluator = TradeEvaluator::new(config);

    match cli.command {
        Commands::Check {
            proposal: path,
            save,
            accept,
            json,
        } => {
            let proposal = load_proposal(&path)?;
            let evaluation = evaluate(&evaluator, &proposal, &path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                print_evaluation(&evaluation);
            }

            if save {
                let db = Database::new(&cli.database).await?;
                let id = db.save_evaluation(&proposal, &evaluation, accept).await?;
                println!("\nSaved as {}", id);
                if accept && !evaluation.is_valid() {
                    println!("Not marked accepted: the trade fails CBA rules.");
                }
            }
        }

        Commands::Project { current, delta } => {
            let projected = updated_value(current, delta);
            println!("Current:   {}", dollars(current));
            println!("Net delta: {}", dollars(delta));
            println!("Projected: {}", dollars(projected));
        }

        Commands::Config => {
            let config = evaluator.config();

            println!("\n=== Salary-Matching Rules ===\n");
            println!("Second apron:");
            println!("  Net incoming salary:  not allowed");
            println!("\nFirst apron (over or crossing):");
            println!(
                "  Max incoming:         {}% of outgoing + {}",
                (config.first_apron_match_pct * dec!(100)).normalize(),
                dollars(config.match_buffer)
            );
            println!("\nOver cap, under first apron:");
            println!(
                "  Max incoming:         {}% of outgoing + {}",
                (config.over_cap_match_pct * dec!(100)).normalize(),
                dollars(config.match_buffer)
            );
            println!("\nProposal limits:");
            println!("  Teams per trade:      {}-{}", config.min_teams, config.max_teams);

            let narrative = NarrativeConfig::from_env()?;
            println!("\n=== Trade Ideas ===\n");
            println!("  API URL:              {}", narrative.api_url);
            println!("  Model:                {}", narrative.model);
            println!("  API key:              {}", if narrative.api_key.is_some() { "set" } else { "not set" });
        }

        Commands::Ideas {
            proposal: path,
            max_ideas,
            prompt_only,
            save,
        } => {
            let proposal = load_proposal(&path)?;
            let evaluation = evaluate(&evaluator, &proposal, &path)?;
            let prompt = build_prompt(&evaluation, max_ideas);

            if prompt_only {
                println!("{}", prompt);
                return Ok(());
            }

            let client = NarrativeClient::from_env()?;
            let ideas = client.generate(&prompt).await?;

            print_evaluation(&evaluation);
            println!("\n=== Trade Ideas ===\n");
            println!("{}", ideas);

            if save {
                let db = Database::new(&cli.database).await?;
                let id = db.save_evaluation(&proposal, &evaluation, false).await?;
                db.save_narrative(&id, &ideas).await?;
                println!("\nSaved as {}", id);
            }
        }

        Commands::History { limit } => {
            let db = Database::new(&cli.database).await?;
            let records = db.recent_evaluations(limit).await?;

            if records.is_empty() {
                println!("No stored evaluations. Use 'tradecheck check <file> --save' to add one.");
                return Ok(());
            }

            let (total, valid, accepted) = db.evaluation_stats().await?;

            println!(
                "\n{:<38} {:<26} {:<20} {:>7} {:>8}",
                "ID", "CREATED", "TEAMS", "VALID", "ACCEPTED"
            );
            println!("{}", "-".repeat(103));

            for r in &records {
                println!(
                    "{:<38} {:<26} {:<20} {:>7} {:>8}",
                    r.id,
                    truncate(&r.created_at, 25),
                    truncate(&r.team_ids, 19),
                    if r.is_valid { "yes" } else { "no" },
                    if r.accepted { "yes" } else { "no" }
                );
            }

            println!("\nTotal: {}  Valid: {}  Accepted: {}", total, valid, accepted);
        }

        Commands::Show { id } => {
            let db = Database::new(&cli.database).await?;
            let record = db
                .get_evaluation(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Evaluation {} not found", id))?;

            println!("\n=== Evaluation {} ===", record.id);
            println!("Created:  {}", record.created_at);
            println!("Teams:    {}", record.team_ids);
            println!("Valid:    {}", if record.is_valid { "Yes" } else { "No" });
            println!("Accepted: {}", if record.accepted { "Yes" } else { "No" });
            println!("Verdict:  {}", record.message);

            let details: serde_json::Value = serde_json::from_str(&record.evaluation_json)
                .context("Stored evaluation is not valid JSON")?;
            println!("\n{}", serde_json::to_string_pretty(&details)?);

            if let Some(narrative) = &record.narrative {
                println!("\n=== Trade Ideas ===\n");
                println!("{}", narrative);
            }
        }
    }

    Ok(())
}

/// Read and parse a proposal file.
fn load_proposal(path: &Path) -> Result<TradeProposal> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read proposal {}", path.display()))?;
    let proposal = TradeProposal::from_json(&raw)
        .with_context(|| format!("Failed to parse proposal {}", path.display()))?;

    info!(
        path = %path.display(),
        teams = proposal.teams.len(),
        movements = proposal.movements.len(),
        "Loaded proposal"
    );
    Ok(proposal)
}

fn evaluate(evaluator: &TradeEvaluator, proposal: &TradeProposal, path: &Path) -> Result<TradeEvaluation> {
    evaluator
        .evaluate(proposal)
        .with_context(|| format!("Proposal {} is inconsistent", path.display()))
}

fn print_evaluation(evaluation: &TradeEvaluation) {
    println!(
        "\n{:<22} {:<26} {:>14} {:>14} {:>14} {:>6}",
        "TEAM", "TIER", "OUT", "IN", "NET", "RESULT"
    );
    println!("{}", "-".repeat(101));

    for team in &evaluation.teams {
        let s = &team.summary;
        let tier = if team.tier_before == team.tier_after {
            team.tier_before.to_string()
        } else {
            format!("{} -> {}", team.tier_before, team.tier_after)
        };
        println!(
            "{:<22} {:<26} {:>14} {:>14} {:>14} {:>6}",
            truncate(&s.team_name, 21),
            tier,
            dollars(s.outgoing_salary),
            dollars(s.incoming_salary),
            dollars(s.cap_difference),
            if team.verdict.passed { "PASS" } else { "FAIL" }
        );
    }

    for team in &evaluation.teams {
        print_team_details(team);
    }

    println!(
        "\nVerdict: {} - {}",
        if evaluation.is_valid() { "VALID" } else { "INVALID" },
        evaluation.verdict.message
    );
}

fn print_team_details(team: &TeamEvaluation) {
    let s = &team.summary;
    println!("\n--- {} ---", s.team_name);
    println!("  Sends:        {}", asset_names(&s.players_sent, &s.picks_sent));
    println!("  Receives:     {}", asset_names(&s.players_received, &s.picks_received));
    println!("  Cap space:    {}", dollars(team.projection.updated_cap_space));
    println!("  First apron:  {}", dollars(team.projection.updated_first_apron_space));
    println!("  Second apron: {}", dollars(team.projection.updated_second_apron_space));
    println!("  Rule:         {}", team.verdict.message);
}

fn asset_names(players: &[Player], picks: &[DraftPick]) -> String {
    let names: Vec<String> = players
        .iter()
        .map(|p| format!("{} ({})", p.name, dollars(p.salary())))
        .chain(picks.iter().map(DraftPick::label))
        .collect();

    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
