//! Offline checks against the creative-orientation core.
//!
//! Runs classification, scoring, phase artifacts and chart validation with the
//! configured pattern tables. No MCP transport and no generation engine.
//!
//! Usage:
//!   cargo run --bin co_check -- analyze "I want to fix our broken process"
//!   cargo run --bin co_check -- tension --vision "..." --reality "..."
//!   cargo run --bin co_check -- phase --outcome "..." --phase assimilation --reality "..."
//!   cargo run --bin co_check -- chart --outcome "..." --reality "..." --due 2026-12-31

use anyhow::{Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use creative_orientation::config::Config;
use creative_orientation::orientation::chart::{ChartRequest, build_chart};
use creative_orientation::orientation::phase::{PhaseOutcome, run_phase};
use creative_orientation::orientation::types::{CreativePhaseSession, Focus, Phase};
use creative_orientation::orientation::{self, compose, tension};
use creative_orientation::patterns::PatternDictionary;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "co_check")]
#[command(about = "Creative-orientation offline checks", long_about = None)]
struct Cli {
    /// Pattern table to use instead of the configured one
    #[arg(long, global = true)]
    patterns: Option<PathBuf>,

    /// Print JSON instead of the text artifact
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify text for reactive language
    Analyze {
        text: String,
        /// problem-solving, gap-filling, enhancement, reactive, or all
        #[arg(long, default_value = "all")]
        focus: String,
    },
    /// Score a vision/reality pair
    Tension {
        #[arg(long)]
        vision: String,
        #[arg(long)]
        reality: String,
    },
    /// Produce the local artifact for one creative phase
    Phase {
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        reality: Option<String>,
        #[arg(long, default_value = "germination")]
        phase: Phase,
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(long)]
        resources: Option<String>,
    },
    /// Validate and draft a structural tension chart
    Chart {
        #[arg(long)]
        outcome: String,
        #[arg(long)]
        reality: String,
        #[arg(long)]
        due: String,
        /// Repeat for each action step
        #[arg(long = "step")]
        steps: Vec<String>,
    },
}

fn load_dictionary(path: Option<PathBuf>) -> Result<PatternDictionary> {
    let dict = match path {
        Some(path) => PatternDictionary::from_path(path)?,
        None => Config::load()?.load_patterns()?,
    };
    Ok(dict)
}

fn parse_focus(raw: &str) -> Result<Focus> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| anyhow::anyhow!("unknown focus '{}'", raw))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dict = load_dictionary(cli.patterns)?;

    match cli.command {
        Commands::Analyze { text, focus } => {
            let outcome = orientation::analyze(&text, parse_focus(&focus)?, &dict);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.report);
            }
        }
        Commands::Tension { vision, reality } => {
            let t = tension::calculate(&vision, &reality, &dict);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&t)?);
            } else {
                println!("{}", compose::tension_block(&t));
            }
        }
        Commands::Phase {
            outcome,
            reality,
            phase,
            timeframe,
            resources,
        } => {
            let session = CreativePhaseSession {
                desired_outcome: outcome,
                current_reality: reality,
                phase,
                timeframe,
                resources,
            };
            match run_phase(&session, &dict)? {
                PhaseOutcome::Redirect(redirect) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&redirect)?)
                }
                PhaseOutcome::Redirect(redirect) => println!("{}", redirect.artifact),
                PhaseOutcome::Artifact(artifact) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&artifact)?)
                }
                PhaseOutcome::Artifact(artifact) => println!("{}", artifact.artifact),
            }
        }
        Commands::Chart {
            outcome,
            reality,
            due,
            steps,
        } => {
            let request = ChartRequest {
                desired_outcome: outcome,
                current_reality: reality,
                due_date: due,
                action_steps: steps,
            };
            request.check_required()?;
            match build_chart(&request, Utc::now(), &dict) {
                Ok(chart) => {
                    let t = tension::calculate(&chart.desired_outcome, &chart.current_reality, &dict);
                    if cli.json {
                        println!("{}", serde_json::to_string_pretty(&chart)?);
                    } else {
                        println!("{}", compose::chart_summary(&chart, &t));
                    }
                }
                Err(violation) => bail!("{}: {}", violation.field(), violation.guidance()),
            }
        }
    }

    Ok(())
}
