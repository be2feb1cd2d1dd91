// ABOUTME: Formcoach CLI - lists the exercise catalog and replays recorded detections
// ABOUTME: Prints per-frame counter state and the final session log for a replay file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # List every exercise with its view hint
//! formcoach-cli list
//!
//! # Replay a JSON-lines detection recording through the squat counter
//! formcoach-cli replay --exercise squat --input session.jsonl
//!
//! # Emit one JSON object per frame instead of text
//! formcoach-cli replay --exercise pullup --input bar.jsonl --json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formcoach::config::SessionConfig;
use formcoach::logging::LoggingConfig;
use formcoach::replay::{load_replay, run_replay};
use formcoach::session::WorkoutSession;
use formcoach_core::{ManualClock, SharedClock};
use formcoach_engine::ExerciseCatalog;
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "formcoach-cli",
    about = "Formcoach exercise counting CLI",
    long_about = "Lists supported exercises and replays recorded pose detections \
                  through the rep counting engine."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// List the exercise catalog
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSON-lines detection file
    Replay {
        /// Exercise id from the catalog
        #[arg(long, short = 'e')]
        exercise: String,

        /// Path to the recording
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Print one JSON object per frame
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    match cli.command {
        Command::List { json } => list(json),
        Command::Replay {
            exercise,
            input,
            json,
        } => replay(&exercise, &input, json),
    }
}

fn list(json: bool) -> Result<()> {
    let catalog = ExerciseCatalog::standard();
    if json {
        let rendered = serde_json::to_string_pretty(catalog.entries())
            .context("Failed to serialize catalog")?;
        println!("{rendered}");
        return Ok(());
    }
    for entry in catalog.entries() {
        println!("{:<18} {:<22} {}", entry.id, entry.name, entry.view_hint);
    }
    Ok(())
}

fn replay(exercise: &str, input: &Path, json: bool) -> Result<()> {
    let recording = load_replay(input)?;
    info!(
        frames = recording.frames.len(),
        skipped = recording.skipped_lines,
        exercise,
        "Replaying recording"
    );

    let start = recording.frames.first().map_or(0.0, |frame| frame.timestamp);
    let clock = Arc::new(ManualClock::new(start));
    let shared: SharedClock = clock.clone();
    let config = SessionConfig::from_env().context("Invalid session configuration")?;
    let mut session = WorkoutSession::new(config, exercise, shared)
        .with_context(|| format!("Failed to start session for '{exercise}'"))?;

    run_replay(&recording.frames, &mut session, &clock, |frame, state| {
        if json {
            let line = json!({
                "timestamp": frame.timestamp,
                "rep_count": state.rep_count,
                "phase": state.phase,
                "warnings": state.warnings,
                "is_rep_valid": state.is_rep_valid,
            });
            println!("{line}");
        } else {
            let warnings = if state.warnings.is_empty() {
                String::new()
            } else {
                format!("  [{}]", state.warnings.join("; "))
            };
            println!(
                "{:>9.3}s  reps={:<4} {:<12}{}",
                frame.timestamp, state.rep_count, state.phase, warnings
            );
        }
    });

    let log = session.finish();
    let rendered = serde_json::to_string_pretty(&log).context("Failed to serialize session log")?;
    println!("{rendered}");
    Ok(())
}
