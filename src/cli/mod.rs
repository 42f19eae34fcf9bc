//! CLI command handlers

pub mod args;
pub mod replay;

pub use args::{Cli, Commands};
pub use replay::{run_replay, ReplayOutcome, ReplayScript};

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::config::EngineConfig;
use crate::scoring::{calculate_plates, estimate_one_rep_max, PlateBreakdown};
use crate::session::{format_duration, SessionManager};
use crate::storage::StorageFactory;

/// Execute a parsed command against the loaded configuration
pub async fn execute_command(command: Commands, config: EngineConfig) -> Result<()> {
    match command {
        Commands::E1rm { weight, reps } => {
            println!("{:.2}", estimate_one_rep_max(weight, reps));
            Ok(())
        }
        Commands::Plates { total, bar } => {
            let bar = bar.unwrap_or(config.bar_weight);
            if !total.is_finite() || !bar.is_finite() {
                bail!("Weights must be finite numbers, got total {total} and bar {bar}");
            }
            let breakdown = calculate_plates(total, bar, &config.plates);
            print!("{}", render_plates(&breakdown));
            Ok(())
        }
        Commands::Replay { script } => {
            let script = ReplayScript::load(&script).await?;
            let storage = StorageFactory::from_config(&config.storage)
                .await
                .context("Failed to open storage")?;
            debug!("Replaying '{}' against {:?} storage", script.name, config.storage.backend);

            let manager = SessionManager::new(storage.workouts(), config);
            let outcome = run_replay(&manager, &script).await?;
            print!("{}", render_outcome(&script.name, &outcome));
            Ok(())
        }
    }
}

fn render_plates(breakdown: &PlateBreakdown) -> String {
    let mut out = format!("Bar: {:.2}\n", breakdown.bar);
    if breakdown.per_side.is_empty() {
        out.push_str("Per side: none\n");
    } else {
        let plates: Vec<String> = breakdown
            .per_side
            .iter()
            .map(|p| format!("{} x{}", p.plate, p.count))
            .collect();
        out.push_str(&format!("Per side: {}\n", plates.join(", ")));
    }
    out.push_str(&format!("Loaded: {:.2}\n", breakdown.loaded_weight()));
    out.push_str(&format!("Remainder per side: {:.2}\n", breakdown.remainder));
    out
}

fn render_outcome(name: &str, outcome: &ReplayOutcome) -> String {
    let report = &outcome.report;
    let mut out = format!("Saved workout '{}' ({})\n", name, report.workout_id);
    out.push_str(&format!(
        "Duration: {}\n",
        format_duration(Duration::from_secs(report.duration_seconds))
    ));
    out.push_str(&format!("Volume: {:.2}\n", report.total_volume));
    out.push_str(&format!(
        "Exercises: {} saved, {} dropped\n",
        report.persisted_count(),
        report.failed_count()
    ));
    for (exercise, pr) in &outcome.personal_records {
        out.push_str(&format!(
            "PR: {} e1RM {:.2} (previous {:.2})\n",
            exercise, pr.estimated_one_rep_max, pr.previous_estimate
        ));
    }
    out
}
