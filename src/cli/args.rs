//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Track strength workouts from the command line
#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "ironlog - workout session engine and strength calculators", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate a one-rep max from a weight and rep count
    #[command(name = "e1rm")]
    E1rm {
        weight: f64,
        reps: i32,
    },

    /// Show the plates to load on each side of the bar
    Plates {
        /// Target total weight
        total: f64,

        /// Bar weight (defaults to the configured bar)
        #[arg(long)]
        bar: Option<f64>,
    },

    /// Replay a scripted workout through the session engine and save it
    Replay {
        /// YAML workout script
        script: PathBuf,
    },
}
