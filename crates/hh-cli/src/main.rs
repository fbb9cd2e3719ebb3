//! CLI frontend for Hollowhold object definitions and world simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hh",
    about = "Hollowhold: check, inspect, and simulate text-adventure worlds",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Stop at the first malformed definition file instead of skipping it
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every definition and try to build each object and location
    Check {
        /// Directory containing definition files (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// List loaded definitions
    List {
        /// Only list definitions of this type (e.g. container, character)
        #[arg(short = 't', long = "type")]
        object_type: Option<String>,

        /// Directory containing definition files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Create an object or location and describe it
    Show {
        /// Definition ID
        id: String,

        /// Directory containing definition files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Build the world and run it for a number of ticks
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "10")]
        ticks: u64,

        /// RNG seed for deterministic combat
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// World seconds per tick
        #[arg(long, default_value = "1.0")]
        tick_seconds: f64,

        /// Make two characters fight each other, given as "id,id"
        #[arg(short, long)]
        fight: Option<String>,

        /// Directory containing definition files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let strict = cli.strict;

    let result = match cli.command {
        Commands::Check { dir } => commands::check::run(&dir, strict),
        Commands::List { object_type, dir } => {
            commands::list::run(&dir, object_type.as_deref(), strict)
        }
        Commands::Show { id, dir } => commands::show::run(&dir, &id, strict),
        Commands::Simulate {
            ticks,
            seed,
            tick_seconds,
            fight,
            dir,
        } => commands::simulate::run(&dir, ticks, seed, tick_seconds, fight.as_deref(), strict),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
