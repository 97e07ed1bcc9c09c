// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use the_chainwood::config::{load_and_validate_config, Config, RuntimeBuilder};
use the_chainwood::observability::init_tracing;

#[derive(Parser)]
#[command(
    name = "chainwood",
    version,
    about = "Run a chain of event processors over a data source",
    long_about = "Loads a steering file, assembles the processor chain from built-in and \
                  native plugins, and drives every event through it."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the job described by a steering file
    Run {
        /// Steering file (.yaml, .yml or .toml)
        steering: PathBuf,

        /// Keep native plugin modules mapped at exit
        #[arg(long)]
        leak_libraries: bool,

        /// Stop after this many events (0 = no limit); overrides the steering file
        #[arg(long)]
        max_events: Option<u64>,
    },

    /// List every registered plugin and the modules they came from
    Plugins {
        /// Also load the modules named in this steering file
        #[arg(long)]
        steering: Option<PathBuf>,
    },

    /// Validate a steering file without running it
    Check {
        /// Steering file (.yaml, .yml or .toml)
        steering: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing("info");

    match Cli::parse().command {
        Commands::Run {
            steering,
            leak_libraries,
            max_events,
        } => run(steering, leak_libraries, max_events),
        Commands::Plugins { steering } => plugins(steering),
        Commands::Check { steering } => check(steering),
    }
}

fn load(steering: &Path) -> Result<Config> {
    load_and_validate_config(steering)
        .with_context(|| format!("cannot use steering file '{}'", steering.display()))
}

fn run(steering: PathBuf, leak_libraries: bool, max_events: Option<u64>) -> Result<()> {
    let mut config = load(&steering)?;
    config.global.retain_libraries |= leak_libraries;
    if let Some(max_events) = max_events {
        config.global.max_events = max_events;
    }

    println!("🚀 Chainwood");
    println!("═══════════════════════════════════");
    println!("Steering file: {}", steering.display());
    println!(
        "Processors: {}",
        config
            .active_processors()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    println!();

    let start = Instant::now();
    let registry = RuntimeBuilder::build_registry(&config)?;
    let mut runner = RuntimeBuilder::build_runner(&registry, &config)?;
    let summary = runner.run()?;
    let elapsed = start.elapsed();

    println!("📊 Job summary");
    println!("   Run headers:       {}", summary.run_headers);
    println!("   Events processed:  {}", summary.events_processed);
    println!("   Rewinds:           {}", summary.rewinds);
    if let Some(reason) = &summary.stop_reason {
        println!("   Stopped early:     {}", reason);
    }
    println!("   Wall time:         {:.3?}", elapsed);
    println!();
    println!("{}", summary.report);
    Ok(())
}

fn plugins(steering: Option<PathBuf>) -> Result<()> {
    let config = match &steering {
        Some(steering) => load(steering)?,
        None => Config::default(),
    };
    let registry = RuntimeBuilder::build_registry(&config)?;
    print!("{}", registry.dump());
    Ok(())
}

fn check(steering: PathBuf) -> Result<()> {
    let config = load(&steering)?;

    println!("✅ {} is valid", steering.display());
    for processor in config.active_processors() {
        println!(
            "   {:<20} {:<20} if {}",
            processor.name,
            processor.type_name,
            processor.condition_or_default()
        );
    }
    if let Some(source) = &config.data_source {
        println!("   data source: {}", source.type_name);
    }
    if let Some(geometry) = &config.geometry {
        println!("   geometry:    {}", geometry.type_name);
    }
    Ok(())
}
