//! Grove CLI entry point

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod testgen;
mod walk;

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "Symbol-level dependency graphs for Swift and Objective-C projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root path (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

/// Flags shared by every analysis-running subcommand.
#[derive(Args, Clone, Default)]
struct AnalysisFlags {
    /// Add an edge for every stated import, not just confirmed symbol use
    #[arg(long)]
    extended: bool,

    /// Include external modules as pseudo-nodes
    #[arg(long)]
    include_modules: bool,

    /// Path prefixes to exclude (repeatable)
    #[arg(long)]
    ignore: Vec<String>,

    /// Skip the extraction cache entirely
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph and print a summary, optionally exporting it
    Analyze {
        #[command(flatten)]
        flags: AnalysisFlags,

        /// Write a Graphviz .dot file
        #[arg(long)]
        dot: bool,

        /// Write a Mermaid .mmd diagram
        #[arg(long)]
        mermaid: bool,

        /// Write edges and metrics as CSV
        #[arg(long)]
        csv: bool,

        /// Write the graph as JSON
        #[arg(long)]
        json: bool,

        /// Directory for exported files (defaults to the project root)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Detect circular dependencies
    Cycles {
        #[command(flatten)]
        flags: AnalysisFlags,
    },
    /// Find files nothing depends on
    Orphans {
        #[command(flatten)]
        flags: AnalysisFlags,

        /// Glob marking a file as a legitimate entry point (repeatable)
        #[arg(long)]
        entry_point: Vec<String>,
    },
    /// All shortest dependency paths between two files
    Paths {
        from: String,
        to: String,

        #[command(flatten)]
        flags: AnalysisFlags,
    },
    /// Transitive closure from one file
    Closure {
        file: String,

        #[command(flatten)]
        flags: AnalysisFlags,

        /// Follow reverse edges: who depends on this file
        #[arg(long)]
        dependents: bool,

        /// Depth bound for the expansion
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Fan-in/fan-out and totals
    Metrics {
        #[command(flatten)]
        flags: AnalysisFlags,
    },
    /// Write a small fixture project for trying out the analyzer
    Generate {
        /// Target directory
        #[arg(default_value = "fixture-project")]
        dir: PathBuf,
    },
    /// Clear the extraction cache
    Clear,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("grove={}", log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Grove v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze { flags, dot, mermaid, csv, json, output_dir } => {
            commands::analyze(&cli.root, &flags, dot, mermaid, csv, json, output_dir)
        }
        Commands::Cycles { flags } => commands::cycles(&cli.root, &flags),
        Commands::Orphans { flags, entry_point } => {
            commands::orphans(&cli.root, &flags, &entry_point)
        }
        Commands::Paths { from, to, flags } => commands::paths(&cli.root, &flags, &from, &to),
        Commands::Closure { file, flags, dependents, max_depth } => {
            commands::closure(&cli.root, &flags, &file, dependents, max_depth)
        }
        Commands::Metrics { flags } => commands::metrics(&cli.root, &flags),
        Commands::Generate { dir } => testgen::generate(&dir),
        Commands::Clear => commands::clear(&cli.root),
        Commands::Version => {
            println!("Grove v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
