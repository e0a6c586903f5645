//! Refgraph CLI — query the reference graph of a scene snapshot.
//!
//! Usage:
//!   refgraph -s scene.json scene                 # whole-snapshot graph
//!   refgraph -s scene.json object Root/Player    # one entity's edges
//!   refgraph -s scene.json refs-to Root/Hud      # who references it
//!   refgraph -s scene.json refs-from Root/Hud    # what it references
//!   refgraph -s scene.json orphans               # unreferenced nodes

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use refgraph::mcp::server::load_snapshot;
use refgraph::ops::{
    analyze_object, analyze_scene, find_orphans, find_references_from, find_references_to,
    AnalyzeOptions, Report,
};

#[derive(Parser)]
#[command(name = "refgraph")]
#[command(about = "Object-reference graph queries over a scene snapshot", long_about = None)]
struct Cli {
    /// Path to the snapshot JSON file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Output format: json, dot, mermaid, summary (unknown names fall back to json)
    #[arg(short, long, default_value = "json")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and render the whole-snapshot reference graph
    Scene {
        /// Leave out parent/child hierarchy edges
        #[arg(long)]
        no_hierarchy: bool,

        /// Leave out event-listener edges
        #[arg(long)]
        no_events: bool,
    },

    /// Show one entity's direct incoming and outgoing references
    Object {
        /// Entity id (slash-joined hierarchy path)
        id: String,

        /// Also merge the reference sets of all descendants
        #[arg(long)]
        children: bool,

        /// Depth cap for descendant expansion
        #[arg(long, default_value = "7")]
        max_depth: usize,

        /// Leave out event-listener edges
        #[arg(long)]
        no_events: bool,
    },

    /// List everything that references an entity, with hop depths
    RefsTo {
        /// Entity id (slash-joined hierarchy path)
        id: String,
    },

    /// List everything an entity references, with hop depths
    RefsFrom {
        /// Entity id (slash-joined hierarchy path)
        id: String,
    },

    /// List nodes nothing references (scene roots exempt)
    Orphans,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let snapshot = load_snapshot(&cli.snapshot)?;

    let mut options = AnalyzeOptions {
        format: cli.format,
        ..Default::default()
    };

    let report = match cli.command {
        Commands::Scene {
            no_hierarchy,
            no_events,
        } => {
            options.include_hierarchy = !no_hierarchy;
            options.include_events = !no_events;
            analyze_scene(&snapshot, &options)?
        }
        Commands::Object {
            id,
            children,
            max_depth,
            no_events,
        } => {
            options.include_children = children;
            options.max_depth = max_depth;
            options.include_events = !no_events;
            analyze_object(&snapshot, &id, &options)?
        }
        Commands::RefsTo { id } => find_references_to(&snapshot, &id, &options)?,
        Commands::RefsFrom { id } => find_references_from(&snapshot, &id, &options)?,
        Commands::Orphans => find_orphans(&snapshot, &options)?,
    };

    print_report(report);
    Ok(())
}

fn print_report(report: Report) {
    if report.warnings > 0 {
        eprintln!(
            "warning: {} field(s) unreadable during extraction",
            report.warnings
        );
    }
    println!("{}", report.body);
}
