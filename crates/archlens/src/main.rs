use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use archlens_client::{load_view, ReviewApi, DEFAULT_GLOBAL_LIMIT};
use archlens_core::layout;
use archlens_core::model::{Finding, Topology};
use archlens_core::pattern::detect_pattern;
use archlens_core::view::ViewEngine;

#[derive(Parser)]
#[command(name = "archlens")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Fetch an analysis graph from the review API and print the rendered view")]
    View {
        /// Analysis id; omit for the aggregated global graph.
        #[arg(value_name = "ANALYSIS_ID")]
        analysis: Option<String>,
        #[arg(long, default_value = "http://localhost:8000")]
        api_url: String,
        /// Node cap for the global graph.
        #[arg(long, default_value_t = DEFAULT_GLOBAL_LIMIT)]
        limit: usize,
        /// Review findings file (a review response or a bare findings array)
        /// used for the finding list and severity colouring.
        #[arg(long)]
        findings: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Classify the architecture pattern of a local topology file")]
    Pattern {
        topology: PathBuf,
    },
    #[command(about = "Compute layout positions for a local topology file")]
    Layout {
        topology: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::View { analysis, api_url, limit, findings, json } => {
            let findings = match findings {
                Some(path) => read_findings(&path)?,
                None => Vec::new(),
            };
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("build async runtime")?;
            let api = ReviewApi::new(api_url);
            let view = runtime
                .block_on(load_view(&api, analysis.as_deref(), limit))
                .context("load graph view")?;

            let mut engine = ViewEngine::new();
            engine.apply(1, findings, view);

            if json {
                println!("{}", serde_json::to_string_pretty(&engine.scene())?);
            } else {
                print_view(&engine);
            }
        }
        Command::Pattern { topology } => {
            let topology = read_topology(&topology)?;
            println!("{}", detect_pattern(&topology.services, &topology.connections).as_str());
        }
        Command::Layout { topology: path, json } => {
            let topology = read_topology(&path)?;
            let pattern = topology
                .pattern
                .unwrap_or_else(|| detect_pattern(&topology.services, &topology.connections));
            let positions =
                layout::layout_topology(&topology.services, &topology.connections, pattern);
            // BTreeMap for stable output order.
            let positions: BTreeMap<&String, &layout::Position> = positions.iter().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&positions)?);
            } else {
                println!("pattern: {}", pattern.as_str());
                for (name, position) in positions {
                    println!("{:<30} x={:>7.1} y={:>7.1}", name, position.x, position.y);
                }
            }
        }
    }
    Ok(())
}

fn read_topology(path: &Path) -> Result<Topology> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read topology file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse topology {}", path.display()))
}

/// Findings arrive either as a full review response or as a bare array.
fn read_findings(path: &Path) -> Result<Vec<Finding>> {
    #[derive(Deserialize)]
    struct ReviewFile {
        risks: Vec<Finding>,
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("read findings file {}", path.display()))?;
    if let Ok(findings) = serde_json::from_str::<Vec<Finding>>(&raw) {
        return Ok(findings);
    }
    let review: ReviewFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse findings {}", path.display()))?;
    Ok(review.risks)
}

fn print_view(engine: &ViewEngine) {
    let scene = engine.scene();

    if let Some(message) = &scene.empty_message {
        println!("{}", message);
        return;
    }

    if let Some(pattern) = engine.pattern() {
        println!("pattern: {}", pattern.as_str());
    }

    let summary = engine.summary();
    if summary.total > 0 {
        println!(
            "findings: {} (critical {}, high {}, medium {}, low {})",
            summary.total, summary.critical, summary.high, summary.medium, summary.low
        );
    }

    println!("nodes:");
    let mut nodes: Vec<_> = scene.nodes.iter().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    for node in nodes {
        let badge = node
            .badge
            .map(|b| format!("  [{} findings]", b.count))
            .unwrap_or_default();
        println!(
            "  {:<30} x={:>7.1} y={:>7.1}  {}{}",
            node.label,
            node.x,
            node.y,
            node.colour.hex(),
            badge
        );
    }

    if !scene.edges.is_empty() {
        println!("edges:");
        for edge in &scene.edges {
            println!("  {} -> {}  ({})", edge.source, edge.target, edge.label);
        }
    }

    for finding in engine.findings_sorted() {
        let services = engine.affected_services(&finding.id);
        let affected = if services.is_empty() {
            String::new()
        } else {
            format!("  [{}]", services.join(", "))
        };
        println!("{:<8} {}  {}{}", finding.severity.as_str(), finding.id, finding.title, affected);
    }

    for diagnostic in &scene.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
}
