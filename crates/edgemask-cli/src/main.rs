//! CLI binary for edgemask: compile, inspect, and query traversal restrictions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgemask_core::config::TraversalConfig;
use edgemask_core::edges::{EdgeTypeFilter, format_matrix};
use edgemask_core::node::NodeType;
use edgemask_core::nodes::NodeTypeFilter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "edgemask", about = "Edge type restrictions for typed graph traversal")]
struct Cli {
    /// Project root holding `.edgemask/config.toml` (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an edge rule and print its canonical form
    Check {
        /// Edge rule, e.g. "rev:rev+dir,dir:*"
        rule: String,
    },

    /// Print the source × destination table of a rule
    Matrix {
        /// Edge rule (defaults to the configured one)
        rule: Option<String>,
    },

    /// Ask whether a single edge may be followed
    Allowed {
        /// Source node type (cnt, dir, rev, rel, snp, ori)
        src: String,

        /// Destination node type
        dst: String,

        /// Edge rule (defaults to the configured one)
        #[arg(long)]
        edges: Option<String>,

        /// Node rule (defaults to the configured one)
        #[arg(long)]
        nodes: Option<String>,
    },

    /// Print the rule for walking the transposed graph
    Reverse {
        /// Edge rule
        rule: String,
    },

    /// Show the effective configuration
    Config,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Check { rule } => cmd_check(&rule, json),
        Commands::Matrix { rule } => {
            let rule = match rule {
                Some(rule) => rule,
                None => load_config(&project_root)?.traversal.edges,
            };
            cmd_matrix(&rule, json)
        }
        Commands::Allowed {
            src,
            dst,
            edges,
            nodes,
        } => {
            let (edges, nodes) = match (edges, nodes) {
                (Some(edges), Some(nodes)) => (edges, nodes),
                (edges, nodes) => {
                    let config = load_config(&project_root)?;
                    (
                        edges.unwrap_or(config.traversal.edges),
                        nodes.unwrap_or(config.traversal.nodes),
                    )
                }
            };
            cmd_allowed(&src, &dst, &edges, &nodes, json)
        }
        Commands::Reverse { rule } => cmd_reverse(&rule, json),
        Commands::Config => cmd_config(&load_config(&project_root)?, json),
    }
}

/// Load the project config. Only called when a command falls back to it, so
/// explicit rules keep working over a broken config file.
fn load_config(project_root: &Path) -> Result<TraversalConfig> {
    tracing::debug!("loading config for {}", project_root.display());
    let config = TraversalConfig::load(project_root)?;
    tracing::debug!(
        edges = %config.traversal.edges,
        nodes = %config.traversal.nodes,
        "using configured rules"
    );
    Ok(config)
}

fn compile_edges(rule: &str) -> Result<EdgeTypeFilter> {
    rule.parse()
        .with_context(|| format!("invalid edge restriction {:?}", rule))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_check(rule: &str, json: bool) -> Result<()> {
    let filter = compile_edges(rule)?;

    if json {
        let pairs: Vec<(NodeType, NodeType)> = filter.allowed_pairs().collect();
        return print_json(&serde_json::json!({
            "rule": filter,
            "unrestricted": filter.is_unrestricted(),
            "allowed": pairs,
        }));
    }

    if filter.is_unrestricted() {
        println!("Unrestricted: every edge allowed");
    } else if filter.allowed_count() == 0 {
        println!("Deny all: no edge allowed");
    } else {
        println!("Canonical: {}", filter);
        println!("Allowed pairs: {}", filter.allowed_count());
    }
    Ok(())
}

fn cmd_matrix(rule: &str, json: bool) -> Result<()> {
    let filter = compile_edges(rule)?;

    if json {
        let rows: serde_json::Map<String, serde_json::Value> = NodeType::all()
            .into_iter()
            .map(|src| {
                let row: Vec<bool> = NodeType::all()
                    .into_iter()
                    .map(|dst| filter.is_allowed(src, dst))
                    .collect();
                (src.to_string(), serde_json::json!(row))
            })
            .collect();
        return print_json(&serde_json::json!({
            "columns": NodeType::all(),
            "rows": rows,
        }));
    }

    print!("{}", format_matrix(&filter));
    Ok(())
}

fn cmd_allowed(src: &str, dst: &str, edge_rule: &str, node_rule: &str, json: bool) -> Result<()> {
    let src: NodeType = src.parse()?;
    let dst: NodeType = dst.parse()?;
    let node_filter: NodeTypeFilter = node_rule
        .parse()
        .with_context(|| format!("invalid node restriction {:?}", node_rule))?;
    let filter = compile_edges(edge_rule)?.restrict_nodes(&node_filter);
    let allowed = filter.is_allowed(src, dst);

    if json {
        return print_json(&serde_json::json!({
            "src": src,
            "dst": dst,
            "allowed": allowed,
        }));
    }

    println!(
        "{} -> {}: {}",
        src,
        dst,
        if allowed { "allowed" } else { "denied" }
    );
    Ok(())
}

fn cmd_reverse(rule: &str, json: bool) -> Result<()> {
    let reversed = compile_edges(rule)?.reversed();

    if json {
        return print_json(&serde_json::json!({ "rule": reversed }));
    }

    println!("{}", reversed);
    Ok(())
}

fn cmd_config(config: &TraversalConfig, json: bool) -> Result<()> {
    let effective = config.effective_filter()?;

    if json {
        return print_json(&serde_json::json!({
            "traversal": config.traversal,
            "effective": effective,
            "allowed_pairs": effective.allowed_count(),
        }));
    }

    println!("Edges: {:?}", config.traversal.edges);
    println!("Nodes: {:?}", config.traversal.nodes);
    println!("Effective: {:?} ({} pairs)", effective.to_string(), effective.allowed_count());
    Ok(())
}
