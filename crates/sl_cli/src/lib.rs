//! `sl_cli` - CLI commands for snowlens
//!
//! This crate provides:
//! - clap-based command definitions
//! - JSON and plain-text output
//! - Subcommands for serving the API and inspecting the seeded data

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use sl_config::SlConfig;
use sl_query::{DashboardSummary, QueryBuilder};
use sl_store::{
    ExpensiveQuery, GroupingType, LineageDependency, ObjectUsage, OperationType, SnowStore,
    SnowflakeUser,
};
use sl_web::WebServer;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// CLI errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Config error: {0}")]
    ConfigError(#[from] sl_config::ConfigError),

    #[error("Store error: {0}")]
    StoreError(#[from] sl_store::StoreError),

    #[error("Web error: {0}")]
    WebError(#[from] sl_web::WebError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON, same shapes as the HTTP API
    Json,
    /// Human-readable text
    Text,
}

/// Main CLI application
#[derive(Parser, Debug)]
#[command(name = "snowlens")]
#[command(
    author,
    version,
    about = "snowlens - Warehouse activity, cost, lineage and access dashboard API"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for commands
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show the dashboard summary
    Summary,

    /// List warehouse users
    Users {
        /// Only non-human identities
        #[arg(long, conflicts_with = "human")]
        nhi: bool,

        /// Only human users
        #[arg(long)]
        human: bool,
    },

    /// List expensive queries
    Queries {
        /// Grouping to filter by (query_hash, user_role, user_query)
        #[arg(short, long)]
        grouping: Option<GroupingType>,
    },

    /// List object usage
    Objects {
        /// Operation to filter by (READ, INSERT, UPDATE, DELETE)
        #[arg(short, long)]
        operation: Option<OperationType>,
    },

    /// List objects that depend on a source object
    Lineage {
        /// Source object name
        source: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// List config file search paths
    Paths,

    /// Write a starter configuration file
    Init {
        /// Output file path (default: snowlens.toml in current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        overwrite: bool,
    },
}

impl Cli {
    /// Load the config named by `--config`, or discover one.
    ///
    /// # Errors
    /// Returns a [`CliError`] if the config cannot be loaded or is invalid.
    pub fn load_config(&self) -> Result<SlConfig, CliError> {
        let config = match &self.config {
            Some(path) => SlConfig::load_with_env(path)?,
            None => SlConfig::discover_with_env()?,
        };
        Ok(config)
    }

    /// Run the CLI
    ///
    /// # Errors
    /// Returns a [`CliError`] when the selected command fails.
    pub async fn run(self, config: SlConfig) -> Result<(), CliError> {
        match self.command {
            Commands::Serve { port, bind } => {
                let mut config = config;
                if let Some(port) = port {
                    config.web.port = port;
                }
                if let Some(bind) = bind {
                    config.web.bind_address = bind;
                }
                config.validate()?;

                let store = open_store(&config)?;
                WebServer::new(store, config.web).run().await?;
            }
            Commands::Summary => {
                let store = open_store(&config)?;
                let summary = QueryBuilder::new(&store).dashboard_summary();
                emit(&summary, self.format, render_summary);
            }
            Commands::Users { nhi, human } => {
                let store = open_store(&config)?;
                let users = select_users(store.snowflake_users(), nhi, human);
                emit(&users, self.format, |rows| render_users(rows));
            }
            Commands::Queries { grouping } => {
                let store = open_store(&config)?;
                let queries = store.expensive_queries(grouping);
                emit(&queries, self.format, |rows| render_queries(rows));
            }
            Commands::Objects { operation } => {
                let store = open_store(&config)?;
                let usage = store.object_usage(operation);
                emit(&usage, self.format, |rows| render_objects(rows));
            }
            Commands::Lineage { source } => {
                let store = open_store(&config)?;
                let edges = store.lineage_dependencies(&source);
                emit(&edges, self.format, |rows| render_lineage(&source, rows));
            }
            Commands::Config { command } => match command {
                ConfigCommands::Show => match self.format {
                    OutputFormat::Json => print_json(&config),
                    OutputFormat::Text => println!("{}", config.to_toml()?),
                },
                ConfigCommands::Paths => {
                    let paths = SlConfig::config_paths();
                    println!("Config file search paths (in order of precedence):");
                    for (i, path) in paths.iter().enumerate() {
                        let marker = if path.exists() { "✓" } else { " " };
                        println!("  {} {}. {}", marker, i + 1, path.display());
                    }

                    if let Some(path) = paths.iter().find(|path| path.exists()) {
                        println!();
                        println!("Currently using: {}", path.display());
                    }
                }
                ConfigCommands::Init { output, overwrite } => {
                    let output_path = output.unwrap_or_else(|| PathBuf::from("snowlens.toml"));
                    write_default_config(&output_path, overwrite)?;
                    println!("✓ Generated configuration: {}", output_path.display());
                }
            },
        }
        Ok(())
    }
}

fn open_store(config: &SlConfig) -> Result<SnowStore, CliError> {
    let path = config.global.fixtures_path.as_deref();
    debug!(fixtures = ?path, "Opening store");
    Ok(SnowStore::open_or_builtin(path)?)
}

fn write_default_config(path: &Path, overwrite: bool) -> Result<(), CliError> {
    if path.exists() && !overwrite {
        return Err(CliError::CommandFailed(format!(
            "File already exists: {}. Use --overwrite to replace.",
            path.display()
        )));
    }
    std::fs::write(path, SlConfig::generate_default_toml())?;
    Ok(())
}

fn select_users(users: &[SnowflakeUser], nhi: bool, human: bool) -> Vec<&SnowflakeUser> {
    users
        .iter()
        .filter(|user| match (nhi, human) {
            (true, false) => user.is_nhi,
            (false, true) => !user.is_nhi,
            _ => true,
        })
        .collect()
}

fn emit<T: Serialize + ?Sized>(value: &T, format: OutputFormat, render: impl Fn(&T) -> String) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Text => print!("{}", render(value)),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "serialization failed: {e}"}}"#));
    println!("{json}");
}

// =============================================================================
// Text rendering
// =============================================================================

fn render_summary(summary: &DashboardSummary) -> String {
    format!(
        "Users:        {} ({} active)\nCredits:      {}\nQueries:      {}\nData scanned: {}\n",
        summary.total_users,
        summary.active_users,
        summary.total_credits,
        summary.total_queries,
        summary.total_data_scanned
    )
}

fn render_users(users: &[&SnowflakeUser]) -> String {
    let mut out = String::new();
    for user in users {
        let kind = if user.is_nhi { "nhi" } else { "human" };
        let _ = writeln!(
            out,
            "{:<22} {:<18} {:<8} {}",
            user.id, user.user_name, user.status, kind
        );
    }
    if users.is_empty() {
        out.push_str("No users\n");
    }
    out
}

fn render_queries(queries: &[&ExpensiveQuery]) -> String {
    let mut out = String::new();
    for query in queries {
        let label = query
            .query_hash
            .as_deref()
            .or(query.user_name.as_deref())
            .or(query.role_name.as_deref())
            .unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:>8} execs {:>10} credits",
            query.grouping_type.as_str(),
            label,
            query.total_executions,
            query.total_credits_used.as_deref().unwrap_or("0"),
        );
    }
    if queries.is_empty() {
        out.push_str("No queries\n");
    }
    out
}

fn render_objects(usage: &[&ObjectUsage]) -> String {
    let mut out = String::new();
    for row in usage {
        let _ = writeln!(
            out,
            "{:<24} {:<8} {:>6} accesses {:>10} credits",
            row.object_name,
            row.operation_type.map_or("-", |op| op.as_str()),
            row.access_count,
            row.credits_consumed.as_deref().unwrap_or("0"),
        );
    }
    if usage.is_empty() {
        out.push_str("No object usage\n");
    }
    out
}

fn render_lineage(source: &str, edges: &[&LineageDependency]) -> String {
    if edges.is_empty() {
        return format!("No dependents of {source}\n");
    }
    let mut out = String::new();
    for edge in edges {
        let kind = format!("{:?}", edge.dependency_type).to_lowercase();
        let _ = writeln!(
            out,
            "{} -> {} ({kind}, {})",
            edge.source_object, edge.dependent_object, edge.status
        );
    }
    out
}
