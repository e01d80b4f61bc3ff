//! shroud: anonymized view generator CLI
//!
//! # Usage
//!
//! ```bash
//! # Drop and recreate every anonymized view
//! shroud --config shroud.toml refresh
//!
//! # Show the CREATE VIEW statements without running them
//! shroud --config shroud.toml plan --format json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use shroud::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shroud")]
#[command(version)]
#[command(about = "Anonymized read-only views over a live PostgreSQL schema", long_about = None)]
#[command(after_help = "EXAMPLES:
    shroud --config shroud.toml check
    shroud --config shroud.toml plan
    shroud --config shroud.toml --database-url postgres://localhost/app refresh")]
struct Cli {
    /// Configuration file (default: <config dir>/shroud/shroud.toml)
    #[arg(short, long, env = "SHROUD_CONFIG")]
    config: Option<PathBuf>,

    /// Database connection URL, overrides the configuration file
    #[arg(long, env = "SHROUD_DATABASE_URL")]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop every view carrying the configured suffix
    Clear,
    /// Create or replace the view of every table
    Create,
    /// Clear, then create
    Refresh,
    /// Print the CREATE VIEW statements without running them
    Plan {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Validate the configuration without touching the database
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "shroud=debug" } else { "shroud=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let generator = config.to_generator();

    if let Commands::Check = cli.command {
        show_config(&config);
        return Ok(());
    }

    let url = cli
        .database_url
        .as_deref()
        .or(config.database_url.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!("No database URL. Use --database-url, SHROUD_DATABASE_URL or database_url in the configuration")
        })?;

    if cli.verbose {
        println!("{} {}", "Connecting to:".dimmed(), url);
    }
    let db = Database::connect(url).await?;

    match &cli.command {
        Commands::Clear => {
            let dropped = generator.clear_views(&db).await?;
            println!("{} {} view(s) dropped", "✓".green(), dropped);
        }
        Commands::Create => {
            let created = generator.create_views(&db).await?;
            println!("{} {} view(s) created", "✓".green(), created);
        }
        Commands::Refresh => {
            let dropped = generator.clear_views(&db).await?;
            let created = generator.create_views(&db).await?;
            println!(
                "{} {} view(s) dropped, {} view(s) created",
                "✓".green(),
                dropped,
                created
            );
        }
        Commands::Plan { format } => {
            let plans = generator.plan_views(&db).await?;
            show_plans(&plans, format)?;
        }
        Commands::Check => unreachable!(), // Handled above
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        return Ok(Config::load(path)?);
    }
    match Config::default_path() {
        Some(path) if path.exists() => Ok(Config::load(&path)?),
        _ => {
            tracing::warn!("No configuration file, every column passes through");
            Ok(Config::default())
        }
    }
}

fn show_plans(plans: &[ViewPlan], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(plans)?);
        }
        OutputFormat::Text => {
            if plans.is_empty() {
                println!("{}", "(no tables)".dimmed());
                return Ok(());
            }
            for plan in plans {
                println!("{} {}", "--".dimmed(), plan.table.cyan().bold());
                println!("{};", plan.sql.white());
                println!();
            }
            println!("{} view(s) planned", plans.len().to_string().cyan());
        }
    }
    Ok(())
}

fn show_config(config: &Config) {
    println!("{}", "Configuration".cyan().bold());
    println!("  {} {}", "View suffix:".dimmed(), config.view_suffix.white());

    if config.tables.is_empty() {
        println!("  {}", "(no tables configured, every column passes through)".dimmed());
        return;
    }

    for (name, table) in &config.tables {
        println!("  {}", name.white().bold());
        for (column, spec) in &table.columns {
            println!("    • {} {}", column.white(), spec.kind().yellow());
        }
    }
}
