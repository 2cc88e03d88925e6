//! Sonde CLI
//!
//! Command-line interface for running access-control audits against a
//! document store.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sonde_audit::{AuditRunner, Catalog, SubjectContext};
use sonde_cli::config::SondeConfig;
use sonde_report::{render_json, render_text};
use sonde_store::{DocumentStore, FirestoreStore, MemoryStore};

/// Sonde - access-control auditing for document stores
#[derive(Parser, Debug)]
#[command(name = "sonde")]
#[command(about = "Access-control auditing for document stores", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the probe catalog against the backing store
    Audit(AuditArgs),
    /// Probe catalog operations
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct AuditArgs {
    /// Authenticated user id to audit as
    #[arg(long, env = "SONDE_SELF_ID")]
    self_id: String,

    /// Firestore project id
    #[arg(long, env = "SONDE_PROJECT")]
    project: Option<String>,

    /// OAuth2 bearer token presented to the store
    #[arg(long, env = "SONDE_TOKEN")]
    token: Option<String>,

    /// Run against a permissive in-memory store (validates catalog and
    /// machinery without touching Firestore)
    #[arg(long)]
    offline: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Per-probe timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Custom probe catalog (TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    /// Fixed-width table for terminals
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum CatalogAction {
    /// Print the built-in probe catalog
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Create a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::Audit(audit) => run_audit(args.config.as_deref(), audit).await,
        Command::Catalog {
            action: CatalogAction::List,
        } => {
            print_catalog(&Catalog::builtin());
            Ok(())
        }
        Command::Config { action } => handle_config(args.config.as_deref(), action),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sonde=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run_audit(config_path: Option<&str>, args: AuditArgs) -> Result<()> {
    let config = SondeConfig::load(config_path)?;
    let timeout = Duration::from_secs(args.timeout_secs.unwrap_or(config.timeout_secs));

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };

    let store: Box<dyn DocumentStore> = if args.offline {
        Box::new(MemoryStore::allow_all())
    } else {
        let project = args.project.or(config.project_id).context(
            "a Firestore project id is required (--project, SONDE_PROJECT, or config file)",
        )?;
        let token = args.token.or(config.token);
        Box::new(FirestoreStore::new(project, token))
    };

    let subjects =
        SubjectContext::resolve(store.as_ref(), &config.users_path, &args.self_id).await?;
    let report = AuditRunner::new(store.as_ref())
        .with_timeout(timeout)
        .run(&catalog, &subjects)
        .await?;

    let rendered = match args.format {
        Format::Text => render_text(&report),
        Format::Json => render_json(&report)?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{rendered}"),
    }

    // Any unexpected exposure makes the invocation fail, for CI use.
    if report.has_critical() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    let id_width = catalog
        .probes()
        .iter()
        .map(|p| p.id.len())
        .max()
        .unwrap_or(0)
        .max("id".len());

    println!("{:<id_width$}  {:<5} {:<10} {:<8} path", "id", "op", "target", "expected");
    for spec in catalog.probes() {
        println!(
            "{:<id_width$}  {:<5} {:<10} {:<8} {}",
            spec.id,
            spec.operation.label(),
            spec.target_kind.label(),
            if spec.expected_allowed { "allow" } else { "deny" },
            spec.path,
        );
    }
}

fn handle_config(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            let path = SondeConfig::resolve_path(config_path)
                .context("could not determine config directory for this platform")?;
            let exists = path.exists();
            println!("{}", path.display());
            if !exists {
                eprintln!("(file does not exist; run `sonde config init` to create it)");
            }
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = SondeConfig::init(config_path, force)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}
