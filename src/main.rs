use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;

use claimform::claim::{Claim, IdentityBundle};
use claimform::occupation::OccupationCatalog;
use claimform::reconcile::{reconcile, DerivedFlags};
use claimform::rest::dto::{OccupationResponse, PageResponse, ResumeResponse};
use claimform::rest::{self, ApiDoc, ApiState};
use claimform::validation::SchemaContext;
use claimform::{logging, progress, Config, PageRegistry, Segment, Snapshot};

#[derive(Parser)]
#[command(name = "claimform")]
#[command(about = "Form progression and validation engine for benefits claims")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the wizard steps in order
    Pages,

    /// Reconcile a saved claim with identity data and print the resume point
    Resume {
        /// JSON file with verified identity attributes
        #[arg(short, long)]
        identity: Option<String>,

        /// JSON file with the saved partial claim
        #[arg(short, long)]
        partial: Option<String>,
    },

    /// Validate one step of a claim file
    Validate {
        /// Step slug (e.g. personal, employer)
        #[arg(short, long)]
        page: String,

        /// Segment index on repeatable steps
        #[arg(short, long)]
        segment: Option<String>,

        /// JSON file with the claim
        #[arg(long)]
        claim: String,
    },

    /// Search the occupation catalog
    Occupations {
        /// Job title or duties
        query: String,

        /// Maximum results (default: wizard.occupation_results)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Start the REST API server
    Serve {
        /// Port to listen on (default: 7008)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Write the effective configuration to .claimform/config.toml
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let serve_mode = matches!(cli.command, Commands::Serve { .. });
    let logging_handle = logging::init_logging(&config, serve_mode, cli.debug)?;

    match cli.command {
        Commands::Pages => cmd_pages(),
        Commands::Resume { identity, partial } => {
            cmd_resume(&config, identity.as_deref(), partial.as_deref())
        }
        Commands::Validate {
            page,
            segment,
            claim,
        } => cmd_validate(&page, segment.as_deref(), &claim),
        Commands::Occupations { query, limit } => cmd_occupations(&config, &query, limit),
        Commands::Serve { port } => {
            tracing::info!(logs = %logging::describe(&logging_handle), "Starting claimform");
            let port = port.unwrap_or(config.rest_api.port);
            rest::serve(ApiState::new(config), port).await
        }
        Commands::Openapi { yaml } => {
            let doc = if yaml { ApiDoc::yaml()? } else { ApiDoc::json()? };
            println!("{}", doc);
            Ok(())
        }
        Commands::InitConfig => {
            config.save()?;
            println!("Wrote {}", Config::local_config_path().display());
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json(path: &str) -> Result<serde_json::Value> {
    let path = Path::new(path);
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn cmd_pages() -> Result<()> {
    let registry = PageRegistry::standard();
    let pages: Vec<PageResponse> = registry
        .pages()
        .iter()
        .enumerate()
        .map(|(index, page)| PageResponse::new(index, page))
        .collect();
    print_json(&pages)
}

fn cmd_resume(config: &Config, identity: Option<&str>, partial: Option<&str>) -> Result<()> {
    let identity: Option<IdentityBundle> = identity
        .map(|path| {
            read_json(path).and_then(|v| {
                serde_json::from_value(v).context("Identity file is not a valid identity bundle")
            })
        })
        .transpose()?;
    let partial = partial.map(read_json).transpose()?;

    let registry = PageRegistry::standard();
    let snapshot = reconcile(&registry, identity.as_ref(), partial.as_ref());
    let resolution = progress::resolve(
        &registry,
        &SchemaContext::current(),
        &snapshot,
        &config.wizard.base_path,
    );
    print_json(&ResumeResponse::new(snapshot, resolution, partial.is_some()))
}

fn cmd_validate(slug: &str, segment: Option<&str>, claim_path: &str) -> Result<()> {
    let registry = PageRegistry::standard();
    let (_, page) = registry.find(slug)?;
    let segment = Segment::from_token(segment)?;

    let Some(claim) = Claim::from_value(read_json(claim_path)?) else {
        bail!("{} must hold a JSON object", claim_path);
    };
    let flags = DerivedFlags::derive(&claim);
    let snapshot = Snapshot::new(claim, flags);

    match page
        .schema_for(&SchemaContext::current(), segment)
        .validate(&snapshot)
    {
        Ok(()) => {
            println!("{} is valid", slug);
            Ok(())
        }
        Err(failure) => {
            for error in &failure.errors {
                println!("{}: {} ({})", error.path, error.message, error.key);
            }
            bail!("{} has {} invalid field(s)", slug, failure.errors.len());
        }
    }
}

fn cmd_occupations(config: &Config, query: &str, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(config.wizard.occupation_results);
    let results: Vec<OccupationResponse> = OccupationCatalog::load()
        .search(query)
        .into_iter()
        .take(limit)
        .map(OccupationResponse::from)
        .collect();

    if results.is_empty() {
        println!("No occupations match '{}'", query);
        return Ok(());
    }
    print_json(&results)
}
