//! Schema Subset CLI
//!
//! Computes the reference-closed subset of a provider schema needed by one
//! entity and prints it as JSON.
//!
//! Usage:
//!   schema-subset --schema-path schema.json --name aws:lambda/function:Function --context resource
//!   schema-subset --schema-path schema.json --name aws:lambda/Runtime:Runtime --context type \
//!       --load-full-parents --shorten-descriptions=true

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use provider_schemas::{
    compute_subset, Checksum, EntityKind, OutputFormat, ProviderSchema, SubsetConfig, SubsetRequest,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-subset")]
#[command(about = "Extract the subset of a provider schema reachable from one entity")]
struct Cli {
    /// Path to the provider schema JSON
    #[arg(long)]
    schema_path: PathBuf,

    /// Qualified name of the root entity
    #[arg(long)]
    name: String,

    /// Kind of the root entity: type, resource or function
    #[arg(long)]
    context: EntityKind,

    /// Also include every entity that references into the subset
    #[arg(long, num_args = 0..=1, default_value_t = false, default_missing_value = "true", action = ArgAction::Set)]
    load_full_parents: bool,

    /// Shorten description strings
    #[arg(long, num_args = 0..=1, default_value_t = false, default_missing_value = "true", action = ArgAction::Set)]
    shorten_descriptions: bool,

    /// Length of shortened descriptions (overrides config)
    #[arg(long)]
    max_length: Option<usize>,

    /// Marker replacing the removed part of a description (overrides config)
    #[arg(long)]
    fill: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,

    /// Config file, layered over the default locations
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SubsetConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(max_length) = cli.max_length {
        config.shorten.max_length = max_length;
    }
    if let Some(fill) = cli.fill {
        config.shorten.fill = fill;
    }

    let schema = ProviderSchema::from_path(&cli.schema_path)
        .with_context(|| format!("failed to load schema {}", cli.schema_path.display()))?;
    info!(
        path = %cli.schema_path.display(),
        entities = schema.entity_count(),
        "loaded schema"
    );

    let mut request = SubsetRequest::new(cli.context, &cli.name)
        .with_full_parents(cli.load_full_parents);
    if cli.shorten_descriptions {
        request = request.with_shortening(config.shorten.clone());
    }

    let subset = compute_subset(&schema, &request)?;

    let format = if cli.compact {
        OutputFormat::Compact
    } else {
        config.output.format
    };
    let json = subset.to_json_string(format)?;
    info!(checksum = %Checksum::from_str(&json), "subset fingerprint");

    match cli.output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote subset");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
