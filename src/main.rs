use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use validator::Validate;

use hierflat::client;
use hierflat::config;
use hierflat::executor::ClickHouseExecutor;
use hierflat::flattener::HierarchyFlattener;
use hierflat::hierarchy_catalog::HierarchyCatalog;

/// hierflat - flattened hierarchy tables for SAP BW hierarchies on ClickHouse
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the hierarchy catalog document (YAML or JSON)
    #[arg(long, default_value = "hierarchies.yaml")]
    catalog: PathBuf,

    /// Schema the generated table is created in (overrides HIERFLAT_GENERATED_SCHEMA)
    #[arg(long)]
    generated_schema: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop and recreate the flattened table for a named hierarchy
    Create {
        /// Hierarchy name as defined in the catalog
        hierarchy: String,
    },
    /// Print rows from a previously generated table
    Show {
        /// Hierarchy name as defined in the catalog
        hierarchy: String,

        /// Limit output to the first N rows
        #[arg(long)]
        top: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    config::load_env();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::FlattenConfig::from_env()?;
    if let Some(schema) = cli.generated_schema {
        config.generated_schema = schema;
        config.validate()?;
    }

    let catalog = HierarchyCatalog::from_file(&cli.catalog)
        .with_context(|| format!("loading catalog {}", cli.catalog.display()))?;

    let ch_client = client::try_client_from_env().context(
        "Connection detail loaded incorrectly, please check .env defines \
         HIERFLAT_URL, HIERFLAT_USER, HIERFLAT_PASSWORD and HIERFLAT_DATABASE",
    )?;
    let executor = ClickHouseExecutor::new(ch_client);

    match cli.command {
        Command::Create { hierarchy } => {
            let entry = catalog.resolve(&hierarchy)?.clone();
            let flattener = HierarchyFlattener::new(&hierarchy, entry, &config, &executor);
            flattener.create().await?;
        }
        Command::Show { hierarchy, top } => {
            let entry = catalog.resolve(&hierarchy)?.clone();
            let flattener = HierarchyFlattener::new(&hierarchy, entry, &config, &executor);
            let rows = flattener.fetch_generated(top, "PrettyCompact").await?;
            println!("{}", rows);
        }
    }
    Ok(())
}
