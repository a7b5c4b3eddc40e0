mod config;
mod observability;

use clap::{Args, Parser, Subcommand};
use config::Config;
use notion::{DocumentStore, NotionClient, StoreError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use vendor_api::VendorApiError;
use vendor_api::config::Config as VendorApiConfig;

#[derive(Parser)]
#[command(version, about = "Backend for the vendor portal")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve the vendor API and the admin endpoints
    Serve(ConfigArgs),
    /// Fetch the metadata of every configured database
    CheckConnection(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, short = 'c', default_value = "vendor-portal.yaml")]
    config_file: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("could not create Notion client: {0}")]
    Store(#[from] StoreError),
    #[error("vendor API error: {0}")]
    Api(#[from] VendorApiError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not set up metrics: {0}")]
    Metrics(String),
    #[error("{0} database(s) unreachable")]
    Unreachable(usize),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (CliCommand::Serve(args) | CliCommand::CheckConnection(args)) = &cli.command;

    let config = match Config::load(&args.config_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Missing or invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry = observability::init_logging(config.sentry_dsn());

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Exiting");
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand, config: Config) -> Result<(), CliError> {
    if let Some(metrics) = &config.common.metrics {
        observability::init_metrics(metrics).map_err(CliError::Metrics)?;
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        match command {
            CliCommand::Serve(_) => serve(config.vendor_api).await,
            CliCommand::CheckConnection(_) => check_connection(&config.vendor_api).await,
        }
    })
}

fn notion_client(config: &VendorApiConfig) -> Result<NotionClient, StoreError> {
    NotionClient::new(&config.notion.api_url, config.token(), &config.notion.version)
}

async fn serve(config: VendorApiConfig) -> Result<(), CliError> {
    let store: Arc<dyn DocumentStore> = Arc::new(notion_client(&config)?);
    tracing::info!("Starting vendor API");
    vendor_api::run(config, store).await?;
    Ok(())
}

async fn check_connection(config: &VendorApiConfig) -> Result<(), CliError> {
    let client = notion_client(config)?;
    let databases = &config.databases;
    let mut unreachable = 0;

    for (name, id) in [
        ("organizations", &databases.organizations),
        ("contacts", &databases.contacts),
        ("tag_system", &databases.tag_system),
    ] {
        match client.get_collection(id).await {
            Ok(collection) => tracing::info!(
                database = name,
                id = %id,
                title = %collection.title_text(),
                "Database reachable"
            ),
            Err(e) => {
                unreachable += 1;
                tracing::error!(database = name, id = %id, error = %e, "Database unreachable");
            }
        }
    }

    if unreachable > 0 {
        return Err(CliError::Unreachable(unreachable));
    }
    Ok(())
}
