use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use release_versions::config::{ServiceConfig, log_path};
use release_versions::versions::error::ConfigError;
use release_versions::versions::service::{LatestCache, VersionsService, running_tool_version};
use release_versions::versions::stores::HttpObjectStore;

#[derive(Parser)]
#[command(name = "release-versions")]
#[command(version, about = "Look up release versions and bills of materials in a config bucket")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the config bucket (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the versions manifest as JSON
    Manifest,
    /// Print the bill of materials of a platform release as JSON
    Bom { version: Option<String> },
    /// Print the latest published tool version
    LatestTool,
    /// Print the latest published platform version
    LatestPlatform,
    /// Print the version of this build
    Running,
    /// Report whether a newer tool version has been published
    CheckUpdate,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    // Logging is best effort; lookups still work without a writable data dir
    let _guard = release_versions::logging::init(&log_path())
        .inspect_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if let Command::Running = cli.command {
        println!("{}", running_tool_version());
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };

    let base_url = cli.base_url.or(config.store.base_url).context(
        "No config bucket configured: pass --base-url or set store.baseUrl in the config file",
    )?;

    let store = HttpObjectStore::new(&base_url)?;
    let cache = Arc::new(LatestCache::from_minutes(config.cache.ttl_minutes));
    info!(
        "Reading config bucket {} with cache ttl {:?}",
        store.base_url(),
        cache.ttl()
    );
    let service = VersionsService::new(Arc::new(store), cache);

    match execute(&service, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => match e.downcast_ref::<ConfigError>() {
            Some(problem) => {
                error!("{}", problem);
                eprintln!("{}: {}", problem.severity(), problem);
                Ok(ExitCode::FAILURE)
            }
            None => Err(e),
        },
    }
}

async fn execute(service: &VersionsService, command: Command) -> anyhow::Result<String> {
    let output = match command {
        Command::Manifest => serde_json::to_string_pretty(&service.get_versions().await?)?,
        Command::Bom { version } => serde_json::to_string_pretty(
            &service.get_bill_of_materials(version.as_deref()).await?,
        )?,
        Command::LatestTool => service.get_latest_tool_version().await?,
        Command::LatestPlatform => service.get_latest_platform_version().await?,
        Command::Running => service.get_running_tool_version(),
        Command::CheckUpdate => match service.check_for_tool_update().await? {
            Some(latest) => format!(
                "A newer version is available: {} (running {})",
                latest,
                service.get_running_tool_version()
            ),
            None => format!("Up to date ({})", service.get_running_tool_version()),
        },
    };

    Ok(output)
}
