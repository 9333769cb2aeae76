use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use heapcal::{AppState, build_router, singleton};
use heapcal_advisor::{Advisor, OpenAiAdvisor};
use heapcal_core::{Config, Repository, Store};

#[derive(Parser)]
#[command(name = "heapcal-server")]
#[command(about = "Calendar and heap task server with model-assisted scheduling", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding events, categories and settings
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5000
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heapcal=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    let data_path = config.data_path();

    // Ensure only one server writes this data file
    let _lock = singleton::acquire_lock(&data_path)?;

    let repo = Repository::open(Store::new(data_path));

    let advisor = OpenAiAdvisor::from_config(&config).context("Failed to build model client")?;
    if !advisor.is_configured() {
        warn!("OPENAI_API_KEY is not set; AI endpoints will return errors");
    }

    let app = build_router(AppState::new(repo, Arc::new(advisor)));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("heapcal-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
