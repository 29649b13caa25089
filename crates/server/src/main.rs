use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleet_core::config::PredictionConfig;
use fleet_predict::PredictionTables;
use fleet_server::{build_router, db, AppState, PgFleetRepository};

#[derive(Parser)]
#[command(name = "fleet-server", version, about = "Fleet rental prediction API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve {
        /// Override the configured listen port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective prediction lookup tables as YAML.
    Tables,
}

fn load_config() -> fleet_core::Config {
    fleet_core::config::load_dotenv();
    fleet_core::Config::from_env()
}

fn load_tables(config: &PredictionConfig) -> anyhow::Result<PredictionTables> {
    match &config.tables_path {
        Some(path) => PredictionTables::from_yaml_file(path)
            .with_context(|| format!("loading prediction tables from {}", path.display())),
        None => Ok(PredictionTables::default()),
    }
}

async fn serve(mut config: fleet_core::Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    config.log_summary();

    let tables = load_tables(&config.prediction)?;
    let pool = db::init_pg_pool(&config.postgres)
        .await
        .context("creating PostgreSQL pool")?;
    let repo = Arc::new(PgFleetRepository::new(pool));

    let state = Arc::new(AppState::new(repo, tables, &config.prediction));
    let app = build_router(state, &config.server.cors_origin);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = load_config();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(config, port).await?,
        Command::Tables => {
            let tables = load_tables(&config.prediction)?;
            print!("{}", tables.to_yaml()?);
        }
    }

    Ok(())
}
