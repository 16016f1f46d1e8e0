use std::path::Path;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use filehub_server::api::AppState;
use filehub_server::config::{FilehubConfig, Mode};
use filehub_service::{FileService, FileServiceConfig};

/// Environment variable overriding `[server] mode`.
const MODE_ENV: &str = "FILEHUB_MODE";

/// filehub upload service.
#[derive(Parser, Debug)]
#[command(name = "filehub-server", about = "HTTP server for the filehub upload service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "filehub.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the repository schema and exit.
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let mut config: FilehubConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        info!(path = %cli.config, "config file not found, using defaults");
        toml::from_str("")?
    };

    if let Ok(raw) = std::env::var(MODE_ENV) {
        config.server.mode = raw.parse::<Mode>()?;
        info!(mode = %config.server.mode, env = MODE_ENV, "mode overridden by environment");
    }

    if let Some(Commands::Migrate) = cli.command {
        return run_migrate(&config).await;
    }

    let policy = config.upload.policy();
    let storage = filehub_server::storage_factory::create_storage(
        config.server.mode,
        &config.storage,
        policy.clone(),
    )
    .await?;
    let repository =
        filehub_server::repository_factory::create_repository(&config.repository).await?;
    let cache = filehub_server::cache_factory::create_cache(&config.cache)?;

    let service = FileService::new(
        storage,
        repository,
        cache,
        FileServiceConfig {
            policy,
            cache_ttl: config.cache.ttl(),
        },
    );

    let app = filehub_server::api::router(AppState {
        service: service.clone(),
    });

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, mode = %config.server.mode, "filehub-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain in-flight uploads and release the cache connection.
    let timeout_secs = config.server.shutdown_timeout_seconds;
    info!(timeout_secs, "waiting for in-flight uploads...");
    if tokio::time::timeout(Duration::from_secs(timeout_secs), service.shutdown())
        .await
        .is_err()
    {
        warn!(
            timeout_secs,
            "shutdown timeout exceeded, in-flight uploads may be abandoned"
        );
    }

    info!("filehub-server shut down");
    Ok(())
}

/// Run the `migrate` subcommand: initialize the repository schema and exit.
async fn run_migrate(config: &FilehubConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(backend = %config.repository.backend, "running repository migrations...");
    let _repository =
        filehub_server::repository_factory::create_repository(&config.repository).await?;
    info!(backend = %config.repository.backend, "repository migrations complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
