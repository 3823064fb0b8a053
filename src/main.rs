//! hitcounter entry point.
//!
//! Initializes tracing, loads configuration from the environment, builds the
//! lazily connecting database pool, sets up the Axum router and serves it.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hitcounter::config::{
    AppConfig, LogFormat, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, DEFAULT_LOG_FILTER,
};
use hitcounter::{create_router, server, AppState, Database};

/// hitcounter: a JSON backend backed by PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "hitcounter", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_HTTP_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Log level filter (e.g., "hitcounter=debug,sqlx=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration first: the log format depends on it
    let config = AppConfig::from_env()?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!(
        db_host = %config.db.host,
        db_port = config.db.port,
        db_name = %config.db.name,
        db_user = %config.db.user,
        "Loaded configuration"
    );

    let db = Database::connect_lazy(&config.db);
    let state = AppState::new(config, db);
    let app = create_router(state);

    let listener = server::bind(&args.host, args.port).await?;
    server::serve(listener, app).await?;

    Ok(())
}
