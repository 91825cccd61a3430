//! Video Summarizer Web - HTMX front-end for the summarization API.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use vidsum_core::AppConfig;

use state::AppState;

/// Resolve the static files directory.
///
/// Priority:
/// 1. Explicit path if provided
/// 2. ./static if it exists
/// 3. Crate's built-in static directory
fn resolve_static_dir(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return PathBuf::from(path);
    }

    let local_static = PathBuf::from("static");
    if local_static.is_dir() {
        return local_static;
    }

    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[derive(Parser, Debug)]
#[command(name = "vidsum-web")]
#[command(author, version, about = "Video Summarizer Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Summarization API base URL
    #[arg(long, env = "VIDSUM_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Static files directory (defaults to ./static or crate's static dir)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<String>,
}

fn build_router(state: Arc<AppState>, static_dir: PathBuf) -> Router {
    Router::new()
        // Pages
        .route("/", get(routes::index))
        .route("/app/{session_id}", get(routes::app_page))
        // API endpoints - HTML fragments (HTMX)
        .route("/api/submit/{session_id}", post(routes::submit_video))
        .route("/api/translate/{session_id}", post(routes::translate_summary))
        .route("/api/chat/{session_id}", post(routes::send_chat))
        .route("/api/mode/{session_id}/{mode}", post(routes::set_mode))
        .route(
            "/api/quiz/{session_id}/{question}/{choice}",
            post(routes::answer_quiz),
        )
        // API endpoints - JSON
        .route("/api/state/{session_id}", get(routes::get_state))
        // Static files with Cache-Control: no-cache (cache but always revalidate via ETag)
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                ))
                .service(ServeDir::new(static_dir)),
        )
        // Middleware
        // Cache-Control for HTML fragments - prevents bfcache issues with HTMX
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},hyper=warn")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    if let Some(api_url) = args.api_url {
        config.api.api_base = api_url;
    }
    if args.timeout.is_some() {
        config.api.timeout_secs = args.timeout;
    }
    config.validate().context("Invalid configuration")?;

    info!("Summarization API at {}", config.api.api_base);

    let state = Arc::new(
        AppState::new(config).context("Failed to initialize application state")?,
    );

    // Spawn background task for session cleanup (runs every 5 minutes)
    let cleanup_state = Arc::clone(&state);
    tokio::spawn(async move {
        let cleanup_interval = Duration::from_secs(5 * 60);
        loop {
            tokio::time::sleep(cleanup_interval).await;
            let removed = cleanup_state.cleanup_old_sessions().await;
            info!("Session cleanup removed {} expired sessions", removed);
        }
    });

    let app = build_router(state, resolve_static_dir(args.static_dir.as_deref()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
