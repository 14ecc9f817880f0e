//! greenroute - conversational trip-planning backend
//!
//! A Rust backend implementing a staged dialogue state machine for
//! turn-by-turn transit planning, with climate-impact collaborators.

mod api;
mod chat;
mod climate;
mod dialogue;
mod intensity;
mod llm;
mod sessions;
mod transit;

use api::{create_router, AppState};
use chat::ChatService;
use intensity::IntensityStore;
use llm::LlmConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenroute=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let db_path = std::env::var("GREENROUTE_DB_PATH").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        format!("{home}/.greenroute/intensity.db")
    });

    let port: u16 = std::env::var("GREENROUTE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize the carbon-intensity store
    tracing::info!(path = %db_path, "Opening carbon-intensity store");
    let intensity = IntensityStore::open(&db_path)?;

    // Initialize the text-polish service
    let llm_config = LlmConfig::from_env();
    let client = llm::client_from_config(&llm_config);
    if client.is_some() {
        tracing::info!(model = %llm_config.model_id, "Gemini client configured");
    } else {
        tracing::warn!("No GEMINI_API_KEY configured; using offline text fallbacks");
    }
    let chat = ChatService::new(client);

    // Create application state
    let state = AppState::new(intensity, chat);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("greenroute server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
