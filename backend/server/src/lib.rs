//! Documentation of a pairwise "who's more attractive" voting site with a
//! password-gated chat lobby.
//!
//!
//!
//! # General Infrastructure
//! - One axum server renders every page, no separate frontend build
//! - Candidates and ratings live in Redis (`STORE_URL`), or in memory for local runs
//! - Candidate images are plain files under `STATIC_DIR`, served at `/static`
//! - Chat messages never touch this server, the browser talks to Firebase directly
//!
//!
//!
//! # Voting
//!
//! - `/` and `/vote/{gender}` show two distinct random people
//! - Picking one posts `winner_id`/`loser_id` to `/vote` and redirects back for a new pair
//! - Ratings start at 1400 and move with an Elo update, step factor 32 (see [`rating`])
//! - Missing or bogus ids are ignored, the visitor simply gets a new pair
//! - Ratings are written with a compare-and-set so simultaneous votes on the same
//!   person cannot overwrite each other (see [`vote`])
//!
//!
//!
//! # Chat
//!
//! - Everyone shares one password (`ACCESS_PASSWORD`)
//! - Correct password sets a signed `session` cookie (see [`session`])
//! - `/chat` lists rooms, `/room?name=` opens one
//! - Both pages embed `FIREBASE_CONFIG` and `APP_ID` for the Firebase client
//!
//!
//!
//! # Setup
//!
//! Local run with the in-memory store.
//! ```sh
//! STORE_URL=memory:// SESSION_SECRET=dev ACCESS_PASSWORD=dev RUST_LOG=info cargo run -p facemash
//! ```
//!
//! Seed Redis with a custom roster.
//! ```sh
//! cargo run -p manage -- seed --file roster.json --reset
//! ```
//!
//! Print the current ranking.
//! ```sh
//! cargo run -p manage -- ranking --limit 10
//! ```
use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod firebase;
pub mod memory;
pub mod pages;
pub mod rating;
pub mod redis_store;
pub mod routes;
pub mod session;
pub mod state;
pub mod utils;
pub mod vote;

use config::Config;
use routes::{
    chat_handler, gender_ranking_handler, index_handler, login_handler, login_page_handler,
    logout_handler, ranking_handler, room_handler, vote_handler, vote_page_handler,
};
use state::AppState;

pub fn build_app(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(index_handler))
        .route("/vote", post(vote_handler))
        .route("/vote/{gender}", get(vote_page_handler))
        .route("/ranking", get(ranking_handler))
        .route("/ranking/{gender}", get(gender_ranking_handler))
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/chat", get(chat_handler))
        .route("/room", get(room_handler))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let config = Config::load()?;
    let state = AppState::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
