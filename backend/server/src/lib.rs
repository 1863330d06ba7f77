//! Vote service for the shared bookmark feed.
//!
//! Users cast one directional vote per bookmark and the feed shows, per bookmark,
//! the vote sum and the caller's own vote. Login and bookmark creation belong to
//! other services; this one only verifies identities and checks that bookmarks exist.
//!
//!
//!
//! # Routes
//! - `POST /votes`: `{itemId, voteType}` with `voteType` in `-1`, `0` (remove) or `1`
//! - `GET /votes/{item_id}`: the caller's own record, or `null`
//! - `GET /bookmarks`: the feed, newest first, with `voteCount` and `userVote`
//! - `GET /bookmarks/{id}`: one feed entry
//! - `GET /healthz`
//!
//! Voting needs a bearer token. Reads work without one, an unusable token reads as anonymous.
//!
//!
//!
//! # Votes
//!
//! The ledger holds at most one record per (user, bookmark), and only ever `1` or `-1`.
//! A request is applied exactly as sent: no implicit toggling here, the client decides
//! what pressing an already active arrow means and sends `0` to clear.
//!
//! Two users voting at once on the same bookmark never block each other. The same user
//! voting twice at once ends with whichever write landed last.
//!
//!
//!
//! # Notes
//!
//! ## Memory vs Redis
//! The memory backend is enough for a single instance and for tests. Redis keeps the
//! ledger across restarts and lets several instances share it. Bookmarks are read from
//! the `bookmarks` hash the bookmark service maintains, or from `SEED_PATH` in memory mode.
//!
//! ## Drift
//! Clients keep their optimistic counts after a successful vote and only catch up with
//! other users' votes on the next feed load. Nothing here pushes updates.
//!
//!
//!
//! # Setup
//!
//! Environment:
//! - `RUST_PORT` (8080)
//! - `LEDGER_BACKEND` (`memory` or `redis`)
//! - `REDIS_URL` (`redis://127.0.0.1:6379`)
//! - `JWT_SECRET`, read from `/run/secrets/JWT_SECRET` first
//! - `SEED_PATH`, JSON array of bookmarks for the memory backend
//! - `RUST_LOG`, e.g. `server=debug`
//!
//! Run with per-vote logging.
//! ```sh
//! cargo run -p ballot-backend --features verbose
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod feed;
pub mod ledger;
pub mod routes;
pub mod state;
pub mod utils;
pub mod votes;


use config::Config;
use routes::{bookmark_handler, feed_handler, health_handler, own_vote_handler, votes_handler};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/votes", post(votes_handler))
        .route("/votes/{item_id}", get(own_vote_handler))
        .route("/bookmarks", get(feed_handler))
        .route("/bookmarks/{item_id}", get(bookmark_handler))
        .route("/healthz", get(health_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            return std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
