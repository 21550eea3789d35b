//! Vehicle tracking server.
//!
//! Run the server with
//! ```not_rust
//! cargo run
//! ```
//!
//! Open the map page with
//! ```not_rust
//! firefox http://localhost:3000
//! ```
//!
//! The page opens a websocket on `/ws/:session_id`, sends the selected
//! warehouse key and draws the marker, route and notices it gets back.

mod app;
mod config;
mod models;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{app, AppState};
use crate::config::CONFIG;
use crate::handlers::routing::OsrmRouter;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "TrackingService=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let router = OsrmRouter::new(CONFIG.osrm_url.as_str(), CONFIG.route_timeout)?;
    info!("Routing with {}", CONFIG.osrm_url);

    let state = AppState::new(Arc::new(router), CONFIG.timing, CONFIG.start);
    let app = app(state, &CONFIG.static_dir);

    let addr: SocketAddr = format!("{}:{}", CONFIG.host, CONFIG.port).parse()?;
    info!("listening on {}", addr);

    Server::try_bind(&addr)?
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}
