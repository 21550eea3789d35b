use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::net::SocketAddr;
use axum::extract::{ConnectInfo, Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router, TypedHeader};
use dashmap::DashMap;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::info;
use crate::config::AnimationTiming;
use crate::handlers::routing::RouteProvider;
use crate::handlers::websocket_actor::{TrackingSessionHandler, WebsocketActor};
use crate::models::position::Position;
use crate::models::vehicle::VehicleState;
use crate::models::warehouse;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<dyn RouteProvider>,
    pub timing: AnimationTiming,
    pub start: Position,
    pub sessions: Arc<DashMap<String, TrackingSessionHandler>>,
    next_serial: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(router: Arc<dyn RouteProvider>, timing: AnimationTiming, start: Position) -> Self {
        Self {
            router,
            timing,
            start,
            sessions: Arc::new(DashMap::new()),
            next_serial: Arc::new(AtomicU64::new(0)),
        }
    }
}

pub fn app(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/ws/:session_id", get(tracking_ws_handler))
        .route("/warehouses", get(warehouses))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}

async fn warehouses() -> Json<BTreeMap<&'static str, Position>> {
    Json(warehouse::positions())
}

async fn tracking_ws_handler(
    ws: WebSocketUpgrade,
    user_agent: Option<TypedHeader<headers::UserAgent>>,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    let user_agent = user_agent.map_or_else(|| "unknown client".to_string(), |TypedHeader(ua)| ua.as_str().to_string());
    info!("`{}` at {} connected to session {}", user_agent, addr, session_id);
    ws.on_upgrade(move |socket| run_session(socket, session_id, state))
}

async fn run_session(socket: axum::extract::ws::WebSocket, session_id: String, state: AppState) {
    let serial = state.next_serial.fetch_add(1, Ordering::Relaxed);

    // a second connection under a live session id takes over its vehicle
    let vehicle = state.sessions.get(&session_id)
        .map(|previous| VehicleState::new(previous.vehicle().current()))
        .unwrap_or_else(|| VehicleState::new(state.start));

    let (handler, inbound, outbound) =
        TrackingSessionHandler::new(serial, state.router.clone(), vehicle, state.timing);
    if state.sessions.insert(session_id.clone(), handler).is_some() {
        info!("Session {} replaced by a new connection", session_id);
    }

    WebsocketActor::new(socket, inbound, outbound).run_actor().await;

    state.sessions.remove_if(&session_id, |_, handler| handler.serial() == serial);
    info!("Session {} closed", session_id);
}
