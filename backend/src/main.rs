use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use polygon_core::config::EditorConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod session;

use session::{format_error, Command, EditorSession};

// Application State
struct AppState {
    config: EditorConfig,
}

/// Editor tuning from the JSON file named by `POLYGON_EDITOR_CONFIG`, or the
/// defaults when unset or unusable.
fn load_config() -> EditorConfig {
    let Ok(path) = std::env::var("POLYGON_EDITOR_CONFIG") else {
        return EditorConfig::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| EditorConfig::from_json_str(&text).map_err(|e| e.to_string()));
    match loaded {
        Ok(config) => {
            info!("Loaded editor config from {}", path);
            config
        }
        Err(e) => {
            warn!("Ignoring editor config {}: {}", path, e);
            EditorConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let shared_state = Arc::new(AppState {
        config: load_config(),
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let addr = std::env::var("POLYGON_EDITOR_ADDR")
        .ok()
        .and_then(|a| a.parse::<SocketAddr>().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server stopped: {}", e);
    }
}

async fn root() -> String {
    banner()
}

fn banner() -> String {
    format!("Polygon editor backend {}", polygon_core::version())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Each connection edits its own polygon
    let mut session = EditorSession::new(state.config.clone());
    info!(session = %session.id(), "Client connected");
    let (mut sender, mut receiver) = socket.split();

    if sender.send(Message::Text(session.snapshot_frame())).await.is_err() {
        return;
    }

    while let Some(msg) = receiver.next().await {
        let msg = if let Ok(msg) = msg {
            msg
        } else {
            return;
        };

        let Message::Text(text) = msg else {
            continue;
        };
        info!(session = %session.id(), "Received message: {}", text);

        let frames = match Command::parse(&text).and_then(|command| session.apply(command)) {
            Ok(frames) => frames,
            Err(e) => {
                warn!(session = %session.id(), code = e.code(), "Command failed: {}", e);
                vec![format_error(e.code(), &e.to_string(), "warning")]
            }
        };

        for frame in frames {
            if sender.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }
    }

    info!(session = %session.id(), vertices = session.polygon().len(), "Client disconnected");
}
