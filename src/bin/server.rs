use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steamdl_engine::{validate_appid, EngineError, GameDetail, GameDlEngine, MirrorConfig, ProbeResult};

#[derive(Clone)]
struct AppState {
    engine: Arc<GameDlEngine>,
}

#[derive(Debug, Deserialize)]
struct GameQuery {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DownloadQuery {
    appid: String,
}

/// Success envelope the front end consumes: { success: true, data: ... }
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steamdl_server=debug,steamdl_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8090);
    let config = match std::env::var("SOURCES_PATH") {
        Ok(path) => MirrorConfig::load(&path)?,
        Err(_) => MirrorConfig::default(),
    };

    tracing::info!("🚀 Starting SteamDL Engine Server");
    tracing::info!("📡 Mirror sources: {}", config.sources.len());
    tracing::info!("🔌 Port: {}", port);

    let engine = GameDlEngine::new(config)?;
    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/steam-game", get(steam_game_handler))
        .route("/api/check-download", get(check_download_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: steamdl_engine::VERSION.to_string(),
    })
}

async fn steam_game_handler(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<ApiResponse<GameDetail>>, AppError> {
    validate_appid(&query.id)?;

    let game = state.engine.lookup(&query.id).await?;

    tracing::info!("✅ {} → {}", query.id, game.name);

    Ok(ApiResponse::ok(game))
}

async fn check_download_handler(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<ApiResponse<Vec<ProbeResult>>>, AppError> {
    validate_appid(&query.appid)?;

    let results = state.engine.check_download(&query.appid).await;

    Ok(ApiResponse::ok(results))
}

// Error handling
struct AppError(EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            EngineError::InvalidAppId(msg) => (StatusCode::BAD_REQUEST, format!("Invalid app id: {}", msg)),
            EngineError::GameNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("No game found for app id: {}", id))
            }
            EngineError::Provider { provider, message } => (
                StatusCode::BAD_GATEWAY,
                format!("Provider '{}' error: {}", provider, message),
            ),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<EngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
