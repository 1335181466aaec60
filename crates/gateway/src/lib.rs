//! HTTP chat gateway for SmallTalk.
//!
//! Routes:
//! - `GET /startchat` returns the greeting
//! - `POST /chat` runs one turn for the caller identified by cookie
//! - `GET /health` reports uptime and store occupancy
//! - `GET /` plus `/static/*` serve the embedded chat page
//!
//! Built on Axum; every request shares one [`ChatBot`] and one store.

pub mod frontend;
pub mod identity;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use smalltalk_bot::ChatBot;
use smalltalk_config::{AppConfig, GatewayConfig};
use smalltalk_core::Error;
use smalltalk_memory::LruDialogStorage;

pub use identity::Identity;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub bot: Arc<ChatBot>,
    /// The bot's store, kept concretely for `/health` statistics.
    pub storage: Arc<LruDialogStorage>,
    pub config: GatewayConfig,
    pub started_at: DateTime<Utc>,
}

type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(bot: Arc<ChatBot>, storage: Arc<LruDialogStorage>, config: GatewayConfig) -> Self {
        Self {
            bot,
            storage,
            config,
            started_at: Utc::now(),
        }
    }
}

/// Build the store, generators and bot described by `config`.
///
/// Shared by the HTTP server and the terminal chat so both behave the same.
pub fn build_bot(
    config: &AppConfig,
) -> Result<(Arc<ChatBot>, Arc<LruDialogStorage>), Box<dyn std::error::Error>> {
    let storage = Arc::new(
        LruDialogStorage::with_capacity(config.storage.max_dialogs)
            .ok_or("storage.max_dialogs must be greater than zero")?,
    );
    let reply = smalltalk_providers::build_reply_generator(&config.reply)?;
    let profiles = smalltalk_providers::build_profile_generator(&config.profiles)?;

    info!(
        reply = reply.name(),
        profiles = profiles.name(),
        max_dialogs = config.storage.max_dialogs,
        max_context_len = config.max_context_len,
        "Bot assembled"
    );

    let bot = ChatBot::new(reply, profiles, storage.clone())
        .with_max_context_len(config.max_context_len);
    Ok((Arc::new(bot), storage))
}

/// Build the Axum router with all gateway routes.
///
/// Layers: request body limit ([`MAX_BODY_BYTES`]) and HTTP trace logging.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/startchat", get(start_chat_handler))
        .route("/chat", post(chat_handler))
        .merge(frontend::frontend_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let (bot, storage) = build_bot(&config)?;
    let state = Arc::new(GatewayState::new(bot, storage, config.gateway.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "Gateway listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Errors ---

/// A failed request, rendered as `{"error": <message>}`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_user_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
    dialogs: usize,
    capacity: usize,
    evictions: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        dialogs: state.storage.len().await,
        capacity: state.storage.capacity(),
        evictions: state.storage.evictions(),
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Serialize)]
struct TextResponse {
    text: String,
}

async fn start_chat_handler(State(state): State<SharedState>) -> Json<TextResponse> {
    Json(TextResponse {
        text: state.bot.help().to_string(),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let identity = match Identity::resolve(&headers, &state.config) {
        Ok(identity) => identity,
        Err(e) => {
            error!(error = %e, "Could not establish caller identity");
            return ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: e.to_string(),
            }
            .into_response();
        }
    };
    if identity.is_new() {
        info!(user_id = %identity.user_id, "Assigned new user id");
    }
    debug!(user_id = %identity.user_id, text_len = payload.text.len(), "Chat message received");

    let mut response = match state.bot.respond(&identity.user_id, &payload.text).await {
        Ok(text) => Json(TextResponse { text }).into_response(),
        Err(e) => {
            if e.is_user_error() {
                debug!(user_id = %identity.user_id, error = %e, "Rejected chat input");
            } else {
                error!(user_id = %identity.user_id, error = %e, "Chat turn failed");
            }
            ApiError::from(e).into_response()
        }
    };

    // The cookie goes out even on error so the next attempt keeps this id.
    if let Some(cookie) = identity.set_cookie {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => warn!(error = %e, "Identity cookie is not a valid header value"),
        }
    }

    response
}
