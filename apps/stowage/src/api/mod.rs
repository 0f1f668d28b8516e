//! # Stowage HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /characters` - List stored characters
//! - `PUT /characters/{id}` - Store a character record
//! - `GET /characters/{id}/sheet` - Prepare the sheet and sync `encumbered`
//! - `POST /characters/{id}/conditions/{key}/toggle` - Flip a condition
//! - `POST /characters/{id}/items/{item}/active` - Activate, deactivate or stow an item
//! - `POST /evaluate` - Prepare a posted record without storing it
//!
//! ## Security Configuration
//!
//! CORS origins and the API key come from [`ServerConfig`], which the
//! configuration loader fills from the `[server]` table and the
//! `STOWAGE_CORS_ORIGINS` / `STOWAGE_API_KEY` environment variables.

mod auth;
mod handlers;
mod types;

pub use auth::{ApiKey, keys_match};
pub use types::{
    ApiError, CharacterListResponse, CharacterSummary, ErrorResponse, HealthResponse,
    ItemStateRequest, ItemStateResponse, PutCharacterResponse, SheetResponse, ToggleResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use stowage_core::{Roster, StowageError};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (2 MB).
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the roster.
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<RwLock<Roster>>,
}

impl AppState {
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: Arc::new(RwLock::new(roster)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `None`: localhost only
/// - `["*"]`: every origin
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                restricted_cors(allowed)
            }
        }
        None => build_localhost_cors(),
    }
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:30000",
        "http://localhost:8080",
        "http://127.0.0.1:30000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let cors = build_cors_layer(server.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/characters", get(handlers::list_characters_handler))
        .route("/characters/{id}", put(handlers::put_character_handler))
        .route("/characters/{id}/sheet", get(handlers::sheet_handler))
        .route(
            "/characters/{id}/conditions/{key}/toggle",
            post(handlers::toggle_condition_handler),
        )
        .route(
            "/characters/{id}/items/{item}/active",
            post(handlers::item_state_handler),
        )
        .route("/evaluate", post(handlers::evaluate_handler));

    match server.api_key.as_deref() {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(
                ApiKey(Arc::from(key)),
                auth::api_key_auth_middleware,
            ));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible! \
                 Set STOWAGE_API_KEY to enable authentication."
            );
        }
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(roster: Roster, server: &ServerConfig) -> Result<(), StowageError> {
    let addr = format!("{}:{}", server.host, server.port);
    let router = create_router(AppState::new(roster), server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StowageError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Stowage HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| StowageError::IoError(format!("Server error: {}", e)))
}
