//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use stowage_core::{ActiveState, ActorKind, Item, SheetView, StowageError, SyncOutcome};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CHARACTER LISTING
// =============================================================================

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: String,
    pub name: String,
    pub kind: ActorKind,
    pub item_count: usize,
}

/// Roster listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterListResponse {
    pub characters: Vec<CharacterSummary>,
}

/// Response to storing a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutCharacterResponse {
    pub id: String,
    pub item_count: usize,
}

// =============================================================================
// SHEET RESPONSE
// =============================================================================

/// A refreshed sheet plus what the condition synchronizer did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetResponse {
    pub sheet: SheetView,
    /// `None` for actors without encumbrance.
    pub sync: Option<SyncOutcome>,
}

// =============================================================================
// CONDITIONS AND LOCKER
// =============================================================================

/// Condition toggle response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub id: String,
    pub condition: String,
    /// Whether the condition is applied after the toggle.
    pub applied: bool,
}

/// Request to change an item's `header.active` state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStateRequest {
    pub state: ActiveState,
}

/// The updated item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStateResponse {
    pub character: String,
    pub item: Item,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A core error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub StowageError);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            StowageError::CharacterNotFound(_) | StowageError::ItemNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            StowageError::ItemNotAllowed { .. }
            | StowageError::InvalidCharacter(_)
            | StowageError::InvalidCondition(_)
            | StowageError::DeserializationError(_) => StatusCode::BAD_REQUEST,
            StowageError::SerializationError(_) | StowageError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StowageError> for ApiError {
    fn from(error: StowageError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
