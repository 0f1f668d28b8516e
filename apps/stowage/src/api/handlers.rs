//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler that can change conditions takes the roster write lock
//! first and holds it until the store mutation has completed.

use super::{
    AppState,
    types::{
        ApiError, CharacterListResponse, CharacterSummary, HealthResponse, ItemStateRequest,
        ItemStateResponse, PutCharacterResponse, SheetResponse, ToggleResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use stowage_core::{
    CharacterId, CharacterRecord, ConditionKey, ItemId, SheetView, StowageError, SyncOutcome,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CHARACTER HANDLERS
// =============================================================================

/// List stored characters.
pub async fn list_characters_handler(
    State(state): State<AppState>,
) -> Result<Json<CharacterListResponse>, ApiError> {
    let roster = state.roster.read().await;

    let mut characters = Vec::new();
    for id in roster.ids()? {
        let character = roster.get(&id)?;
        characters.push(CharacterSummary {
            id: character.id.0,
            name: character.name,
            kind: character.kind,
            item_count: character.items.len(),
        });
    }

    Ok(Json(CharacterListResponse { characters }))
}

/// Store a character record under `id`.
///
/// The record id may be omitted; when present it must match the path.
pub async fn put_character_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut record): Json<CharacterRecord>,
) -> Result<Json<PutCharacterResponse>, ApiError> {
    if record.id.is_empty() {
        record.id.clone_from(&id);
    } else if record.id != id {
        return Err(StowageError::InvalidCharacter(format!(
            "record id '{}' does not match path id '{}'",
            record.id, id
        ))
        .into());
    }

    let character = record.into_character()?;
    let item_count = character.items.len();

    let mut roster = state.roster.write().await;
    roster.put(character)?;
    tracing::info!(character = %id, items = item_count, "Character stored");

    Ok(Json(PutCharacterResponse { id, item_count }))
}

/// Prepare a character's sheet and synchronize its `encumbered` condition.
pub async fn sheet_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SheetResponse>, ApiError> {
    let id = CharacterId::new(id);

    let mut roster = state.roster.write().await;
    let refresh = roster.refresh(&id)?;
    log_sync(&id, refresh.sync);

    Ok(Json(SheetResponse {
        sheet: refresh.view,
        sync: refresh.sync,
    }))
}

/// Prepare a posted character without storing it.
pub async fn evaluate_handler(
    State(state): State<AppState>,
    Json(record): Json<CharacterRecord>,
) -> Result<Json<SheetView>, ApiError> {
    let character = record.into_character()?;
    let roster = state.roster.read().await;
    Ok(Json(roster.prepare(&character)))
}

// =============================================================================
// CONDITION AND LOCKER HANDLERS
// =============================================================================

/// Flip a condition on a character.
pub async fn toggle_condition_handler(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let character = CharacterId::new(&id);
    let condition = ConditionKey::new(&key);

    let mut roster = state.roster.write().await;
    let applied = roster.toggle_condition(&character, &condition)?;
    tracing::info!(character = %id, condition = %key, applied, "Condition toggled");

    Ok(Json(ToggleResponse {
        id,
        condition: key,
        applied,
    }))
}

/// Activate, deactivate or stow an item.
pub async fn item_state_handler(
    State(state): State<AppState>,
    Path((id, item)): Path<(String, String)>,
    Json(request): Json<ItemStateRequest>,
) -> Result<Json<ItemStateResponse>, ApiError> {
    let character = CharacterId::new(&id);

    let mut roster = state.roster.write().await;
    let item = roster.set_item_active(&character, &ItemId::new(item), request.state)?;
    tracing::info!(character = %id, item = %item.id, state = ?request.state, "Item state changed");

    Ok(Json(ItemStateResponse {
        character: id,
        item,
    }))
}

fn log_sync(id: &CharacterId, outcome: Option<SyncOutcome>) {
    match outcome {
        Some(SyncOutcome::Added) => {
            tracing::info!(character = %id, "Encumbered condition applied");
        }
        Some(SyncOutcome::Removed) => {
            tracing::info!(character = %id, "Encumbered condition removed");
        }
        Some(SyncOutcome::Unchanged) | None => {
            tracing::debug!(character = %id, "Encumbered condition unchanged");
        }
    }
}
