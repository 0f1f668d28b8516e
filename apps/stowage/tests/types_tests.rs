//! Unit tests for API types serialization/deserialization.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use stowage::api::{
    ApiError, CharacterSummary, HealthResponse, ItemStateRequest, SheetResponse, ToggleResponse,
};
use stowage_core::{
    ActiveState, ActorKind, Character, CharacterId, Item, ItemId, Sheet, StowageError,
    SyncOutcome, Weight,
};

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_deserialization() {
    let json = r#"{"status":"healthy","version":"1.0.0"}"#;
    let health: HealthResponse = serde_json::from_str(json).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, "1.0.0");
}

// =============================================================================
// ROSTER TYPES
// =============================================================================

#[test]
fn test_character_summary_uses_lowercase_kind() {
    let summary = CharacterSummary {
        id: "bishop".to_string(),
        name: "Bishop".to_string(),
        kind: ActorKind::Synthetic,
        item_count: 3,
    };

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"kind\":\"synthetic\""));
    assert!(json.contains("\"item_count\":3"));
}

#[test]
fn test_toggle_response_serialization() {
    let toggle = ToggleResponse {
        id: "drake".to_string(),
        condition: "starving".to_string(),
        applied: true,
    };

    let json = serde_json::to_string(&toggle).unwrap();
    assert!(json.contains("\"condition\":\"starving\""));
    assert!(json.contains("\"applied\":true"));
}

#[test]
fn test_item_state_request_deserialization() {
    for (text, state) in [
        ("active", ActiveState::Active),
        ("inactive", ActiveState::Inactive),
        ("locked", ActiveState::Locked),
    ] {
        let request: ItemStateRequest =
            serde_json::from_str(&format!(r#"{{"state":"{}"}}"#, text)).unwrap();
        assert_eq!(request.state, state);
    }
}

#[test]
fn test_item_state_request_rejects_unknown_state() {
    assert!(serde_json::from_str::<ItemStateRequest>(r#"{"state":"lost"}"#).is_err());
}

// =============================================================================
// SHEET RESPONSE TESTS
// =============================================================================

#[test]
fn test_sheet_response_weights_are_decimal() {
    let character = Character::new("drake", "Drake", ActorKind::Character)
        .with_strength(3)
        .with_item(Item::gear("g1", "Flare", Weight::from_hundredths(25), 2))
        .with_item(Item::gear("g2", "Canteen", Weight::from_units(1), 1));
    let response = SheetResponse {
        sheet: Sheet::default().prepare(&character),
        sync: Some(SyncOutcome::Unchanged),
    };

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["sheet"]["total_weight"], serde_json::json!(1.5));
    assert_eq!(value["sheet"]["encumbrance"]["capacity"], 12);
    assert_eq!(value["sync"], "unchanged");
}

#[test]
fn test_sheet_response_without_encumbrance() {
    let character = Character::new("apc", "M577 APC", ActorKind::Vehicles);
    let response = SheetResponse {
        sheet: Sheet::default().prepare(&character),
        sync: None,
    };

    let value = serde_json::to_value(&response).unwrap();
    assert!(value["sheet"]["encumbrance"].is_null());
    assert!(value["sync"].is_null());
}

// =============================================================================
// ERROR MAPPING TESTS
// =============================================================================

#[test]
fn test_error_status_mapping() {
    let cases = [
        (
            StowageError::CharacterNotFound(CharacterId::new("x")),
            StatusCode::NOT_FOUND,
        ),
        (
            StowageError::ItemNotFound(ItemId::new("x")),
            StatusCode::NOT_FOUND,
        ),
        (
            StowageError::ItemNotAllowed {
                actor: ActorKind::Creature,
                item_type: "weapon".to_string(),
            },
            StatusCode::BAD_REQUEST,
        ),
        (
            StowageError::InvalidCondition("bad key".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            StowageError::IoError("disk".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, status) in cases {
        assert_eq!(ApiError::from(error).status(), status);
    }
}
