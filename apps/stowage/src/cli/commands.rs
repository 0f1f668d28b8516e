//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::ServerConfig;
use std::path::{Path, PathBuf};
use stowage_core::{
    ActiveState, ActorKind, CharacterId, CharacterRecord, ConditionKey, Item, ItemId, Mark, Roster,
    Rules, SheetView, StowageError, SyncOutcome, acceptance, indicator,
    primitives::MAX_INDICATOR_LEVELS,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for record import (50 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StowageError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StowageError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StowageError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize `path` and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StowageError> {
    let canonical = path.canonicalize().map_err(|e| {
        StowageError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StowageError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// ROSTER LOADING
// =============================================================================

/// Open the roster for a storage backend.
pub fn open_roster(db_path: &Path, backend: &str, rules: Rules) -> Result<Roster, StowageError> {
    match backend {
        "redb" => Roster::with_redb(db_path, rules),
        "memory" => Ok(Roster::with_rules(rules)),
        other => Err(StowageError::IoError(format!(
            "Unknown backend '{}' (expected 'redb' or 'memory')",
            other
        ))),
    }
}

/// Parse an import file: one character record or an array of them.
pub fn parse_records(text: &str) -> Result<Vec<CharacterRecord>, StowageError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| StowageError::DeserializationError(format!("Invalid JSON: {}", e)))?;

    let values = match value {
        serde_json::Value::Array(values) => values,
        single => vec![single],
    };

    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|e| {
                StowageError::DeserializationError(format!("Invalid character record: {}", e))
            })
        })
        .collect()
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    roster: Roster,
    server: &ServerConfig,
    backend: &str,
    db_path: &Path,
) -> Result<(), StowageError> {
    println!("Stowage Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", server.host);
    println!("  Port:     {}", server.port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  GET  /characters                               - List characters");
    println!("  PUT  /characters/{{id}}                          - Store a character");
    println!("  GET  /characters/{{id}}/sheet                    - Prepare a sheet");
    println!("  POST /characters/{{id}}/conditions/{{key}}/toggle - Toggle a condition");
    println!("  POST /characters/{{id}}/items/{{item}}/active     - Change item state");
    println!("  POST /evaluate                                 - Evaluate without storing");
    println!("  GET  /health                                   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(roster, server).await
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import character records and refresh each imported sheet.
pub fn cmd_import(roster: &mut Roster, file: &Path, json_mode: bool) -> Result<(), StowageError> {
    let file = validate_file_path(file)?;
    validate_file_size(&file, MAX_IMPORT_FILE_SIZE)?;

    let text = std::fs::read_to_string(&file)
        .map_err(|e| StowageError::IoError(format!("Read file: {}", e)))?;
    let records = parse_records(&text)?;

    let mut imported = Vec::with_capacity(records.len());
    for record in records {
        let character = record.into_character()?;
        let id = character.id.clone();
        roster.put(character)?;
        let refresh = roster.refresh(&id)?;
        tracing::info!(character = %id, encumbered = refresh.view.is_encumbered(), "Imported");
        imported.push(refresh.view);
    }

    if json_mode {
        let output = serde_json::json!({
            "imported": imported.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
            "count": imported.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Imported {} character(s) from {:?}", imported.len(), file);
    for view in &imported {
        println!(
            "  {} ({}) - {} carried{}",
            view.id,
            view.name,
            view.total_weight,
            if view.is_encumbered() {
                ", encumbered"
            } else {
                ""
            }
        );
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List stored characters.
pub fn cmd_list(roster: &Roster, json_mode: bool) -> Result<(), StowageError> {
    let mut characters = Vec::new();
    for id in roster.ids()? {
        characters.push(roster.get(&id)?);
    }

    if json_mode {
        let output: Vec<_> = characters
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "name": c.name,
                    "kind": c.kind,
                    "item_count": c.items.len(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    if characters.is_empty() {
        println!("No characters stored.");
        return Ok(());
    }

    println!("Characters");
    println!("==========");
    for c in &characters {
        println!(
            "{:<20} {:<24} {:<10} {} items",
            c.id.as_str(),
            c.name,
            c.kind.as_str(),
            c.items.len()
        );
    }
    Ok(())
}

// =============================================================================
// SHEET COMMAND
// =============================================================================

/// Prepare a character sheet, syncing the encumbered condition.
pub fn cmd_sheet(roster: &mut Roster, id: &str, json_mode: bool) -> Result<(), StowageError> {
    let refresh = roster.refresh(&CharacterId::new(id))?;

    if let Some(outcome) = refresh.sync.filter(|o| o.mutated()) {
        tracing::info!(character = %id, outcome = ?outcome, "Encumbered condition updated");
    }

    if json_mode {
        let output = serde_json::json!({
            "sheet": refresh.view,
            "sync": refresh.sync,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    print_sheet(&refresh.view, refresh.sync);
    Ok(())
}

fn print_sheet(view: &SheetView, sync: Option<SyncOutcome>) {
    println!("{} [{}]", view.name, view.kind);
    println!("{}", "=".repeat(view.name.len() + view.kind.as_str().len() + 3));

    let named = |label: &str, items: &[Item]| {
        if !items.is_empty() {
            let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
            println!("{:<18}{}", label, names.join(", "));
        }
    };
    named("Talents:", &view.talents);
    named("Agenda:", &view.agendas);
    named("Specialty:", &view.specialities);
    named("Critical injuries:", &view.critical_injuries);

    for section in &view.inventory {
        if section.items.is_empty() {
            continue;
        }
        println!();
        println!("{}", section.category.key().to_uppercase());
        for entry in &section.items {
            let state = match entry.item.active {
                ActiveState::Active => "active",
                ActiveState::Inactive => "",
                ActiveState::Locked => "stowed",
            };
            println!(
                "  {:<28} {:>6}  {}",
                entry.item.name, entry.total_weight, state
            );
        }
    }

    println!();
    println!("Total weight: {}", view.total_weight);
    if let Some(enc) = &view.encumbrance {
        println!(
            "Load:         {} / {} ({}%, threshold {}%){}",
            enc.carried,
            enc.capacity,
            enc.percent(),
            enc.threshold_percent,
            if enc.encumbered { " ENCUMBERED" } else { "" }
        );
    }

    if !view.indicators.is_empty() {
        println!();
        for ind in &view.indicators {
            println!("{:<18}{}", ind.stat, render_marks(&ind.marks));
        }
    }

    if !view.conditions.is_empty() {
        let keys: Vec<&str> = view.conditions.iter().map(ConditionKey::as_str).collect();
        println!();
        println!("Conditions: {}", keys.join(", "));
    }

    if let Some(outcome) = sync.filter(|o| o.mutated()) {
        println!("(encumbered condition {:?})", outcome);
    }
}

// =============================================================================
// CONDITION AND LOCKER COMMANDS
// =============================================================================

/// Toggle a condition on a character.
pub fn cmd_toggle(
    roster: &mut Roster,
    id: &str,
    condition: &str,
    json_mode: bool,
) -> Result<(), StowageError> {
    let applied =
        roster.toggle_condition(&CharacterId::new(id), &ConditionKey::new(condition))?;

    if json_mode {
        let output = serde_json::json!({
            "id": id,
            "condition": condition,
            "applied": applied,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else if applied {
        println!("{}: '{}' applied", id, condition);
    } else {
        println!("{}: '{}' removed", id, condition);
    }
    Ok(())
}

/// Change the active state of an item.
pub fn cmd_item_state(
    roster: &mut Roster,
    id: &str,
    item: &str,
    state: ActiveState,
    json_mode: bool,
) -> Result<(), StowageError> {
    let updated = roster.set_item_active(&CharacterId::new(id), &ItemId::new(item), state)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&updated).unwrap_or_default()
        );
    } else {
        println!("{}: '{}' is now {:?}", id, updated.name, updated.active);
    }
    Ok(())
}

// =============================================================================
// INDICATOR AND CHECK COMMANDS
// =============================================================================

/// Draw marks as filled and empty circles.
#[must_use]
pub fn render_marks(marks: &[Mark]) -> String {
    marks
        .iter()
        .map(|m| if m.is_filled() { '●' } else { '○' })
        .collect()
}

/// Draw a level indicator. `max` is capped at [`MAX_INDICATOR_LEVELS`] with a warning.
pub fn cmd_indicator(level: u32, max: u32, json_mode: bool) -> Result<(), StowageError> {
    let max = indicator_size(max);
    let marks = indicator(level, max);

    if json_mode {
        let output = serde_json::json!({
            "level": level,
            "max": max,
            "marks": marks,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("{}", render_marks(&marks));
    }
    Ok(())
}

/// Clamp a requested indicator size to [`MAX_INDICATOR_LEVELS`].
fn indicator_size(requested: u32) -> u32 {
    if requested > MAX_INDICATOR_LEVELS {
        tracing::warn!(
            requested,
            max = MAX_INDICATOR_LEVELS,
            "Indicator size capped"
        );
        MAX_INDICATOR_LEVELS
    } else {
        requested
    }
}

/// Check whether an actor kind may own an item type.
pub fn cmd_check(actor_kind: &str, item_type: &str, json_mode: bool) -> Result<(), StowageError> {
    let kind: ActorKind = actor_kind.parse()?;
    let verdict = acceptance::check_item(kind, item_type);

    if json_mode {
        let output = serde_json::json!({
            "actor_kind": kind,
            "item_type": item_type,
            "allowed": verdict.is_ok(),
            "allowed_types": acceptance::allowed_item_types(kind),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    match verdict {
        Ok(()) => println!("{} may own '{}'", kind, item_type),
        Err(e) => println!("Refused: {}", e),
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
