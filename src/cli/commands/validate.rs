//! Validate command handler
//!
//! Runs the insert validator offline, so payloads can be checked without a
//! running server or database.

use anyhow::Context;
use std::path::Path;

use crate::config::Config;
use crate::validation::{EntityKind, validate_insert_with};

/// Returns `Ok(false)` when the payload is rejected; the errors are printed.
pub fn cmd_validate(config: &Config, kind: &str, file: &Path) -> anyhow::Result<bool> {
    let kind: EntityKind = kind.parse().map_err(anyhow::Error::msg)?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read payload file: {}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in {}", file.display()))?;

    let defaults = config.entity_defaults()?;

    match validate_insert_with(kind, &raw, &defaults) {
        Ok(entity) => {
            println!("{}", serde_json::to_string_pretty(&entity)?);
            Ok(true)
        }
        Err(errors) => {
            println!("Invalid {kind} payload ({} errors):", errors.len());
            for error in errors.iter() {
                println!("  {:<16} {:?}: {}", error.field, error.kind, error.message);
            }
            Ok(false)
        }
    }
}
