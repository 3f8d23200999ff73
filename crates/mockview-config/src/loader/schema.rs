//! Schema checks for mockview JSON5 config layers.
//!
//! Runs on the raw JSON value before decoding so unknown keys and type
//! mismatches are reported with the layer and dotted path that caused them.

use crate::ConfigError;
use serde_json::{Map, Value};

const STORE_PROVIDERS: &[&str] = &["memory", "file"];

/// Validate one layer (or the merged result) against the schema.
pub(super) fn validate_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(
        map,
        &["$schema", "generation", "store", "listing_route"],
        layer,
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("listing_route") {
        expect_string(value, layer, "listing_route")?;
    }
    if let Some(value) = map.get("generation") {
        validate_generation(value, layer, "generation")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    Ok(())
}

fn validate_generation(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["question_count", "strict_shape", "model"], layer, path)?;
    if let Some(value) = map.get("question_count") {
        expect_u64(value, layer, &join_path(path, "question_count"))?;
    }
    if let Some(value) = map.get("strict_shape") {
        expect_bool(value, layer, &join_path(path, "strict_shape"))?;
    }
    if let Some(value) = map.get("model") {
        let model_path = join_path(path, "model");
        if value.is_null() {
            return Ok(());
        }
        let model = expect_object(value, layer, &model_path)?;
        ensure_allowed_keys(model, &["provider", "name"], layer, &model_path)?;
        for key in ["provider", "name"] {
            if let Some(value) = model.get(key) {
                expect_string(value, layer, &join_path(&model_path, key))?;
            }
        }
    }
    Ok(())
}

fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["provider", "path"], layer, path)?;
    if let Some(value) = map.get("provider") {
        let provider_path = join_path(path, "provider");
        let provider = value
            .as_str()
            .ok_or_else(|| invalid_field(layer, &provider_path, "expected string"))?;
        if !STORE_PROVIDERS.contains(&provider) {
            return Err(invalid_field(
                layer,
                &provider_path,
                &format!("expected one of {}", STORE_PROVIDERS.join(", ")),
            ));
        }
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| invalid_field(layer, path, "expected object"))
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected string")),
    }
}

fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value {
        Value::Bool(_) => Ok(()),
        _ => Err(invalid_field(layer, path, "expected bool")),
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
