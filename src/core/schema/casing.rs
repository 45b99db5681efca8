use crate::core::errors::DecodeError;
use serde_json::{Map, Value};

/// Compound words the upstream API splits inconsistently, applied after the generic rule
const KEY_EXCEPTIONS: &[(&str, &str)] = &[("sub_account", "subaccount")];

/// Rewrite a camelCase or PascalCase key to lower snake_case
pub fn normalize_key(key: &str) -> String {
    let mut snake = if key.chars().any(|c| c.is_uppercase()) {
        let mut converted = String::with_capacity(key.len() + 4);
        for c in key.chars() {
            if c.is_uppercase() {
                converted.push('_');
                converted.extend(c.to_lowercase());
            } else {
                converted.push(c);
            }
        }
        converted.trim_start_matches('_').to_string()
    } else {
        key.to_string()
    };

    for (split, joined) in KEY_EXCEPTIONS {
        if snake.contains(split) {
            snake = snake.replace(split, joined);
        }
    }
    snake
}

/// Normalize every map key in the tree, descending through maps and lists
pub fn normalize_keys(value: &Value) -> Result<Value, DecodeError> {
    match value {
        Value::Object(map) => {
            let mut normalized = Map::with_capacity(map.len());
            for (key, val) in map {
                let snake = normalize_key(key);
                if normalized.contains_key(&snake) {
                    return Err(DecodeError::DuplicateKey { key: snake });
                }
                normalized.insert(snake, normalize_keys(val)?);
            }
            Ok(Value::Object(normalized))
        }
        Value::Array(items) => items
            .iter()
            .map(normalize_keys)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        scalar => Ok(scalar.clone()),
    }
}
