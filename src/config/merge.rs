//! Layer merging
//!
//! Later layers win. Tables merge key by key; every other value (including
//! arrays) is replaced wholesale.

use serde_json::{Map, Value};

/// Fold `layer` into `base` in place.
pub fn overlay(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match value {
            Value::Object(nested) => {
                if let Some(Value::Object(existing)) = base.get_mut(&key) {
                    overlay(existing, nested);
                    continue;
                }
                base.insert(key, Value::Object(nested));
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Merge layers in precedence order (first is the base).
///
/// Non-table layers are ignored; a config layer is always a table.
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    let mut merged = Map::new();
    for layer in layers {
        if let Value::Object(map) = layer {
            overlay(&mut merged, map);
        }
    }
    Value::Object(merged)
}
