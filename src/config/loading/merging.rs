use toml::{Value, map::Map};

/// Folds imported configs in order, then lays the main config on top.
pub fn merge_toml_configs(imports: Vec<Value>, main: Value) -> Value {
    let base = imports
        .into_iter()
        .fold(Value::Table(Map::new()), overlay_onto);

    overlay_onto(base, main)
}

/// Deep-merges `overlay` onto `base`.
///
/// Tables merge key by key; any other value in `overlay` replaces the one in `base`.
fn overlay_onto(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(mut merged), Value::Table(overlay_table)) => {
            for (key, overlay_value) in overlay_table {
                let value = match merged.remove(&key) {
                    Some(base_value) => overlay_onto(base_value, overlay_value),
                    None => overlay_value,
                };
                merged.insert(key, value);
            }

            Value::Table(merged)
        }
        (_, overlay) => overlay,
    }
}
