//! Configuration merge logic
//!
//! - Objects: deep-merge by key
//! - Arrays: replace (last wins)
//! - Scalars: override (last wins)

use serde_json::Value;

/// Deep merge `overlay` onto `base`. Null in the overlay overrides too.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge layers in order; the last layer has the highest precedence
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let result = deep_merge(
            json!({"corpus_dir": "data/xmlconf"}),
            json!({"corpus_dir": "/srv/xmlconf"}),
        );
        assert_eq!(result["corpus_dir"], "/srv/xmlconf");
    }

    #[test]
    fn test_nested_table_merges_by_key() {
        let base = json!({
            "parse": {
                "expand_external_entities": true,
                "max_entity_depth": 8
            }
        });
        let overlay = json!({"parse": {"max_entity_depth": 4}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["parse"]["max_entity_depth"], 4);
        assert_eq!(result["parse"]["expand_external_entities"], true);
    }

    #[test]
    fn test_array_replaced() {
        let result = deep_merge(json!({"skip": ["a", "b", "c"]}), json!({"skip": ["x"]}));
        assert_eq!(result["skip"], json!(["x"]));
    }

    #[test]
    fn test_null_overrides() {
        let result = deep_merge(json!({"schema_dir": "data/xmlschema"}), json!({"schema_dir": null}));
        assert!(result["schema_dir"].is_null());
    }

    #[test]
    fn test_merge_layers_precedence() {
        let builtin = json!({"corpus_dir": "a", "manifest": "xmlconf.xml"});
        let file = json!({"corpus_dir": "b", "manifest": "other.xml"});
        let cli = json!({"corpus_dir": "c"});

        let result = merge_layers(vec![builtin, file, cli]);

        assert_eq!(result["corpus_dir"], "c");
        assert_eq!(result["manifest"], "other.xml");
    }
}
