//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "xmlconf.toml";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Root of the XML conformance corpus (default: "data/xmlconf")
    pub corpus_dir: String,

    /// Manifest file, relative to `corpus_dir` unless absolute (default: "xmlconf.xml")
    pub manifest: String,

    /// Root of the XML Schema test data (default: "data/xmlschema")
    pub schema_dir: String,

    /// Schema suite manifest inside `schema_dir` (default: "suite.xml")
    pub schema_suite: String,

    /// Expand external entities while loading the manifest (default: true)
    pub expand_external_entities: bool,

    /// Fail on undeclared entity references (default: true)
    pub reject_undeclared_entities: bool,

    /// Entity expansion nesting limit (default: 8)
    pub max_entity_depth: u64,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            corpus_dir: "data/xmlconf".to_string(),
            manifest: "xmlconf.xml".to_string(),
            schema_dir: "data/xmlschema".to_string(),
            schema_suite: "suite.xml".to_string(),
            expand_external_entities: true,
            reject_undeclared_entities: true,
            max_entity_depth: 8,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "corpus_dir": self.corpus_dir,
            "manifest": self.manifest,
            "schema_dir": self.schema_dir,
            "schema_suite": self.schema_suite,
            "parse": {
                "expand_external_entities": self.expand_external_entities,
                "reject_undeclared_entities": self.reject_undeclared_entities,
                "max_entity_depth": self.max_entity_depth
            }
        })
    }
}
