//! Corpus locations resolved from the effective configuration.

use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use xmlconf_dom::ParseOptions;

use super::defaults::BuiltinDefaults;
use super::effective::{ConfigError, EffectiveConfig};

/// Validated data locations plus the manifest parse options.
///
/// Built once by the driver and passed by reference.
#[derive(Debug, Clone, Serialize)]
pub struct DataPaths {
    corpus_dir: PathBuf,
    manifest: PathBuf,
    /// `None` when `schema_dir` is configured empty
    schema_dir: Option<PathBuf>,
    schema_suite: String,
    #[serde(skip)]
    parse_options: ParseOptions,
}

impl DataPaths {
    /// Resolve and check the configured paths. The corpus directory, the
    /// manifest and a non-empty schema directory must exist.
    pub fn from_config(config: &EffectiveConfig) -> Result<Self, ConfigError> {
        let defaults = BuiltinDefaults::default();

        let corpus_dir = absolute(config.get_str("corpus_dir").unwrap_or(&defaults.corpus_dir))?;
        if !corpus_dir.is_dir() {
            return Err(ConfigError::MissingDirectory {
                key: "corpus_dir",
                path: corpus_dir,
            });
        }

        // Absolute manifests replace the corpus directory in `join`
        let manifest = corpus_dir.join(config.get_str("manifest").unwrap_or(&defaults.manifest));
        if !manifest.is_file() {
            return Err(ConfigError::MissingFile {
                key: "manifest",
                path: manifest,
            });
        }

        let schema_dir = match config.get_str("schema_dir").unwrap_or(&defaults.schema_dir) {
            "" => None,
            dir => {
                let dir = absolute(dir)?;
                if !dir.is_dir() {
                    return Err(ConfigError::MissingDirectory {
                        key: "schema_dir",
                        path: dir,
                    });
                }
                Some(dir)
            }
        };

        let parse_options = ParseOptions {
            expand_external_entities: config
                .get_bool("parse.expand_external_entities")
                .unwrap_or(defaults.expand_external_entities),
            reject_undeclared_entities: config
                .get_bool("parse.reject_undeclared_entities")
                .unwrap_or(defaults.reject_undeclared_entities),
            max_entity_depth: config
                .get_u64("parse.max_entity_depth")
                .unwrap_or(defaults.max_entity_depth) as usize,
        };

        Ok(Self {
            corpus_dir,
            manifest,
            schema_dir,
            schema_suite: config
                .get_str("schema_suite")
                .unwrap_or(&defaults.schema_suite)
                .to_string(),
            parse_options,
        })
    }

    /// Root directory of the conformance corpus
    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn schema_dir(&self) -> Option<&Path> {
        self.schema_dir.as_deref()
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// The schema suite manifest, checked on demand
    pub fn schema_suite_file(&self) -> Result<PathBuf, ConfigError> {
        let Some(dir) = &self.schema_dir else {
            return Err(ConfigError::ValidationError(
                "schema_dir is not configured".to_string(),
            ));
        };
        let path = dir.join(&self.schema_suite);
        if !path.is_file() {
            return Err(ConfigError::MissingFile {
                key: "schema_suite",
                path,
            });
        }
        Ok(path)
    }
}

/// Anchor a configured path at the working directory when it is relative
fn absolute(path: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir()
        .map_err(|e| ConfigError::IoError(format!("working directory: {}", e)))?;
    Ok(cwd.join(path))
}
