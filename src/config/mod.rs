//! Configuration
//!
//! Three layers, merged in order:
//! 1. Built-in defaults
//! 2. Config file (`xmlconf.toml` by default)
//! 3. CLI flags
//!
//! The merged value is turned into [`DataPaths`], the explicit set of corpus
//! locations and parse options handed to everything downstream.

mod defaults;
mod effective;
mod merge;
mod paths;

pub use defaults::{BuiltinDefaults, DEFAULT_CONFIG_FILE};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
pub use paths::DataPaths;
