//! Crate-level error type for drivers.

use crate::config::ConfigError;
use crate::corpus::ExcludeError;
use crate::resolver::ResolveError;
use xmlconf_dom::DomError;

/// Any failure between reading the configuration and the last resolved test
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("manifest: {0}")]
    Dom(#[from] DomError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to index corpus: {0}")]
    Corpus(#[from] walkdir::Error),

    #[error(transparent)]
    Exclude(#[from] ExcludeError),
}

pub type Result<T> = std::result::Result<T, Error>;
