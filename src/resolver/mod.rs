//! Test resolution
//!
//! Turns one `TEST` element plus its inherited context into a [`TestRecord`]:
//! reads the raw attributes, classifies `ENTITIES`, corrects the base path and
//! finds the single input file the test refers to.

mod base_path;

pub use base_path::{correct_base_path, IBM_XML11_BASE_PATH};

use std::path::PathBuf;
use tracing::debug;
use xmlconf_dom::Element;

use crate::corpus::{CorpusIndex, ExcludeRules};
use crate::record::{normalize_base_path, Entities, TestRecord, PROFILE_SEPARATOR};

/// Errors for test resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("test '{id}': unrecognised ENTITIES value '{value}'")]
    UnknownEntities { id: String, value: String },

    #[error("test directory does not exist: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("test '{id}': no file matching '{uri}' under {}", .dir.display())]
    FileNotFound { id: String, uri: String, dir: PathBuf },

    #[error("test '{id}': '{uri}' matches {} files: {}", .candidates.len(), display_paths(.candidates))]
    AmbiguousFile {
        id: String,
        uri: String,
        candidates: Vec<PathBuf>,
    },

    #[error("resolved file no longer exists: {}", .path.display())]
    Vanished { path: PathBuf },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw `TEST` attributes; absent ones read as empty, except `ENTITIES`.
struct RawTest<'a> {
    id: &'a str,
    test_type: &'a str,
    sections: &'a str,
    entities: Option<&'a str>,
    uri: &'a str,
    namespace: &'a str,
    recommendation: &'a str,
    version: &'a str,
    output: &'a str,
}

impl<'a> RawTest<'a> {
    fn read(element: &'a Element) -> Self {
        let attr = |name: &str| element.attribute(name).unwrap_or_default();
        Self {
            id: attr("ID"),
            test_type: attr("TYPE"),
            sections: attr("SECTIONS"),
            entities: element.attribute("ENTITIES"),
            uri: attr("URI"),
            namespace: attr("NAMESPACE"),
            recommendation: attr("RECOMMENDATION"),
            version: attr("VERSION"),
            output: attr("OUTPUT"),
        }
    }
}

/// Resolves `TEST` elements against an indexed corpus
pub struct TestResolver<'a> {
    index: &'a CorpusIndex,
    exclude: ExcludeRules,
}

impl<'a> TestResolver<'a> {
    /// Create a resolver with the default exclusion rules
    pub fn new(index: &'a CorpusIndex) -> Self {
        Self {
            index,
            exclude: ExcludeRules::default(),
        }
    }

    /// Replace the exclusion rules
    pub fn with_exclude_rules(mut self, exclude: ExcludeRules) -> Self {
        self.exclude = exclude;
        self
    }

    /// Build the record for one `TEST` element.
    ///
    /// `profiles` are the inherited profile names, outermost first, and
    /// `base_path` is the inherited base path with any leading `/` removed.
    pub fn resolve(
        &self,
        element: &Element,
        profiles: &[String],
        base_path: &str,
    ) -> Result<TestRecord, ResolveError> {
        let raw = RawTest::read(element);

        let entities =
            Entities::classify(raw.entities).map_err(|value| ResolveError::UnknownEntities {
                id: raw.id.to_string(),
                value,
            })?;

        let profile = profiles.join(PROFILE_SEPARATOR);
        let declared = normalize_base_path(base_path);
        let base_path = normalize_base_path(&correct_base_path(&declared, &profile, raw.version));
        if base_path != declared {
            debug!(id = raw.id, from = %declared, to = %base_path, "corrected base path");
        }

        let resolved_file = self.find_file(raw.id, raw.uri, &base_path)?;

        Ok(TestRecord {
            id: raw.id.to_string(),
            profile,
            base_path,
            sections: raw.sections.to_string(),
            entities,
            uri: raw.uri.to_string(),
            test_type: raw.test_type.to_string(),
            namespace: raw.namespace.to_string(),
            recommendation: raw.recommendation.to_string(),
            version: raw.version.to_string(),
            output: raw.output.to_string(),
            resolved_file,
        })
    }

    fn find_file(&self, id: &str, uri: &str, base_path: &str) -> Result<PathBuf, ResolveError> {
        let dir = self.index.root().join(base_path);
        if !dir.is_dir() {
            return Err(ResolveError::DirectoryNotFound { path: dir });
        }

        let mut candidates = self.index.candidates(base_path, uri, &self.exclude);
        let file = match candidates.len() {
            0 => {
                return Err(ResolveError::FileNotFound {
                    id: id.to_string(),
                    uri: uri.to_string(),
                    dir,
                })
            }
            1 => candidates.remove(0),
            _ => {
                return Err(ResolveError::AmbiguousFile {
                    id: id.to_string(),
                    uri: uri.to_string(),
                    candidates,
                })
            }
        };

        // The index is a snapshot; the file may be gone by now.
        if !file.is_file() {
            return Err(ResolveError::Vanished { path: file });
        }
        Ok(file)
    }
}
