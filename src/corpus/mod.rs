//! Corpus file index
//!
//! Scans the corpus root once and maps every file name to the relative paths
//! that carry it, so resolving a test is a table lookup instead of a
//! directory walk per test.

mod exclude;

pub use exclude::{ExcludeError, ExcludeRules};

use std::collections::BTreeMap;
use std::env;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Lookup table of every file under a corpus root.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    root: PathBuf,
    /// File name -> paths relative to `root`, in walk order
    by_name: BTreeMap<String, Vec<PathBuf>>,
    file_count: usize,
}

impl CorpusIndex {
    /// Walk `root` and index every regular file below it. A relative root is
    /// anchored at the working directory so candidates come back absolute.
    pub fn build(root: &Path) -> Result<Self, walkdir::Error> {
        let anchored = match env::current_dir() {
            Ok(cwd) if root.is_relative() => cwd.join(root),
            _ => root.to_path_buf(),
        };
        let root = anchored.as_path();
        let mut by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let mut file_count = 0;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let name = entry.file_name().to_string_lossy().to_string();
            by_name.entry(name).or_default().push(relative.to_path_buf());
            file_count += 1;
        }

        debug!(root = %root.display(), files = file_count, "indexed corpus");
        Ok(Self {
            root: root.to_path_buf(),
            by_name,
            file_count,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.file_count
    }

    pub fn is_empty(&self) -> bool {
        self.file_count == 0
    }

    /// Relative paths of every file with this exact name
    pub fn files_named(&self, name: &str) -> &[PathBuf] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Absolute paths of the files below `base_path` matching `uri`.
    ///
    /// A file matches when its name equals the last component of `uri` and
    /// its path below the base directory ends with the components of `uri`.
    /// Candidates rejected by `exclude` are dropped.
    pub fn candidates(&self, base_path: &str, uri: &str, exclude: &ExcludeRules) -> Vec<PathBuf> {
        let wanted = uri_components(uri);
        let Some(file_name) = wanted.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return Vec::new();
        };
        let base = Path::new(base_path);

        self.files_named(&file_name)
            .iter()
            .filter_map(|relative| {
                let below = relative.strip_prefix(base).ok()?;
                if !below.ends_with(&wanted) || exclude.is_excluded(base_path, below) {
                    return None;
                }
                Some(self.root.join(relative))
            })
            .collect()
    }
}

/// Normal components of a declared URI; `.` segments and a leading `/` drop out.
fn uri_components(uri: &str) -> PathBuf {
    Path::new(uri)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}
