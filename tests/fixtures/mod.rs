//! Test fixtures: throwaway corpora on disk
//!
//! A [`CorpusFixture`] owns a temporary directory laid out like the W3C
//! distribution (`xmlconf/` with the manifest and test files, `xmlschema/`
//! next to it) and hands out the matching [`DataPaths`].

#![allow(dead_code)]

use serde_json::json;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xmlconf_locator::{DataPaths, EffectiveConfig};

/// Placeholder body for test input files
pub const INPUT: &str = "<doc/>\n";

pub struct CorpusFixture {
    dir: TempDir,
    root: PathBuf,
}

impl CorpusFixture {
    pub fn new() -> Self {
        Self::with_dir(TempDir::new().expect("create temp dir"))
    }

    /// A corpus under the working directory, addressed by a relative path
    pub fn in_working_dir() -> Self {
        let mut fixture = Self::with_dir(TempDir::new_in(".").expect("create temp dir"));
        let cwd = env::current_dir().expect("working directory");
        if let Ok(relative) = fixture.dir.path().strip_prefix(&cwd) {
            fixture.root = relative.to_path_buf();
        }
        fixture
    }

    fn with_dir(dir: TempDir) -> Self {
        fs::create_dir_all(dir.path().join("xmlconf")).expect("create corpus dir");
        fs::create_dir_all(dir.path().join("xmlschema")).expect("create schema dir");
        let root = dir.path().to_path_buf();
        Self { dir, root }
    }

    /// Corpus root (`<tmp>/xmlconf`)
    pub fn corpus_dir(&self) -> PathBuf {
        self.root.join("xmlconf")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.corpus_dir().join(relative)
    }

    /// Write a file below the corpus root, creating parent directories
    pub fn file(&self, relative: &str, contents: &str) -> &Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Write test inputs with placeholder content
    pub fn inputs(&self, relatives: &[&str]) -> &Self {
        for relative in relatives {
            self.file(relative, INPUT);
        }
        self
    }

    /// Write the top-level manifest
    pub fn manifest(&self, contents: &str) -> &Self {
        self.file("xmlconf.xml", contents)
    }

    pub fn paths(&self) -> DataPaths {
        self.paths_with(json!({}))
    }

    /// Data paths with extra overrides merged over the fixture locations
    pub fn paths_with(&self, extra: serde_json::Value) -> DataPaths {
        let base = json!({
            "corpus_dir": self.corpus_dir(),
            "schema_dir": self.root.join("xmlschema"),
        });
        let overrides = xmlconf_locator::config::deep_merge(base, extra);
        let config = EffectiveConfig::build(None, Some(overrides)).expect("build config");
        DataPaths::from_config(&config).expect("fixture paths are valid")
    }
}

/// Path relative to `root`, with `/` separators
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .expect("path below root")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
