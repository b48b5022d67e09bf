//! Exclusion rules for resolution candidates
//!
//! Some sub-suites keep expected-output fixtures next to their inputs under
//! the same file names. Rules are keyed by base-path prefix and matched
//! against the candidate path relative to the base directory.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Default rules: (base path prefix, patterns)
const DEFAULT_EXCLUDES: &[(&str, &[&str])] = &[("eduni", &["**/out/**"])];

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum ExcludeError {
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
}

#[derive(Debug)]
struct PrefixRule {
    prefix: String,
    patterns: Vec<String>,
    glob_set: GlobSet,
}

/// Exclusion rules for filtering candidate files
#[derive(Debug)]
pub struct ExcludeRules {
    rules: Vec<PrefixRule>,
}

impl Default for ExcludeRules {
    fn default() -> Self {
        Self::new().expect("default exclude patterns are valid globs")
    }
}

impl ExcludeRules {
    /// Create exclusion rules with the defaults
    pub fn new() -> Result<Self, ExcludeError> {
        let mut rules = Self { rules: Vec::new() };
        for (prefix, patterns) in DEFAULT_EXCLUDES {
            rules = rules.with_patterns(prefix, patterns)?;
        }
        Ok(rules)
    }

    /// Rules that exclude nothing
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add patterns for base paths starting with `prefix`
    pub fn with_patterns(mut self, prefix: &str, patterns: &[&str]) -> Result<Self, ExcludeError> {
        let mut all: Vec<String> = self
            .rules
            .iter()
            .find(|rule| rule.prefix == prefix)
            .map(|rule| rule.patterns.clone())
            .unwrap_or_default();
        all.extend(patterns.iter().filter(|p| !p.is_empty()).map(|p| p.to_string()));

        let mut builder = GlobSetBuilder::new();
        for pattern in &all {
            builder.add(Glob::new(pattern)?);
        }
        let rule = PrefixRule {
            prefix: prefix.to_string(),
            patterns: all,
            glob_set: builder.build()?,
        };

        self.rules.retain(|existing| existing.prefix != prefix);
        self.rules.push(rule);
        Ok(self)
    }

    /// Check if a candidate should be dropped. `relative` is the candidate's
    /// path below the base directory.
    pub fn is_excluded(&self, base_path: &str, relative: &Path) -> bool {
        let path_str = relative.to_string_lossy();
        self.rules
            .iter()
            .filter(|rule| base_path.starts_with(&rule.prefix))
            .any(|rule| rule.glob_set.is_match(path_str.as_ref()))
    }
}
