//! Resolved conformance test records.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which external entities a processor must read to judge a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entities {
    /// No `ENTITIES` attribute on the test.
    None,
    /// `ENTITIES="none"` (or an empty value).
    Empty,
    Both,
    General,
    Parameter,
}

impl Entities {
    /// Classify a raw `ENTITIES` attribute. `Err` carries the unrecognised value.
    pub fn classify(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None => Ok(Entities::None),
            Some("none") | Some("") => Ok(Entities::Empty),
            Some("both") => Ok(Entities::Both),
            Some("general") => Ok(Entities::General),
            Some("parameter") => Ok(Entities::Parameter),
            Some(other) => Err(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Entities::None => "",
            Entities::Empty => "none",
            Entities::Both => "both",
            Entities::General => "general",
            Entities::Parameter => "parameter",
        }
    }
}

/// Ensure a non-empty base path ends with `/`. Leading slashes are left alone.
pub fn normalize_base_path(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Profile names mapped to the short prefixes used for generated test names.
const SUITE_PREFIXES: &[(&str, &str)] = &[
    ("James Clark XMLTEST cases, 18-Nov-1998", "jclark"),
    ("Fuji Xerox Japanese Text Tests", "xjapan"),
    ("Sun Microsystems XML Tests", "sun"),
    ("OASIS/NIST TESTS, 1-Nov-1998", "nist"),
    ("IBM XML Tests", "ibm"),
    ("IBM XML Conformance Test Suite - invalid tests", "ibminv"),
    ("IBM XML Conformance Test Suite - not-wf tests", "ibmnotwf"),
    ("IBM XML Conformance Test Suite - valid tests", "ibmval"),
    ("IBM Invalid Conformance Tests for XML 1.1 CR October 15, 2002", "ibm11"),
    ("IBM XML Conformance Test Suite", "ibmconf"),
    ("IBM Not-WF Conformance Tests for XML 1.1 CR October 15, 2002", "ibmnw11"),
    ("IBM Valid Conformance Tests for XML 1.1 CR October 15, 2002", "ibmval11"),
    (
        "Richard Tobin's XML 1.0 2nd edition errata test suite 21 Jul 2003",
        "edunierr",
    ),
    ("Richard Tobin's XML 1.1 test suite 13 Feb 2003", "eduni11"),
    (
        "Richard Tobin's XML Namespaces 1.0 test suite 14 Feb 2003",
        "edunins10",
    ),
    (
        "Richard Tobin's XML Namespaces 1.1 test suite 14 Feb 2003",
        "edunins11",
    ),
];

/// Separator between accumulated profile names
pub const PROFILE_SEPARATOR: &str = ", ";

/// Per-production IBM groups share one prefix.
const IBM_PRODUCTION_PROFILE: &str = "IBM XML Conformance Test Suite - Production ";

/// One conformance test, fully resolved to an input file on disk.
///
/// Only the resolver builds these, so `resolved_file` always names a file that
/// existed when the record was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub(crate) id: String,
    pub(crate) profile: String,
    pub(crate) base_path: String,
    pub(crate) sections: String,
    pub(crate) entities: Entities,
    pub(crate) uri: String,
    pub(crate) test_type: String,
    pub(crate) namespace: String,
    pub(crate) recommendation: String,
    pub(crate) version: String,
    pub(crate) output: String,
    pub(crate) resolved_file: PathBuf,
}

impl TestRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Every inherited profile, outermost first, joined with `", "`.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Directory relative to the corpus root, with a trailing `/` unless empty.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn sections(&self) -> &str {
        &self.sections
    }

    pub fn entities(&self) -> Entities {
        self.entities
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The `TYPE` tag (`valid`, `invalid`, `not-wf`, `error`, ...).
    pub fn test_type(&self) -> &str {
        &self.test_type
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Relative path of the expected canonical output, empty if none.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn resolved_file(&self) -> &Path {
        &self.resolved_file
    }

    /// Namespace processing applies unless the test opts out with `NAMESPACE="no"`.
    pub fn namespaces_enabled(&self) -> bool {
        self.namespace != "no"
    }

    /// Short prefix for the nearest named sub-suite.
    pub fn suite_prefix(&self) -> Option<&'static str> {
        SUITE_PREFIXES
            .iter()
            .find(|(profile, _)| self.nearest_profile_is(profile))
            .map(|(_, prefix)| *prefix)
            .or_else(|| {
                let nearest = self.profile.rsplit(PROFILE_SEPARATOR).next().unwrap_or_default();
                nearest
                    .starts_with(IBM_PRODUCTION_PROFILE)
                    .then_some("ibmprod")
            })
    }

    /// Whether `name` is the innermost profile. Names may contain `", "`
    /// themselves, so the match is anchored at a separator, not split on it.
    fn nearest_profile_is(&self, name: &str) -> bool {
        match self.profile.strip_suffix(name) {
            Some(rest) => rest.is_empty() || rest.ends_with(PROFILE_SEPARATOR),
            None => false,
        }
    }

    /// The id reduced to lowercase letters, digits and single underscores.
    pub fn snake_case_id(&self) -> String {
        snake_case(&self.id)
    }

    /// `<suite prefix>_<snake case id>`, e.g. `jclark_valid_sa_001`.
    pub fn test_name(&self) -> String {
        format!(
            "{}_{}",
            self.suite_prefix().unwrap_or("unknown"),
            self.snake_case_id()
        )
    }
}

fn snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut was_underscore = false;
    for (i, c) in s.chars().enumerate() {
        if i == 0 && !c.is_ascii_alphabetic() {
            result.push_str("x_");
            was_underscore = true;
        }
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            was_underscore = false;
        } else if !was_underscore {
            result.push('_');
            was_underscore = true;
        }
    }
    result
}
