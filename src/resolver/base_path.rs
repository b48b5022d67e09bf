//! Base-path corrections for sub-suites whose manifests disagree with the
//! corpus layout.

/// Sub-suites whose entries declare no base path, keyed by the exact
/// accumulated profile string.
const PROFILE_BASE_PATHS: &[(&str, &str)] = &[
    (
        "Richard Tobin's XML 1.0 2nd edition errata test suite 21 Jul 2003",
        "eduni/errata-2e/",
    ),
    (
        "Richard Tobin's XML 1.0 3rd edition errata test suite 1 June 2006",
        "eduni/errata-3e/",
    ),
    (
        "University of Edinburgh tests for XML 1.0 4th edition errata",
        "eduni/errata-4e/",
    ),
    ("Richard Tobin's XML 1.1 test suite 13 Feb 2003", "eduni/xml-1.1/"),
    (
        "Richard Tobin's XML Namespaces 1.0 test suite 14 Feb 2003",
        "eduni/namespaces/1.0/",
    ),
    (
        "Richard Tobin's XML Namespaces 1.1 test suite 14 Feb 2003",
        "eduni/namespaces/1.1/",
    ),
];

/// Base path the IBM groups declared before their XML 1.1 tests moved.
const LEGACY_IBM_BASE_PATH: &str = "ibm/";

/// Where the IBM XML 1.1 tests live now.
pub const IBM_XML11_BASE_PATH: &str = "ibm/xml-1.1";

const IBM_XML11_PROFILES: &[&str] = &[
    "IBM Valid Conformance Tests for XML 1.1 CR October 15, 2002",
    "IBM Invalid Conformance Tests for XML 1.1 CR October 15, 2002",
    "IBM Not-WF Conformance Tests for XML 1.1 CR October 15, 2002",
];

/// Apply the correction rules to a trailing-slash-normalised base path.
/// The first matching rule wins; without a match the input comes back as is.
pub fn correct_base_path(base_path: &str, profile: &str, version: &str) -> String {
    if base_path.is_empty() {
        return PROFILE_BASE_PATHS
            .iter()
            .find(|(name, _)| *name == profile)
            .map(|(_, path)| path.to_string())
            .unwrap_or_default();
    }

    if base_path == LEGACY_IBM_BASE_PATH
        && version == "1.1"
        && IBM_XML11_PROFILES.iter().any(|p| profile.contains(p))
    {
        return IBM_XML11_BASE_PATH.to_string();
    }

    base_path.to_string()
}
