//! Manifest walker
//!
//! Depth-first traversal of a parsed conformance manifest. `TESTCASES` groups
//! contribute a profile name and may replace the base path for their subtree;
//! every `TEST` leaf is handed to the resolver with the context accumulated on
//! the way down.

use tracing::{debug, info};
use xmlconf_dom::Element;

use crate::record::TestRecord;
use crate::resolver::{ResolveError, TestResolver};

/// Group element carrying inherited metadata
pub const GROUP_TAG: &str = "TESTCASES";

/// Leaf element describing one test
pub const TEST_TAG: &str = "TEST";

const PROFILE_ATTR: &str = "PROFILE";

/// Base path attributes, highest precedence first
const BASE_ATTRS: &[&str] = &["xml:base", "base"];

/// Context inherited by a subtree
#[derive(Debug, Clone, Default)]
struct Inherited {
    profiles: Vec<String>,
    base_path: String,
}

impl Inherited {
    /// Context for the children of a `TESTCASES` group
    fn enter_group(&self, group: &Element) -> Self {
        let mut next = self.clone();
        if let Some(profile) = group.attribute(PROFILE_ATTR) {
            next.profiles.push(profile.to_string());
        }
        if let Some(base) = BASE_ATTRS.iter().find_map(|name| group.attribute(name)) {
            next.base_path = base.trim_start_matches('/').to_string();
        }
        next
    }
}

/// Walks a manifest tree and resolves every test in document order
pub struct ManifestWalker<'r, 'a> {
    resolver: &'r TestResolver<'a>,
}

impl<'r, 'a> ManifestWalker<'r, 'a> {
    pub fn new(resolver: &'r TestResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Resolve every `TEST` below `root`. The first failure aborts the walk.
    pub fn walk(&self, root: &Element) -> Result<Vec<TestRecord>, ResolveError> {
        let mut records = Vec::new();
        self.visit(root, &Inherited::default(), &mut records)?;
        info!(tests = records.len(), "manifest walk complete");
        Ok(records)
    }

    fn visit(
        &self,
        element: &Element,
        inherited: &Inherited,
        records: &mut Vec<TestRecord>,
    ) -> Result<(), ResolveError> {
        match element.name.as_str() {
            TEST_TAG => {
                let record =
                    self.resolver
                        .resolve(element, &inherited.profiles, &inherited.base_path)?;
                debug!(id = record.id(), file = %record.resolved_file().display(), "resolved test");
                records.push(record);
            }
            GROUP_TAG => {
                let scoped = inherited.enter_group(element);
                debug!(
                    profile = element.attribute(PROFILE_ATTR).unwrap_or_default(),
                    base_path = %scoped.base_path,
                    "entering group"
                );
                for child in element.child_elements() {
                    self.visit(child, &scoped, records)?;
                }
            }
            _ => {
                for child in element.child_elements() {
                    self.visit(child, inherited, records)?;
                }
            }
        }
        Ok(())
    }
}
