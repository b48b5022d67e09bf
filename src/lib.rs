//! xmlconf-locator
//!
//! Walks the W3C XML conformance-test manifest (`xmlconf.xml`) and resolves
//! every `TEST` entry to the input file it names inside the corpus, carrying
//! the profile and base path inherited from the enclosing `TESTCASES` groups.

pub mod config;
pub mod corpus;
pub mod error;
pub mod manifest;
pub mod record;
pub mod resolver;

pub use config::{DataPaths, EffectiveConfig};
pub use corpus::{CorpusIndex, ExcludeRules};
pub use error::{Error, Result};
pub use manifest::ManifestWalker;
pub use record::{Entities, TestRecord};
pub use resolver::{ResolveError, TestResolver};

use tracing::info;
use xmlconf_dom::Document;

/// Load the configured manifest, index the corpus and resolve every test.
pub fn load_tests(paths: &DataPaths) -> Result<Vec<TestRecord>> {
    let document = Document::load(paths.manifest(), paths.parse_options())?;
    let index = CorpusIndex::build(paths.corpus_dir())?;
    info!(
        manifest = %paths.manifest().display(),
        files = index.len(),
        "loaded manifest"
    );

    let resolver = TestResolver::new(&index).with_exclude_rules(ExcludeRules::new()?);
    let records = ManifestWalker::new(&resolver).walk(&document.root)?;
    Ok(records)
}
