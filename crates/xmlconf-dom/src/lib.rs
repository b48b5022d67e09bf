//! Minimal XML document tree for conformance manifests.
//!
//! Parses markup with `quick-xml` into an owned tree of [`Node`]s. Entity
//! handling is controlled through [`ParseOptions`]: declared entities can be
//! expanded in place (external ones are read relative to the declaring file)
//! or kept as [`Node::EntityRef`], and undeclared references can either fail
//! the parse or pass through untouched.

mod entity;
mod parser;

pub use entity::{EntityDecl, EntityValue};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Entity handling switches for a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Replace references to declared external entities with the parsed
    /// content of the referenced file. Internal entities are always expanded.
    pub expand_external_entities: bool,

    /// Fail on references to entities that were never declared.
    pub reject_undeclared_entities: bool,

    /// Maximum nesting of entity expansions.
    pub max_entity_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            expand_external_entities: true,
            reject_undeclared_entities: true,
            max_entity_depth: 8,
        }
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// An entity reference that was left unexpanded.
    EntityRef(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// A single attribute, name kept exactly as written (`xml:base` stays prefixed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the named attribute, `None` when absent.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Child elements only; text, comments and other nodes are skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of direct text and CDATA children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) | Node::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A parsed document: the root element plus the entities declared in its
/// internal subset.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Element,
    pub entities: BTreeMap<String, EntityDecl>,
}

impl Document {
    /// Read and parse a file. External entities resolve against its directory.
    pub fn load(path: &Path, options: &ParseOptions) -> Result<Self, DomError> {
        let input = read_source(path)?;
        let base_dir = path.parent();
        parser::parse_document(&input, base_dir, options)
    }

    /// Parse markup held in memory. Without a `base_dir`, external entity
    /// paths are taken relative to the working directory.
    pub fn parse_str(
        input: &str,
        base_dir: Option<&Path>,
        options: &ParseOptions,
    ) -> Result<Self, DomError> {
        parser::parse_document(input, base_dir, options)
    }
}

/// Read a source file, dropping a leading byte order mark.
pub(crate) fn read_source(path: &Path) -> Result<String, DomError> {
    let bytes = fs::read(path).map_err(|source| DomError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Errors raised while building a document tree.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("entity declaration pattern error: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("reference to undeclared entity '{0}'")]
    UndeclaredEntity(String),

    #[error("entity '{0}' references itself")]
    RecursiveEntity(String),

    #[error("expanding entity '{name}' exceeds the nesting limit of {limit}")]
    EntityDepth { name: String, limit: usize },

    #[error("element '{0}' is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    MissingRoot,

    #[error("document has more than one root element ('{first}' and '{second}')")]
    MultipleRoots { first: String, second: String },
}
