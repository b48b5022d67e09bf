//! Entity declarations and reference splitting.

use std::path::{Path, PathBuf};

use regex_lite::Regex;

use crate::DomError;

/// Replacement content of a general entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValue {
    /// Literal replacement text from the declaration.
    Internal(String),
    /// File the entity points at, already joined to the declaring directory.
    External(PathBuf),
}

/// A general entity declared in a document's internal subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDecl {
    pub name: String,
    pub value: EntityValue,
}

impl EntityDecl {
    pub fn is_external(&self) -> bool {
        matches!(self.value, EntityValue::External(_))
    }
}

const EXTERNAL_DECL: &str = r#"<!ENTITY\s+([^\s%]\S*)\s+(?:SYSTEM|PUBLIC\s+(?:"[^"]*"|'[^']*'))\s+(?:"([^"]*)"|'([^']*)')\s*>"#;
const INTERNAL_DECL: &str = r#"<!ENTITY\s+([^\s%]\S*)\s+(?:"([^"]*)"|'([^']*)')\s*>"#;
const COMMENT: &str = r"(?s)<!--.*?-->";

/// Extract general entity declarations from DOCTYPE content, in declaration
/// order. Parameter entities, unparsed (NDATA) entities and declarations
/// inside comments are ignored.
pub(crate) fn parse_declarations(
    doctype: &str,
    base_dir: Option<&Path>,
) -> Result<Vec<EntityDecl>, DomError> {
    let doctype = Regex::new(COMMENT)?.replace_all(doctype, "");
    let doctype: &str = &doctype;
    let external = Regex::new(EXTERNAL_DECL)?;
    let internal = Regex::new(INTERNAL_DECL)?;

    let mut found: Vec<(usize, EntityDecl)> = Vec::new();
    for caps in external.captures_iter(doctype) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let system = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        let path = match base_dir {
            Some(dir) => dir.join(system),
            None => PathBuf::from(system),
        };
        found.push((
            whole.start(),
            EntityDecl {
                name: name.as_str().to_string(),
                value: EntityValue::External(path),
            },
        ));
    }
    for caps in internal.captures_iter(doctype) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let text = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        found.push((
            whole.start(),
            EntityDecl {
                name: name.as_str().to_string(),
                value: EntityValue::Internal(text.to_string()),
            },
        ));
    }

    found.sort_by_key(|(offset, _)| *offset);
    Ok(found.into_iter().map(|(_, decl)| decl).collect())
}

/// A run of character data, or a reference to a general entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Piece<'a> {
    /// Raw text; may still contain predefined and character references.
    Text(&'a str),
    Reference(&'a str),
}

/// Split raw text at general entity references. Predefined entities
/// (`&lt;` and friends) and character references stay inside text pieces.
pub(crate) fn split_references(raw: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = raw[cursor..].find('&') {
        let amp = cursor + offset;
        let Some(len) = raw[amp + 1..].find(';') else {
            break;
        };
        let name = &raw[amp + 1..amp + 1 + len];
        if is_builtin(name) || !is_name(name) {
            cursor = amp + 1;
            continue;
        }
        if text_start < amp {
            pieces.push(Piece::Text(&raw[text_start..amp]));
        }
        pieces.push(Piece::Reference(name));
        cursor = amp + len + 2;
        text_start = cursor;
    }

    if text_start < raw.len() {
        pieces.push(Piece::Text(&raw[text_start..]));
    }
    pieces
}

fn is_builtin(name: &str) -> bool {
    name.starts_with('#') || matches!(name, "lt" | "gt" | "amp" | "apos" | "quot")
}

fn is_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}
