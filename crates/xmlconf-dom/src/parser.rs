//! Tree building on top of the quick-xml event reader.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::entity::{self, EntityDecl, EntityValue, Piece};
use crate::{read_source, Attribute, Document, DomError, Element, Node, ParseOptions};

pub(crate) fn parse_document(
    input: &str,
    base_dir: Option<&Path>,
    options: &ParseOptions,
) -> Result<Document, DomError> {
    let mut builder = TreeBuilder {
        options,
        entities: BTreeMap::new(),
        expanding: Vec::new(),
    };
    let nodes = builder.parse_fragment(input, base_dir, true)?;

    let mut root: Option<Element> = None;
    for node in nodes {
        if let Node::Element(element) = node {
            if let Some(first) = &root {
                return Err(DomError::MultipleRoots {
                    first: first.name.clone(),
                    second: element.name,
                });
            }
            root = Some(element);
        }
    }

    Ok(Document {
        root: root.ok_or(DomError::MissingRoot)?,
        entities: builder.entities,
    })
}

struct TreeBuilder<'a> {
    options: &'a ParseOptions,
    entities: BTreeMap<String, EntityDecl>,
    /// Entities currently being expanded, outermost first.
    expanding: Vec<String>,
}

impl TreeBuilder<'_> {
    /// Parse a run of markup into top-level nodes. Fragments may hold any
    /// number of top-level elements; the document check happens in the caller.
    fn parse_fragment(
        &mut self,
        input: &str,
        base_dir: Option<&Path>,
        read_doctype: bool,
    ) -> Result<Vec<Node>, DomError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut top: Vec<Node> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => open.push(open_element(&start)?),
                Event::Empty(start) => {
                    let element = open_element(&start)?;
                    attach(&mut open, &mut top, Node::Element(element));
                }
                Event::End(_) => {
                    if let Some(element) = open.pop() {
                        attach(&mut open, &mut top, Node::Element(element));
                    }
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text).into_owned();
                    for node in self.expand_text(&raw)? {
                        attach(&mut open, &mut top, node);
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    attach(&mut open, &mut top, Node::CData(text));
                }
                Event::Comment(comment) => {
                    let text = String::from_utf8_lossy(&comment).into_owned();
                    attach(&mut open, &mut top, Node::Comment(text));
                }
                Event::PI(pi) => {
                    let text = String::from_utf8_lossy(&pi).into_owned();
                    attach(&mut open, &mut top, Node::ProcessingInstruction(text));
                }
                Event::DocType(doctype) if read_doctype => {
                    let raw = String::from_utf8_lossy(&doctype).into_owned();
                    for decl in entity::parse_declarations(&raw, base_dir)? {
                        // The first declaration of a name is binding.
                        self.entities.entry(decl.name.clone()).or_insert(decl);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(element) = open.last() {
            return Err(DomError::Unclosed(element.name.clone()));
        }
        Ok(top)
    }

    fn expand_text(&mut self, raw: &str) -> Result<Vec<Node>, DomError> {
        let mut nodes = Vec::new();
        for piece in entity::split_references(raw) {
            match piece {
                Piece::Text(text) => {
                    let text = quick_xml::escape::unescape(text)?;
                    if !text.is_empty() {
                        nodes.push(Node::Text(text.into_owned()));
                    }
                }
                Piece::Reference(name) => nodes.extend(self.expand_reference(name)?),
            }
        }
        Ok(nodes)
    }

    fn expand_reference(&mut self, name: &str) -> Result<Vec<Node>, DomError> {
        let Some(decl) = self.entities.get(name).cloned() else {
            if self.options.reject_undeclared_entities {
                return Err(DomError::UndeclaredEntity(name.to_string()));
            }
            debug!(entity = name, "keeping undeclared entity reference");
            return Ok(vec![Node::EntityRef(name.to_string())]);
        };

        if decl.is_external() && !self.options.expand_external_entities {
            return Ok(vec![Node::EntityRef(name.to_string())]);
        }
        if self.expanding.iter().any(|active| active == name) {
            return Err(DomError::RecursiveEntity(name.to_string()));
        }
        if self.expanding.len() >= self.options.max_entity_depth {
            return Err(DomError::EntityDepth {
                name: name.to_string(),
                limit: self.options.max_entity_depth,
            });
        }

        self.expanding.push(name.to_string());
        let expanded = match &decl.value {
            EntityValue::Internal(text) => self.parse_fragment(text, None, false),
            EntityValue::External(path) => {
                debug!(entity = name, path = %path.display(), "expanding external entity");
                read_source(path).and_then(|content| {
                    self.parse_fragment(&content, path.parent(), false)
                })
            }
        };
        self.expanding.pop();
        expanded
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, DomError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        attributes.push(Attribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(open: &mut [Element], top: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}
