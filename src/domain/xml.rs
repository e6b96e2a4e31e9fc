//! XML source tree for record imports
//!
//! Import batches arrive as XML documents where every record is an element
//! whose fields are child elements. The tree is stored as an arena so nodes
//! can walk to their parents when a mapping reads from an enclosing record.

use crate::domain::errors::TransformError;
use crate::domain::result::TransformResult;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    text: Option<String>,
}

/// Parsed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<NodeData>,
}

/// Borrowed handle to one element of an [`XmlDocument`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    doc: &'a XmlDocument,
    index: usize,
}

impl XmlDocument {
    /// Parse an XML document
    ///
    /// Element text follows the usual ElementTree convention: an element's
    /// text is the character data before its first child element, and `None`
    /// when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::XmlParse`] for malformed input, unknown
    /// entities, a missing root element or more than one root element.
    pub fn parse(input: &str) -> TransformResult<Self> {
        let mut reader = Reader::from_str(input);
        let mut nodes: Vec<NodeData> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    let index = push_node(&mut nodes, &stack, name)?;
                    stack.push(index);
                }
                Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    push_node(&mut nodes, &stack, name)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(text) => {
                    append_text(&mut nodes, &stack, &String::from_utf8_lossy(&text));
                }
                Event::CData(data) => {
                    append_text(&mut nodes, &stack, &String::from_utf8_lossy(&data));
                }
                Event::GeneralRef(reference) => {
                    let resolved = match reference.resolve_char_ref().map_err(xml_error)? {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = String::from_utf8_lossy(&reference).into_owned();
                            resolve_predefined_entity(&name)
                                .ok_or_else(|| {
                                    TransformError::XmlParse(format!("unknown entity '&{name};'"))
                                })?
                                .to_string()
                        }
                    };
                    append_text(&mut nodes, &stack, &resolved);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(TransformError::XmlParse(
                "unexpected end of document".to_string(),
            ));
        }
        if nodes.is_empty() {
            return Err(TransformError::XmlParse("document has no root element".to_string()));
        }

        Ok(Self { nodes })
    }

    /// The document element
    pub fn root(&self) -> Node<'_> {
        Node {
            doc: self,
            index: 0,
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> TransformError {
    TransformError::XmlParse(err.to_string())
}

fn push_node(nodes: &mut Vec<NodeData>, stack: &[usize], name: String) -> TransformResult<usize> {
    let parent = stack.last().copied();
    if parent.is_none() && !nodes.is_empty() {
        return Err(TransformError::XmlParse(format!(
            "unexpected second root element <{name}>"
        )));
    }

    let index = nodes.len();
    nodes.push(NodeData {
        name,
        parent,
        children: Vec::new(),
        text: None,
    });
    if let Some(parent) = parent {
        nodes[parent].children.push(index);
    }
    Ok(index)
}

fn append_text(nodes: &mut [NodeData], stack: &[usize], text: &str) {
    // Only leading text belongs to the element; tail text after children is ignored.
    if let Some(&current) = stack.last() {
        let node = &mut nodes[current];
        if node.children.is_empty() {
            node.text.get_or_insert_with(String::new).push_str(text);
        }
    }
}

impl<'a> Node<'a> {
    /// Element local name
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Leading text of the element
    pub fn text(&self) -> Option<&'a str> {
        self.data().text.as_deref()
    }

    /// Parent element, `None` for the document element
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|index| Node {
            doc: self.doc,
            index,
        })
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        doc.nodes[self.index]
            .children
            .iter()
            .map(move |&index| Node { doc, index })
    }

    /// First element matching a `/`-separated path of child names
    pub fn find(&self, path: &str) -> Option<Node<'a>> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(*self, |node, segment| {
                node.children().find(|child| child.name() == segment)
            })
    }

    /// All descendant elements (excluding self) with the given name, in document order
    pub fn descendants_named(&self, name: &str) -> Vec<Node<'a>> {
        let mut found = Vec::new();
        let mut pending: Vec<Node<'a>> = self.children().collect();
        pending.reverse();
        while let Some(node) = pending.pop() {
            if node.name() == name {
                found.push(node);
            }
            let mut children: Vec<Node<'a>> = node.children().collect();
            children.reverse();
            pending.extend(children);
        }
        found
    }

    /// Path from this node up to `root`, nearest first
    ///
    /// Index 0 is the node itself and the last element is `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NotDescendant`] if `root` is not this node or
    /// one of its ancestors.
    pub fn ancestry_within(&self, root: Node<'a>) -> TransformResult<Vec<Node<'a>>> {
        let mut chain = vec![*self];
        let mut current = *self;
        while current != root {
            current = current.parent().ok_or(TransformError::NotDescendant)?;
            chain.push(current);
        }
        Ok(chain)
    }

    fn data(&self) -> &'a NodeData {
        let doc = self.doc;
        &doc.nodes[self.index]
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl Eq for Node<'_> {}
