//! Ordered, attributed XML element tree.
//!
//! Documents are built through explicit constructor calls rather than
//! parsed literals: an element has a local name, an optional namespace URI,
//! attributes as ordered key/value pairs and children as an ordered sequence
//! of element-or-text nodes. Parsing resolves namespace prefixes to URIs and
//! drops the prefixes; serialization emits default-namespace declarations
//! exactly where an element's namespace differs from the inherited one.
//!
//! On a built tree, `namespace: None` means "inherit the enclosing default
//! namespace when serialized", which keeps request builders as compact as
//! the inline literals they replace. Parsed trees always carry the resolved
//! URI when one is in scope.

use std::fmt;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Tree model
// ---------------------------------------------------------------------------

/// A single attribute. Order among siblings is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
}

/// A child node: element or character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element: local name, optional namespace URI, ordered attributes
/// and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an element with no namespace of its own (inherits the
    /// enclosing default namespace when serialized).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element qualified by the given namespace URI.
    pub fn in_namespace(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::new(name)
        }
    }

    // -- Builder methods ----------------------------------------------------

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push_child(child);
        self
    }

    /// Set an attribute, replacing an existing one with the same name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(XmlAttribute { name, value });
        }
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    // -- Accessors ----------------------------------------------------------

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    /// Concatenated direct text content of this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlNode::Text(text) = child {
                out.push_str(text);
            }
        }
        out
    }

    /// Direct element children, in order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct element child, if any.
    pub fn first_child_element(&self) -> Option<&XmlElement> {
        self.child_elements().next()
    }

    // -- Descendant search --------------------------------------------------

    /// Lazy depth-first iterator over all element descendants, in document
    /// order. The element itself is not included. Finite and restartable:
    /// calling this again yields a fresh traversal.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&XmlElement> = self.child_elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Descendants filtered by local name and, when given, namespace URI.
    /// `namespace: None` matches elements in any namespace.
    pub fn descendants_named<'a>(
        &'a self,
        local: &'a str,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |el| {
            el.name == local
                && namespace.map_or(true, |ns| el.namespace.as_deref() == Some(ns))
        })
    }

    /// First descendant with the given local name and namespace.
    pub fn find_descendant<'a>(
        &'a self,
        local: &'a str,
        namespace: Option<&'a str>,
    ) -> Option<&'a XmlElement> {
        self.descendants_named(local, namespace).next()
    }

    /// Text content of the first descendant with the given local name, in
    /// any namespace. A missing field yields `None`, never an error.
    pub fn descendant_text(&self, local: &str) -> Option<String> {
        self.find_descendant(local, None).map(XmlElement::text)
    }

    // -- Parse / serialize --------------------------------------------------

    /// Parse a document from text. Namespace prefixes are resolved to URIs
    /// and dropped; `xmlns` declarations are not kept as attributes.
    /// Whitespace-only text nodes are discarded.
    pub fn parse(input: &str) -> Result<XmlElement, CoreError> {
        let mut reader = NsReader::from_str(input);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolve, event) = reader
                .read_resolved_event()
                .map_err(|e| CoreError::Parse(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(CoreError::Parse("multiple root elements".into()));
                    }
                    let namespace = match resolve {
                        ResolveResult::Bound(Namespace(ns)) => {
                            Some(String::from_utf8_lossy(ns).into_owned())
                        }
                        _ => None,
                    };
                    let mut element = XmlElement {
                        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
                        namespace,
                        attributes: Vec::new(),
                        children: Vec::new(),
                    };
                    for attr in start.attributes() {
                        let attr = attr.map_err(|e| CoreError::Parse(e.to_string()))?;
                        let key = attr.key.as_ref();
                        if key == b"xmlns" || key.starts_with(b"xmlns:") {
                            continue;
                        }
                        let value = attr
                            .unescape_value()
                            .map_err(|e| CoreError::Parse(e.to_string()))?;
                        element.attributes.push(XmlAttribute {
                            name: String::from_utf8_lossy(attr.key.local_name().as_ref())
                                .into_owned(),
                            value: value.into_owned(),
                        });
                    }
                    stack.push(element);
                }
                Event::End(_) => {
                    let finished = stack
                        .pop()
                        .ok_or_else(|| CoreError::Parse("unbalanced end tag".into()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(finished)),
                        None => root = Some(finished),
                    }
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| CoreError::Parse(e.to_string()))?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and
                // doctypes carry nothing the tree model keeps.
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(CoreError::Parse("unclosed element".into()));
        }
        root.ok_or_else(|| CoreError::Parse("document has no root element".into()))
    }

    fn write_into(&self, out: &mut fmt::Formatter<'_>, inherited: Option<&str>) -> fmt::Result {
        write!(out, "<{}", self.name)?;
        let effective = self.namespace.as_deref().or(inherited);
        if let Some(ns) = self.namespace.as_deref() {
            if inherited != Some(ns) {
                write!(out, " xmlns=\"{}\"", escape(ns))?;
            }
        }
        for attr in &self.attributes {
            write!(out, " {}=\"{}\"", attr.name, escape(&attr.value))?;
        }
        if self.children.is_empty() {
            return write!(out, "/>");
        }
        write!(out, ">")?;
        for child in &self.children {
            match child {
                XmlNode::Element(el) => el.write_into(out, effective)?,
                XmlNode::Text(text) => write!(out, "{}", escape(text))?,
            }
        }
        write!(out, "</{}>", self.name)
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_into(f, None)
    }
}

// ---------------------------------------------------------------------------
// Descendants
// ---------------------------------------------------------------------------

/// Lazy depth-first descendant traversal, see [`XmlElement::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let first_child = self.stack.len();
        self.stack.extend(element.child_elements());
        self.stack[first_child..].reverse();
        Some(element)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
