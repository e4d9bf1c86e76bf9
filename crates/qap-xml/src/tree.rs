//! In-memory XML tree for assessment documents.

use qap_model::{SchemaId, XNAT_NS, XNAT_NS_PREFIX, XSI_NS, XSI_NS_PREFIX};

/// A namespace prefix bound to its URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

impl Namespace {
    /// Shared namespace for generic XNAT fields (`date`, `time`).
    pub const XNAT: Namespace = Namespace {
        prefix: XNAT_NS_PREFIX,
        uri: XNAT_NS,
    };

    pub const XSI: Namespace = Namespace {
        prefix: XSI_NS_PREFIX,
        uri: XSI_NS,
    };

    /// Namespace of an assessment schema's own elements.
    pub fn of_schema(schema: SchemaId) -> Self {
        Self {
            prefix: schema.namespace_prefix(),
            uri: schema.namespace_uri(),
        }
    }
}

/// Child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Comment(String),
}

/// A namespaced element with attributes, text, and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Namespace,
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Element {
    pub fn new(namespace: Namespace, name: impl Into<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_text(namespace: Namespace, name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(namespace, name);
        element.text = text.into();
        element
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Local name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefixed name as written to XML, e.g. `AMCZ0:snr`.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace.prefix, self.name)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true when the element has the given namespace and local name.
    pub fn is(&self, namespace: Namespace, name: &str) -> bool {
        self.namespace.uri == namespace.uri && self.name == name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Sets an attribute, replacing the value of an existing one.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(name, _)| *name == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements, skipping comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Comment(_) => None,
        })
    }

    /// Direct child elements with the given namespace and local name.
    pub fn children_named<'a>(
        &'a self,
        namespace: Namespace,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |element| element.is(namespace, name))
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn append_comment(&mut self, text: impl Into<String>) {
        self.children.push(Node::Comment(text.into()));
    }

    /// Depth-first search of this element's descendants (not itself).
    pub fn find_descendant(&self, namespace: Namespace, name: &str) -> Option<&Element> {
        for element in self.child_elements() {
            if element.is(namespace, name) {
                return Some(element);
            }
            if let Some(found) = element.find_descendant(namespace, name) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable counterpart of [`Element::find_descendant`].
    pub fn find_descendant_mut(&mut self, namespace: Namespace, name: &str) -> Option<&mut Element> {
        for node in &mut self.children {
            let Node::Element(element) = node else {
                continue;
            };
            if element.is(namespace, name) {
                return Some(element);
            }
            if let Some(found) = element.find_descendant_mut(namespace, name) {
                return Some(found);
            }
        }
        None
    }
}

/// A complete assessment document: the root element plus the namespaces it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    declarations: Vec<Namespace>,
}

impl Document {
    pub fn new(root: Element, declarations: Vec<Namespace>) -> Self {
        Self { root, declarations }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Namespaces declared on the root element, in declaration order.
    pub fn declarations(&self) -> &[Namespace] {
        &self.declarations
    }

    pub fn into_root(self) -> Element {
        self.root
    }
}
