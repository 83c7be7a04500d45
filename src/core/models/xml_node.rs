/// A namespace-free XML element as exchanged with the vim25 endpoint.
///
/// Only what the vim25 wire format actually uses is kept: the local
/// element name, the plain `type` attribute carried by managed object
/// references, the `xsi:type` attribute carried by polymorphic data
/// objects, text content, and child elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub type_attr: Option<String>,
    pub xsi_type: Option<String>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A leaf element holding `text`.
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_type_attr(mut self, kind: impl Into<String>) -> Self {
        self.type_attr = Some(kind.into());
        self
    }

    pub fn with_xsi_type(mut self, kind: impl Into<String>) -> Self {
        self.xsi_type = Some(kind.into());
        self
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child with the given name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
