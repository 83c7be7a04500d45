use serde::Serialize;

use crate::core::models::xml_node::XmlNode;

/// Reference to a server-side managed object (`type` + opaque value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ManagedObjectRef {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl ManagedObjectRef {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// The well-known root object every session starts from.
    pub fn service_instance() -> Self {
        Self::new("ServiceInstance", "ServiceInstance")
    }

    /// Read a reference from an element such as `<_this type="T">v</_this>`.
    ///
    /// Returns `None` when the element has no `type` attribute.
    pub fn from_node(node: &XmlNode) -> Option<Self> {
        let kind = node.type_attr.as_ref()?;
        Some(Self::new(
            kind.clone(),
            node.text.clone().unwrap_or_default(),
        ))
    }

    /// Encode as an element named `name`.
    pub fn to_node(&self, name: &str) -> XmlNode {
        XmlNode::text(name, self.value.clone()).with_type_attr(self.kind.clone())
    }
}

impl std::fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
