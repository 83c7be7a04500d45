use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::xml_node::XmlNode;

/// A single property value as delivered by the server.
///
/// vievents does not know the vim25 type system; values are kept as the
/// generic shapes the wire format allows.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Any primitive (string, number, boolean, dateTime) as sent.
    Text(String),
    /// A managed object reference.
    Reference(ManagedObjectRef),
    /// A nested data object.
    Object(DataObject),
    /// An `ArrayOf*` value or a repeated element.
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Decode a value element.
    pub fn from_node(node: &XmlNode) -> Self {
        if node.is_leaf()
            && let Some(moref) = ManagedObjectRef::from_node(node)
        {
            return PropertyValue::Reference(moref);
        }

        if node
            .xsi_type
            .as_deref()
            .is_some_and(|t| t.starts_with("ArrayOf"))
        {
            return PropertyValue::List(node.children.iter().map(PropertyValue::from_node).collect());
        }

        if node.is_leaf() {
            return PropertyValue::Text(node.text.clone().unwrap_or_default());
        }

        PropertyValue::Object(DataObject::from_node(node))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ManagedObjectRef> {
        match self {
            PropertyValue::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DataObject> {
        match self {
            PropertyValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// View as a list. A scalar is a list of one, since the wire format
    /// cannot tell a one-element repeated field from a single field.
    pub fn as_list(&self) -> &[PropertyValue] {
        match self {
            PropertyValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Text(s) => serializer.serialize_str(s),
            PropertyValue::Reference(r) => r.serialize(serializer),
            PropertyValue::Object(o) => o.serialize(serializer),
            PropertyValue::List(items) => items.serialize(serializer),
        }
    }
}

/// An opaque, schema-defined bag of fields (an event, an `AboutInfo`, ...).
///
/// Field order is the order the server sent them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataObject {
    pub type_name: Option<String>,
    pub fields: Vec<(String, PropertyValue)>,
}

impl DataObject {
    /// Decode the children of `node` as fields. Repeated child names are
    /// collected into a `PropertyValue::List`.
    pub fn from_node(node: &XmlNode) -> Self {
        let mut groups: Vec<(&str, Vec<&XmlNode>)> = Vec::new();
        for child in &node.children {
            match groups.iter_mut().find(|(name, _)| *name == child.name) {
                Some((_, nodes)) => nodes.push(child),
                None => groups.push((child.name.as_str(), vec![child])),
            }
        }

        let fields = groups
            .into_iter()
            .map(|(name, nodes)| {
                let value = if nodes.len() == 1 {
                    PropertyValue::from_node(nodes[0])
                } else {
                    PropertyValue::List(nodes.into_iter().map(PropertyValue::from_node).collect())
                };
                (name.to_string(), value)
            })
            .collect();

        Self {
            type_name: node.xsi_type.clone(),
            fields,
        }
    }

    /// Direct field lookup.
    pub fn field(&self, name: &str) -> Option<&PropertyValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Dotted path lookup through nested objects, e.g. `vm.name`.
    pub fn get(&self, path: &str) -> Option<&PropertyValue> {
        let mut segments = path.split('.');
        let mut current = self.field(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.field(segment)?;
        }
        Some(current)
    }

    /// Text of the value at `path`, if it is a primitive.
    pub fn get_text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(PropertyValue::as_text)
    }
}

impl Serialize for DataObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.type_name.is_some());
        let mut map = serializer.serialize_map(Some(self.fields.len() + extra))?;
        if let Some(type_name) = &self.type_name {
            map.serialize_entry("_type", type_name)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
