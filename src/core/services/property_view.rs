use std::sync::Arc;

use tracing::debug;

use crate::core::errors::Result;
use crate::core::models::data_object::{DataObject, PropertyValue};
use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;
use crate::core::services::session::ViSession;

/// Lazy, cached view over the properties of one managed object.
///
/// Nothing is fetched until the first `get`. All properties are then
/// retrieved in one `RetrievePropertiesEx` call and served from the cache
/// until `flush` or `refresh`.
pub struct PropertyView {
    session: Arc<ViSession>,
    moref: ManagedObjectRef,
    cache: Option<DataObject>,
}

impl PropertyView {
    pub fn new(session: Arc<ViSession>, moref: ManagedObjectRef) -> Self {
        Self {
            session,
            moref,
            cache: None,
        }
    }

    pub fn moref(&self) -> &ManagedObjectRef {
        &self.moref
    }

    /// Value of a top-level property, or `None` if the server did not set it.
    pub fn get(&mut self, field: &str) -> Result<Option<PropertyValue>> {
        if self.cache.is_none() {
            self.cache = Some(self.fetch()?);
        }
        Ok(self
            .cache
            .as_ref()
            .and_then(|props| props.get(field))
            .cloned())
    }

    /// Drop cached values; the next `get` goes back to the server.
    pub fn flush(&mut self) {
        self.cache = None;
    }

    /// Drop cached values and fetch them again now.
    pub fn refresh(&mut self) -> Result<()> {
        self.flush();
        self.cache = Some(self.fetch()?);
        Ok(())
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    fn fetch(&self) -> Result<DataObject> {
        debug!(object = %self.moref, "fetching properties");
        let call = SoapCall::new("RetrievePropertiesEx", self.session.property_collector())
            .arg(self.spec_set())
            .arg(XmlNode::new("options"));

        let returnvals = self.session.invoke(&call)?;

        // RetrieveResult > objects > propSet { name, val }
        let mut props = DataObject {
            type_name: Some(self.moref.kind.clone()),
            fields: Vec::new(),
        };
        let prop_sets = returnvals
            .iter()
            .flat_map(|rv| rv.children_named("objects"))
            .filter(|obj| obj.child("obj").and_then(ManagedObjectRef::from_node).as_ref() == Some(&self.moref))
            .flat_map(|obj| obj.children_named("propSet"));

        for prop in prop_sets {
            let (Some(name), Some(val)) = (prop.child_text("name"), prop.child("val")) else {
                continue;
            };
            props
                .fields
                .push((name.to_string(), PropertyValue::from_node(val)));
        }

        Ok(props)
    }

    fn spec_set(&self) -> XmlNode {
        XmlNode::new("specSet")
            .with_child(
                XmlNode::new("propSet")
                    .with_child(XmlNode::text("type", self.moref.kind.clone()))
                    .with_child(XmlNode::text("all", "true")),
            )
            .with_child(
                XmlNode::new("objectSet")
                    .with_child(self.moref.to_node("obj"))
                    .with_child(XmlNode::text("skip", "false")),
            )
    }
}
