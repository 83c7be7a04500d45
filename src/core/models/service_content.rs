use crate::core::errors::{Result, ViError};
use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::xml_node::XmlNode;

/// Product information from `ServiceContent.about`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboutInfo {
    pub full_name: String,
    pub api_version: String,
    pub instance_uuid: Option<String>,
}

/// The subset of `ServiceContent` this crate talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContent {
    pub about: AboutInfo,
    pub property_collector: ManagedObjectRef,
    pub session_manager: Option<ManagedObjectRef>,
    /// Absent on servers that do not expose event history.
    pub event_manager: Option<ManagedObjectRef>,
}

impl ServiceContent {
    /// Decode the `returnval` of `RetrieveServiceContent`.
    pub fn from_node(node: &XmlNode) -> Result<Self> {
        let reference = |name: &str| node.child(name).and_then(ManagedObjectRef::from_node);

        let property_collector =
            reference("propertyCollector").ok_or_else(|| ViError::MalformedResponse {
                detail: "ServiceContent has no propertyCollector".into(),
            })?;

        let about = node
            .child("about")
            .map(|about| AboutInfo {
                full_name: about.child_text("fullName").unwrap_or_default().to_string(),
                api_version: about.child_text("apiVersion").unwrap_or_default().to_string(),
                instance_uuid: about.child_text("instanceUuid").map(str::to_string),
            })
            .unwrap_or_default();

        Ok(Self {
            about,
            property_collector,
            session_manager: reference("sessionManager"),
            event_manager: reference("eventManager"),
        })
    }
}

/// The session returned by `Login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub key: String,
    pub user_name: String,
    pub full_name: Option<String>,
}

impl UserSession {
    pub fn from_node(node: &XmlNode) -> Self {
        Self {
            key: node.child_text("key").unwrap_or_default().to_string(),
            user_name: node.child_text("userName").unwrap_or_default().to_string(),
            full_name: node.child_text("fullName").map(str::to_string),
        }
    }
}
