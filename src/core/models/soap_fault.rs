use crate::core::models::data_object::DataObject;
use crate::core::models::xml_node::XmlNode;

/// A SOAP fault returned by the server, kept intact for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapFault {
    /// `faultcode`, e.g. `ServerFaultCode`.
    pub code: String,
    /// `faultstring`, the human-readable message.
    pub message: String,
    /// vim25 fault type from the detail element, e.g. `ManagedObjectNotFound`.
    pub fault_type: Option<String>,
    /// Fields of the typed fault, if any were sent.
    pub detail: Option<DataObject>,
}

impl SoapFault {
    /// Decode a `<Fault>` element.
    pub fn from_node(node: &XmlNode) -> Self {
        let typed = node.child("detail").and_then(|d| d.children.first());
        let fault_type = typed.map(|t| {
            t.xsi_type
                .clone()
                .unwrap_or_else(|| t.name.trim_end_matches("Fault").to_string())
        });

        Self {
            code: node.child_text("faultcode").unwrap_or_default().to_string(),
            message: node.child_text("faultstring").unwrap_or_default().to_string(),
            fault_type,
            detail: typed.map(DataObject::from_node),
        }
    }

    /// Whether the server reported the given vim25 fault type.
    pub fn is(&self, fault_type: &str) -> bool {
        self.fault_type.as_deref() == Some(fault_type)
    }
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.fault_type {
            Some(kind) => write!(f, "Server fault {kind}: {}", self.message),
            None => write!(f, "Server fault ({}): {}", self.code, self.message),
        }
    }
}
