use std::sync::{Arc, Mutex};

use crate::core::errors::Result;
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;
use crate::core::services::session::ViSession;
use crate::core::traits::transport::SoapTransport;

type Responder = Box<dyn Fn(&SoapCall) -> Result<Vec<XmlNode>> + Send + Sync>;

/// Calls seen by a `ScriptedTransport`, shared with the test.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<SoapCall>>>);

impl CallLog {
    pub fn count(&self, operation: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn last(&self, operation: &str) -> Option<SoapCall> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|c| c.operation == operation)
            .cloned()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().iter().map(|c| c.operation).collect()
    }
}

/// Transport answering `RetrieveServiceContent` itself and every other
/// call through the given closure.
pub struct ScriptedTransport {
    log: CallLog,
    respond: Responder,
}

impl ScriptedTransport {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&SoapCall) -> Result<Vec<XmlNode>> + Send + Sync + 'static,
    {
        Self {
            log: CallLog::default(),
            respond: Box::new(respond),
        }
    }

    pub fn calls(&self) -> CallLog {
        self.log.clone()
    }
}

impl SoapTransport for ScriptedTransport {
    fn invoke(&self, call: &SoapCall) -> Result<Vec<XmlNode>> {
        self.log.0.lock().unwrap().push(call.clone());
        if call.operation == "RetrieveServiceContent" {
            return Ok(vec![service_content()]);
        }
        (self.respond)(call)
    }
}

pub fn service_content() -> XmlNode {
    XmlNode::new("returnval")
        .with_child(
            XmlNode::text("propertyCollector", "propertyCollector").with_type_attr("PropertyCollector"),
        )
        .with_child(
            XmlNode::new("about")
                .with_child(XmlNode::text("fullName", "VMware vCenter Server 8.0.2"))
                .with_child(XmlNode::text("apiVersion", "8.0.2.0")),
        )
        .with_child(XmlNode::text("sessionManager", "SessionManager").with_type_attr("SessionManager"))
        .with_child(XmlNode::text("eventManager", "EventManager").with_type_attr("EventManager"))
}

pub fn connect(transport: ScriptedTransport) -> Arc<ViSession> {
    Arc::new(ViSession::connect(transport).unwrap())
}
