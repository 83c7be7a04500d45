use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::core::errors::{Result, ViError};
use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::service_content::{AboutInfo, ServiceContent, UserSession};
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;
use crate::core::traits::transport::SoapTransport;

/// A connected vim25 session.
///
/// Holds the transport and the `ServiceContent` fetched at connect time.
/// Every remote call in the crate goes through [`ViSession::invoke`].
pub struct ViSession {
    transport: Box<dyn SoapTransport>,
    content: ServiceContent,
}

impl ViSession {
    /// Fetch the service content and return a session ready for login.
    pub fn connect(transport: impl SoapTransport + 'static) -> Result<Self> {
        let transport: Box<dyn SoapTransport> = Box::new(transport);
        let call = SoapCall::new("RetrieveServiceContent", &ManagedObjectRef::service_instance());
        let returnval = single_returnval(call.operation, transport.invoke(&call)?)?;
        let content = ServiceContent::from_node(&returnval)?;

        info!(
            product = %content.about.full_name,
            api_version = %content.about.api_version,
            "connected"
        );

        Ok(Self { transport, content })
    }

    /// Authenticate; the transport keeps the session cookie.
    pub fn login(&self, user_name: &str, password: &SecretString) -> Result<UserSession> {
        let call = SoapCall::new("Login", self.session_manager()?)
            .arg(XmlNode::text("userName", user_name))
            .arg(XmlNode::text("password", password.expose_secret()));
        let returnval = single_returnval(call.operation, self.invoke(&call)?)?;
        let session = UserSession::from_node(&returnval);
        info!(user = %session.user_name, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        let call = SoapCall::new("Logout", self.session_manager()?);
        self.invoke(&call)?;
        Ok(())
    }

    /// Send one call and return its `returnval` elements.
    pub fn invoke(&self, call: &SoapCall) -> Result<Vec<XmlNode>> {
        debug!(operation = call.operation, this = %call.this, "invoke");
        self.transport.invoke(call)
    }

    pub fn content(&self) -> &ServiceContent {
        &self.content
    }

    pub fn about(&self) -> &AboutInfo {
        &self.content.about
    }

    pub fn property_collector(&self) -> &ManagedObjectRef {
        &self.content.property_collector
    }

    pub fn event_manager(&self) -> Result<&ManagedObjectRef> {
        self.content
            .event_manager
            .as_ref()
            .ok_or_else(|| ViError::NotSupported {
                detail: "the server does not expose an EventManager".into(),
            })
    }

    fn session_manager(&self) -> Result<&ManagedObjectRef> {
        self.content
            .session_manager
            .as_ref()
            .ok_or_else(|| ViError::NotSupported {
                detail: "the server does not expose a SessionManager".into(),
            })
    }
}

/// Take the one `returnval` an operation must produce.
pub(crate) fn single_returnval(operation: &str, returnvals: Vec<XmlNode>) -> Result<XmlNode> {
    returnvals
        .into_iter()
        .next()
        .ok_or_else(|| ViError::MalformedResponse {
            detail: format!("{operation} returned no value"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{ScriptedTransport, connect};

    struct BareServer;

    impl SoapTransport for BareServer {
        fn invoke(&self, _call: &SoapCall) -> Result<Vec<XmlNode>> {
            Ok(vec![XmlNode::new("returnval").with_child(
                XmlNode::text("propertyCollector", "propertyCollector")
                    .with_type_attr("PropertyCollector"),
            )])
        }
    }

    #[test]
    fn connect_reads_service_content() {
        let session = connect(ScriptedTransport::new(|_| Ok(vec![])));
        assert_eq!(session.about().api_version, "8.0.2.0");
        assert_eq!(session.event_manager().unwrap().value, "EventManager");
    }

    #[test]
    fn login_sends_credentials_to_session_manager() {
        let transport = ScriptedTransport::new(|_| {
            Ok(vec![
                XmlNode::new("returnval")
                    .with_child(XmlNode::text("key", "52b3"))
                    .with_child(XmlNode::text("userName", "VSPHERE.LOCAL\\ops")),
            ])
        });
        let calls = transport.calls();
        let session = connect(transport);

        let user = session
            .login("ops@vsphere.local", &SecretString::from("s3cret".to_string()))
            .unwrap();
        assert_eq!(user.key, "52b3");

        let call = calls.last("Login").unwrap();
        assert_eq!(call.this.kind, "SessionManager");
        assert_eq!(call.args[0].text.as_deref(), Some("ops@vsphere.local"));
        assert_eq!(call.args[1].text.as_deref(), Some("s3cret"));
    }

    #[test]
    fn login_without_returnval_is_malformed() {
        let session = connect(ScriptedTransport::new(|_| Ok(vec![])));
        let err = session
            .login("ops", &SecretString::from("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, ViError::MalformedResponse { .. }));
    }

    #[test]
    fn missing_managers_are_not_supported() {
        let session = ViSession::connect(BareServer).unwrap();
        assert!(matches!(
            session.event_manager(),
            Err(ViError::NotSupported { .. })
        ));
        assert!(matches!(session.logout(), Err(ViError::NotSupported { .. })));
    }
}
