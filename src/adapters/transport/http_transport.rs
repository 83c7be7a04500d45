use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::adapters::soap::{envelope, fault};
use crate::config::app_config::{ServerSection, validate_url};
use crate::core::errors::{Result, ViError};
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;
use crate::core::traits::transport::SoapTransport;

/// SOAP over HTTP(S) to a vCenter or ESXi `/sdk` endpoint.
///
/// Calls block on a private current-thread runtime. The cookie store
/// keeps the `vmware_soap_session` cookie so `Login` carries over to
/// later calls.
pub struct HttpTransport {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    endpoint: String,
    soap_action: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, server: &ServerSection) -> Result<Self> {
        validate_url(endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(server.timeout())
            .cookie_store(true)
            .danger_accept_invalid_certs(server.accept_invalid_certs)
            .user_agent(format!("vievents/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ViError::Transport {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ViError::Transport {
                reason: format!("Failed to create async runtime: {e}"),
            })?;

        Ok(Self {
            client,
            runtime,
            endpoint: endpoint.to_string(),
            soap_action: soap_action(&server.api_version),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, operation: &str, body: String) -> Result<(u16, Vec<u8>)> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", self.soap_action.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| ViError::Transport {
                reason: format!("{operation} request to {} failed: {e}", self.endpoint),
            })?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| ViError::Transport {
            reason: format!("Failed to read {operation} response: {e}"),
        })?;
        Ok((status, bytes.to_vec()))
    }
}

impl SoapTransport for HttpTransport {
    fn invoke(&self, call: &SoapCall) -> Result<Vec<XmlNode>> {
        let body = envelope::encode(call)?;
        let (status, payload) = self.runtime.block_on(self.post(call.operation, body))?;
        debug!(operation = call.operation, status, bytes = payload.len(), "response");
        fault::translate(call.operation, status, &payload)
    }
}

/// `SOAPAction` header value for an API version.
fn soap_action(api_version: &str) -> String {
    format!("urn:vim25/{api_version}")
}
