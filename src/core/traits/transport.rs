use crate::core::errors::Result;
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;

/// Port for reaching a vim25 endpoint.
///
/// Implementations live in `adapters::transport` (e.g. `HttpTransport`).
/// An implementation returns the `returnval` elements of the response,
/// in order, and maps every server fault to `ViError::ApiFault`.
pub trait SoapTransport: Send + Sync {
    /// Invoke one operation and wait for its result.
    fn invoke(&self, call: &SoapCall) -> Result<Vec<XmlNode>>;
}
