use crate::core::models::soap_fault::SoapFault;

/// All errors surfaced by vievents.
///
/// Local validation failures (`Parameter`) never reach the network.
/// Everything the server or the wire reports is funnelled through
/// `adapters::soap::fault::translate` into `ApiFault`, `Transport`
/// or `MalformedResponse`.
#[derive(Debug, thiserror::Error)]
pub enum ViError {
    #[error("Parameter error: {detail}")]
    Parameter { detail: String },

    #[error("{0}")]
    ApiFault(SoapFault),

    #[error(
        "Transport error: {reason}\n\n  \
         The server could not be reached or answered without a SOAP payload.\n  \
         Check the server URL (it usually ends in /sdk) and your network."
    )]
    Transport { reason: String },

    #[error("Malformed response: {detail}")]
    MalformedResponse { detail: String },

    #[error("Not supported by this server: {detail}")]
    NotSupported { detail: String },

    #[error(
        "Invalid configuration: {detail}\n\n  \
         Pass --server and --username, or write them to the config file:\n    \
         [server]\n    \
         url = \"https://vcenter.example.com/sdk\"\n    \
         username = \"administrator@vsphere.local\""
    )]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ViError {
    /// Shorthand for the local parameter-validation error.
    pub fn parameter(detail: impl Into<String>) -> Self {
        ViError::Parameter {
            detail: detail.into(),
        }
    }

    /// The server fault behind this error, if it came from the server.
    pub fn fault(&self) -> Option<&SoapFault> {
        match self {
            ViError::ApiFault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<SoapFault> for ViError {
    fn from(fault: SoapFault) -> Self {
        ViError::ApiFault(fault)
    }
}

impl From<std::convert::Infallible> for ViError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViError>;
