use crate::adapters::soap::parser;
use crate::core::errors::{Result, ViError};
use crate::core::models::soap_fault::SoapFault;
use crate::core::models::xml_node::XmlNode;

/// Turn a raw HTTP response into the `returnval` elements of `operation`.
///
/// This is the one place wire-level failures become `ViError`s:
/// - a SOAP `Fault` in the body is `ApiFault`, whatever the HTTP status;
/// - a non-2xx status without a fault is `Transport`;
/// - anything unparsable or missing the `<operation>Response` element is
///   `MalformedResponse`.
pub fn translate(operation: &str, status: u16, body: impl AsRef<[u8]>) -> Result<Vec<XmlNode>> {
    let body = body.as_ref();
    let success = (200..300).contains(&status);

    let envelope = match parser::parse(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => return Err(http_error(status, body)),
        Err(e) => return Err(e),
    };

    let payload = envelope
        .child("Body")
        .and_then(|b| b.children.first());

    if let Some(fault) = payload.filter(|p| p.name == "Fault") {
        return Err(ViError::ApiFault(SoapFault::from_node(fault)));
    }

    if !success {
        return Err(http_error(status, body));
    }

    let expected = format!("{operation}Response");
    let response = payload
        .filter(|p| p.name == expected)
        .ok_or_else(|| ViError::MalformedResponse {
            detail: format!("expected <{expected}> in the SOAP body"),
        })?;

    Ok(response
        .children_named("returnval")
        .cloned()
        .collect())
}

fn http_error(status: u16, body: &[u8]) -> ViError {
    let snippet: String = String::from_utf8_lossy(body).trim().chars().take(200).collect();
    ViError::Transport {
        reason: if snippet.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {snippet}")
        },
    }
}
