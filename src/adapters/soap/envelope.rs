use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::core::errors::{Result, ViError};
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const VIM25_NS: &str = "urn:vim25";

/// Serialize a call into a SOAP 1.1 request envelope.
///
/// The operation element carries the default `urn:vim25` namespace so
/// argument elements need no prefix.
pub fn encode(call: &SoapCall) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("soapenv:Envelope").with_attributes([
            ("xmlns:soapenv", SOAP_ENV_NS),
            ("xmlns:xsd", XSD_NS),
            ("xmlns:xsi", XSI_NS),
        ])),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("soapenv:Body")))?;

    let operation = call.to_node();
    write_node(&mut writer, &operation, Some(VIM25_NS))?;

    write(&mut writer, Event::End(BytesEnd::new("soapenv:Body")))?;
    write(&mut writer, Event::End(BytesEnd::new("soapenv:Envelope")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| ViError::MalformedResponse {
        detail: format!("request envelope is not UTF-8: {e}"),
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode, xmlns: Option<&str>) -> Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    if let Some(ns) = xmlns {
        start.push_attribute(("xmlns", ns));
    }
    if let Some(kind) = &node.type_attr {
        start.push_attribute(("type", kind.as_str()));
    }
    if let Some(kind) = &node.xsi_type {
        start.push_attribute(("xsi:type", kind.as_str()));
    }

    let text = node.text.as_deref().unwrap_or_default();
    if node.children.is_empty() && text.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    if !text.is_empty() {
        write(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &node.children {
        write_node(writer, child, None)?;
    }
    write(writer, Event::End(BytesEnd::new(node.name.as_str())))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ViError::MalformedResponse {
            detail: format!("failed to encode request: {e}"),
        })
}
