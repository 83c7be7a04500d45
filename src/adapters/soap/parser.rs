use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::errors::{Result, ViError};
use crate::core::models::xml_node::XmlNode;

/// Parse a response document into its root element.
///
/// Namespace prefixes are dropped from element names. Text between child
/// elements is discarded; text of leaf elements is kept verbatim. Text and
/// CDATA must both be valid UTF-8.
pub fn parse(document: impl AsRef<[u8]>) -> Result<XmlNode> {
    let mut reader = Reader::from_reader(document.as_ref());
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event().map_err(|e| malformed(&reader, e))? {
            Event::Start(start) => stack.push(open(&start)?),
            Event::Empty(start) => {
                let node = open(&start)?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                    top.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    let bytes = data.into_inner();
                    let text = std::str::from_utf8(&bytes).map_err(|e| ViError::MalformedResponse {
                        detail: format!("CDATA in <{}> is not UTF-8: {e}", top.name),
                    })?;
                    top.text.get_or_insert_with(String::new).push_str(text);
                }
            }
            Event::End(_) => {
                let Some(mut node) = stack.pop() else {
                    return Err(ViError::MalformedResponse {
                        detail: "unbalanced closing tag".into(),
                    });
                };
                if !node.children.is_empty() || node.text.as_deref() == Some("") {
                    node.text = None;
                }
                attach(&mut stack, &mut root, node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ViError::MalformedResponse {
            detail: format!("document ended inside <{}>", stack[stack.len() - 1].name),
        });
    }

    root.ok_or_else(|| ViError::MalformedResponse {
        detail: "empty document".into(),
    })
}

fn open(start: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.local_name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ViError::MalformedResponse {
            detail: format!("bad attribute on <{}>: {e}", node.name),
        })?;
        if attr.key.local_name().as_ref() != b"type" {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| ViError::MalformedResponse {
                detail: format!("bad attribute value on <{}>: {e}", node.name),
            })?
            .into_owned();
        if attr.key.prefix().is_some() {
            node.xsi_type = Some(value);
        } else {
            node.type_attr = Some(value);
        }
    }

    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn malformed(reader: &Reader<&[u8]>, e: quick_xml::Error) -> ViError {
    ViError::MalformedResponse {
        detail: format!("XML error at byte {}: {e}", reader.buffer_position()),
    }
}
