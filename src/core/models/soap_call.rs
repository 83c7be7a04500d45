use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::xml_node::XmlNode;

/// One vim25 operation invocation: the operation name, the object it is
/// invoked on, and its arguments in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapCall {
    pub operation: &'static str,
    pub this: ManagedObjectRef,
    pub args: Vec<XmlNode>,
}

impl SoapCall {
    pub fn new(operation: &'static str, this: &ManagedObjectRef) -> Self {
        Self {
            operation,
            this: this.clone(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, node: XmlNode) -> Self {
        self.args.push(node);
        self
    }

    /// The operation element with `_this` and arguments, ready for an envelope.
    pub fn to_node(&self) -> XmlNode {
        XmlNode::new(self.operation)
            .with_child(self.this.to_node("_this"))
            .with_children(self.args.iter().cloned())
    }
}
