#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use vievents::{ManagedObjectRef, SoapCall, SoapFault, SoapTransport, ViError, XmlNode};

/// One event in the fake server's history.
#[derive(Debug, Clone)]
pub struct FakeEvent {
    pub key: i64,
    pub kind: &'static str,
    /// Empty for the system user.
    pub user: &'static str,
    pub created: String,
    pub vm: Option<&'static str>,
}

impl FakeEvent {
    fn to_node(&self, name: &str) -> XmlNode {
        let mut node = XmlNode::new(name)
            .with_xsi_type(self.kind)
            .with_child(XmlNode::text("key", self.key.to_string()))
            .with_child(XmlNode::text("chainId", self.key.to_string()))
            .with_child(XmlNode::text("createdTime", self.created.clone()))
            .with_child(XmlNode::text("userName", self.user));
        if let Some(vm) = self.vm {
            node.children.push(
                XmlNode::new("vm")
                    .with_child(XmlNode::text("name", format!("{vm}-name")))
                    .with_child(XmlNode::text("vm", vm).with_type_attr("VirtualMachine")),
            );
        }
        node.with_child(XmlNode::text(
            "fullFormattedMessage",
            format!("{} #{}", self.kind, self.key),
        ))
    }
}

#[derive(Debug)]
struct Collector {
    id: String,
    matched: Vec<FakeEvent>,
    /// Index of the next event a forward read returns.
    cursor: usize,
    page_size: usize,
    destroyed: bool,
    types: Vec<String>,
    users: Option<(Vec<String>, bool)>,
    begin: Option<String>,
    end: Option<String>,
}

impl Collector {
    fn latest_start(&self) -> usize {
        self.matched.len().saturating_sub(self.page_size)
    }

    fn matches(&self, event: &FakeEvent) -> bool {
        if !self.types.is_empty() && !self.types.iter().any(|t| t == event.kind) {
            return false;
        }
        if let Some((names, system)) = &self.users {
            let by_name = names.iter().any(|n| n == event.user);
            let by_system = *system && event.user.is_empty();
            if !by_name && !by_system {
                return false;
            }
        }
        if self.begin.as_ref().is_some_and(|b| event.created < *b) {
            return false;
        }
        if self.end.as_ref().is_some_and(|e| event.created > *e) {
            return false;
        }
        true
    }
}

/// Shared state of the fake server, inspectable by tests.
#[derive(Debug, Default)]
pub struct ServerState {
    pub events: Vec<FakeEvent>,
    pub calls: Vec<SoapCall>,
    collectors: Vec<Collector>,
    fail_next: Option<&'static str>,
}

impl ServerState {
    pub fn count(&self, operation: &str) -> usize {
        self.calls.iter().filter(|c| c.operation == operation).count()
    }

    pub fn last(&self, operation: &str) -> Option<&SoapCall> {
        self.calls.iter().rev().find(|c| c.operation == operation)
    }
}

/// In-memory vCenter answering the calls an event collector makes.
///
/// The cursor and latest page live here, as on a real server: the client
/// only ever sees what each call returns.
#[derive(Clone, Default)]
pub struct FakeVCenter {
    pub state: Arc<Mutex<ServerState>>,
}

impl FakeVCenter {
    /// A server with `n` login events, keys 1..=n, one minute apart.
    /// Every third event comes from the system user.
    pub fn with_logins(n: i64) -> Self {
        let server = Self::default();
        for key in 1..=n {
            let user = if key % 3 == 0 { "" } else { "ops" };
            server.push(FakeEvent {
                key,
                kind: "UserLoginSessionEvent",
                user,
                created: minute(key),
                vm: None,
            });
        }
        server
    }

    pub fn push(&self, event: FakeEvent) {
        let mut state = self.state.lock().unwrap();
        for collector in state.collectors.iter_mut() {
            if collector.matches(&event) {
                collector.matched.push(event.clone());
            }
        }
        state.events.push(event);
    }

    /// Make the next non-bootstrap call fail with the given vim25 fault.
    pub fn fail_next(&self, fault_type: &'static str) {
        self.state.lock().unwrap().fail_next = Some(fault_type);
    }

    fn handle(&self, call: &SoapCall) -> Result<Vec<XmlNode>, ViError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        if call.operation != "RetrieveServiceContent"
            && let Some(fault_type) = state.fail_next.take()
        {
            return Err(fault(fault_type, "injected fault"));
        }

        match call.operation {
            "RetrieveServiceContent" => Ok(vec![service_content()]),
            "Login" => Ok(vec![
                XmlNode::new("returnval")
                    .with_child(XmlNode::text("key", "52b3"))
                    .with_child(XmlNode::text("userName", "ops")),
            ]),
            "Logout" => Ok(vec![]),
            "CreateCollectorForEvents" => Ok(vec![create_collector(&mut state, &call.args[0])]),
            "RetrievePropertiesEx" => retrieve_properties(&state, &call.args[0]),
            _ => collector_call(&mut state, call),
        }
    }
}

impl SoapTransport for FakeVCenter {
    fn invoke(&self, call: &SoapCall) -> vievents::Result<Vec<XmlNode>> {
        self.handle(call)
    }
}

pub fn minute(key: i64) -> String {
    format!("2026-03-02T10:{:02}:00.000Z", key % 60)
}

fn fault(fault_type: &str, message: &str) -> ViError {
    ViError::ApiFault(SoapFault {
        code: "ServerFaultCode".into(),
        message: message.into(),
        fault_type: Some(fault_type.into()),
        detail: None,
    })
}

fn service_content() -> XmlNode {
    XmlNode::new("returnval")
        .with_child(
            XmlNode::text("propertyCollector", "propertyCollector").with_type_attr("PropertyCollector"),
        )
        .with_child(
            XmlNode::new("about")
                .with_child(XmlNode::text("fullName", "Fake vCenter 8.0"))
                .with_child(XmlNode::text("apiVersion", "8.0.2.0")),
        )
        .with_child(XmlNode::text("sessionManager", "SessionManager").with_type_attr("SessionManager"))
        .with_child(XmlNode::text("eventManager", "EventManager").with_type_attr("EventManager"))
}

fn create_collector(state: &mut ServerState, filter: &XmlNode) -> XmlNode {
    let id = format!("session[fake]{}", state.collectors.len() + 1);
    let time = filter.child("time");
    let mut collector = Collector {
        id: id.clone(),
        matched: Vec::new(),
        cursor: 0,
        page_size: 10,
        destroyed: false,
        types: filter
            .children_named("eventTypeId")
            .filter_map(|n| n.text.clone())
            .collect(),
        users: filter.child("userName").map(|u| {
            (
                u.children_named("userList").filter_map(|n| n.text.clone()).collect(),
                u.child_text("systemUser") == Some("true"),
            )
        }),
        begin: time.and_then(|t| t.child_text("beginTime")).map(str::to_string),
        end: time.and_then(|t| t.child_text("endTime")).map(str::to_string),
    };
    let matched = state
        .events
        .iter()
        .filter(|e| collector.matches(e))
        .cloned()
        .collect();
    collector.matched = matched;
    state.collectors.push(collector);
    XmlNode::text("returnval", id).with_type_attr("EventHistoryCollector")
}

fn retrieve_properties(state: &ServerState, spec_set: &XmlNode) -> Result<Vec<XmlNode>, ViError> {
    let obj = spec_set
        .child("objectSet")
        .and_then(|o| o.child("obj"))
        .and_then(ManagedObjectRef::from_node)
        .expect("objectSet.obj");

    let props: Vec<(String, XmlNode)> = match obj.kind.as_str() {
        "EventHistoryCollector" => {
            let collector = live_collector(state, &obj.value)?;
            let latest = &collector.matched[collector.latest_start()..];
            if latest.is_empty() {
                Vec::new()
            } else {
                vec![(
                    "latestPage".to_string(),
                    XmlNode::new("val")
                        .with_xsi_type("ArrayOfEvent")
                        .with_children(latest.iter().map(|e| e.to_node("Event"))),
                )]
            }
        }
        "VirtualMachine" => vec![
            ("name".to_string(), XmlNode::text("val", format!("{}-name", obj.value))),
            ("overallStatus".to_string(), XmlNode::text("val", "green")),
        ],
        _ => Vec::new(),
    };

    let objects = XmlNode::new("objects")
        .with_child(obj.to_node("obj"))
        .with_children(props.into_iter().map(|(name, val)| {
            XmlNode::new("propSet")
                .with_child(XmlNode::text("name", name))
                .with_child(val)
        }));
    Ok(vec![XmlNode::new("returnval").with_child(objects)])
}

fn live_collector<'a>(state: &'a ServerState, id: &str) -> Result<&'a Collector, ViError> {
    state
        .collectors
        .iter()
        .find(|c| c.id == id && !c.destroyed)
        .ok_or_else(|| fault("ManagedObjectNotFound", "The object has already been deleted"))
}

fn collector_call(state: &mut ServerState, call: &SoapCall) -> Result<Vec<XmlNode>, ViError> {
    let collector = state
        .collectors
        .iter_mut()
        .find(|c| c.id == call.this.value && !c.destroyed)
        .ok_or_else(|| fault("ManagedObjectNotFound", "The object has already been deleted"))?;

    let max_count = || -> Result<usize, ViError> {
        let raw: i64 = call.args[0]
            .text
            .as_deref()
            .and_then(|t| t.parse().ok())
            .expect("maxCount");
        usize::try_from(raw).map_err(|_| fault("InvalidArgument", "A specified parameter was not correct: maxCount"))
    };

    match call.operation {
        "RewindCollector" => {
            collector.cursor = 0;
            Ok(vec![])
        }
        "ResetCollector" => {
            collector.cursor = collector.latest_start();
            Ok(vec![])
        }
        "DestroyCollector" => {
            collector.destroyed = true;
            Ok(vec![])
        }
        "SetCollectorPageSize" => {
            collector.page_size = max_count()?;
            Ok(vec![])
        }
        "ReadNextEvents" => {
            let end = (collector.cursor + max_count()?).min(collector.matched.len());
            let page: Vec<_> = collector.matched[collector.cursor..end]
                .iter()
                .map(|e| e.to_node("returnval"))
                .collect();
            collector.cursor = end;
            Ok(page)
        }
        "ReadPreviousEvents" => {
            let start = collector.cursor.saturating_sub(max_count()?);
            let page: Vec<_> = collector.matched[start..collector.cursor]
                .iter()
                .rev()
                .map(|e| e.to_node("returnval"))
                .collect();
            collector.cursor = start;
            Ok(page)
        }
        other => Err(fault("MethodNotFound", &format!("{other} is not implemented"))),
    }
}
