use std::sync::Arc;

use tracing::{debug, info};

use crate::core::errors::{Result, ViError};
use crate::core::models::data_object::{DataObject, PropertyValue};
use crate::core::models::event_filter::EventFilter;
use crate::core::models::event_record::EventRecord;
use crate::core::models::managed_object::ManagedObjectRef;
use crate::core::models::max_count::MaxCount;
use crate::core::models::soap_call::SoapCall;
use crate::core::models::xml_node::XmlNode;
use crate::core::services::property_view::PropertyView;
use crate::core::services::session::{ViSession, single_returnval};

/// Which way a scrollable-view read moves the server-side cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDirection {
    /// Towards newer events (`ReadNextEvents`).
    Next,
    /// Towards older events (`ReadPreviousEvents`).
    Previous,
}

impl ReadDirection {
    fn operation(self) -> &'static str {
        match self {
            ReadDirection::Next => "ReadNextEvents",
            ReadDirection::Previous => "ReadPreviousEvents",
        }
    }
}

/// Client side of a server-side `EventHistoryCollector`.
///
/// The collector has two views on the filtered history:
/// - a scrollable view with a cursor kept by the server, moved by
///   `rewind_collector`/`reset_collector` and the `read_*` calls;
/// - the "latest page", a bounded buffer of the newest matching events,
///   read with `get_latest_events` and sized with `set_collector_page_size`.
///
/// Nothing is guarded locally after `destroy_collector`; further calls
/// reach the server and fail there.
pub struct EventHistoryCollector {
    session: Arc<ViSession>,
    moref: ManagedObjectRef,
    props: PropertyView,
}

impl EventHistoryCollector {
    /// Create a collector for events matching `filter`.
    ///
    /// The cursor starts at the oldest matching event.
    pub fn create(session: Arc<ViSession>, filter: &EventFilter) -> Result<Self> {
        let call = SoapCall::new("CreateCollectorForEvents", session.event_manager()?)
            .arg(filter.to_node());
        let returnval = single_returnval(call.operation, session.invoke(&call)?)?;
        let moref = ManagedObjectRef::from_node(&returnval).ok_or_else(|| {
            ViError::MalformedResponse {
                detail: "CreateCollectorForEvents did not return a managed object reference".into(),
            }
        })?;

        info!(collector = %moref, unrestricted = filter.is_unrestricted(), "created event collector");

        let props = PropertyView::new(Arc::clone(&session), moref.clone());
        Ok(Self {
            session,
            moref,
            props,
        })
    }

    /// Handle of the server-side collector.
    pub fn moref(&self) -> &ManagedObjectRef {
        &self.moref
    }

    /// Move the cursor to just before the latest page, so that
    /// `read_previous_events` walks from newest to oldest.
    pub fn reset_collector(&self) -> Result<()> {
        self.call("ResetCollector")
    }

    /// Move the cursor to the oldest event, so that `read_next_events`
    /// walks from oldest to newest.
    pub fn rewind_collector(&self) -> Result<()> {
        self.call("RewindCollector")
    }

    /// Release the server-side collector.
    pub fn destroy_collector(&self) -> Result<()> {
        self.call("DestroyCollector")?;
        info!(collector = %self.moref, "destroyed event collector");
        Ok(())
    }

    /// Limit the latest page to at most `max_count` events.
    pub fn set_collector_page_size<N>(&self, max_count: N) -> Result<()>
    where
        N: TryInto<MaxCount>,
        ViError: From<N::Error>,
    {
        let max_count = max_count.try_into()?;
        let call = SoapCall::new("SetCollectorPageSize", &self.moref)
            .arg(XmlNode::text("maxCount", max_count.to_string()));
        self.session.invoke(&call)?;
        Ok(())
    }

    /// Events currently in the latest page, freshly fetched.
    ///
    /// Returns an empty list when the collector exposes no latest page.
    /// The server does not order the page.
    pub fn get_latest_events(&mut self) -> Result<Vec<EventRecord>> {
        self.props.refresh()?;
        let Some(page) = self.props.get("latestPage")? else {
            return Ok(Vec::new());
        };

        Ok(page
            .as_list()
            .iter()
            .filter_map(PropertyValue::as_object)
            .map(|event| EventRecord::new(Arc::clone(&self.session), event.clone()))
            .collect())
    }

    /// Read up to `max_count` events forward from the cursor. Empty once
    /// the newest event has been read.
    pub fn read_next_events<N>(&self, max_count: N) -> Result<Vec<EventRecord>>
    where
        N: TryInto<MaxCount>,
        ViError: From<N::Error>,
    {
        self.read_events(max_count.try_into()?, ReadDirection::Next)
    }

    /// Read up to `max_count` events backward from the cursor. Empty once
    /// the oldest event has been read.
    pub fn read_previous_events<N>(&self, max_count: N) -> Result<Vec<EventRecord>>
    where
        N: TryInto<MaxCount>,
        ViError: From<N::Error>,
    {
        self.read_events(max_count.try_into()?, ReadDirection::Previous)
    }

    /// Read up to `max_count` events in `direction` from the cursor.
    pub fn read_events(&self, max_count: MaxCount, direction: ReadDirection) -> Result<Vec<EventRecord>> {
        let call = SoapCall::new(direction.operation(), &self.moref)
            .arg(XmlNode::text("maxCount", max_count.to_string()));
        let returnvals = self.session.invoke(&call)?;
        debug!(operation = call.operation, count = returnvals.len(), "read events");

        Ok(returnvals
            .iter()
            .map(|node| EventRecord::new(Arc::clone(&self.session), DataObject::from_node(node)))
            .collect())
    }

    fn call(&self, operation: &'static str) -> Result<()> {
        self.session.invoke(&SoapCall::new(operation, &self.moref))?;
        Ok(())
    }
}
