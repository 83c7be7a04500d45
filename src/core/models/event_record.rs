use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::core::models::data_object::{DataObject, PropertyValue};
use crate::core::services::property_view::PropertyView;
use crate::core::services::session::ViSession;

/// One event as returned by the server.
///
/// The fields are carried as an opaque `DataObject`; the accessors below
/// only read the handful of fields every vim25 `Event` has. Managed
/// objects the event points at are not fetched until `view_of` is used.
#[derive(Clone)]
pub struct EventRecord {
    data: DataObject,
    session: Arc<ViSession>,
}

impl EventRecord {
    pub fn new(session: Arc<ViSession>, data: DataObject) -> Self {
        Self { data, session }
    }

    pub fn data(&self) -> &DataObject {
        &self.data
    }

    pub fn into_data(self) -> DataObject {
        self.data
    }

    /// Dotted path lookup, e.g. `vm.name` or `host.host`.
    pub fn get(&self, path: &str) -> Option<&PropertyValue> {
        self.data.get(path)
    }

    /// vim25 type of the event, e.g. `UserLoginSessionEvent`.
    pub fn event_type(&self) -> &str {
        self.data.type_name.as_deref().unwrap_or("Event")
    }

    pub fn key(&self) -> Option<i64> {
        self.data.get_text("key")?.parse().ok()
    }

    pub fn chain_id(&self) -> Option<i64> {
        self.data.get_text("chainId")?.parse().ok()
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.data.get_text("createdTime")?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn user_name(&self) -> Option<&str> {
        self.data.get_text("userName").filter(|u| !u.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.data.get_text("fullFormattedMessage")
    }

    /// Lazy view over the managed object referenced at `path`
    /// (for example `vm.vm`). Nothing is fetched until the view is read.
    pub fn view_of(&self, path: &str) -> Option<PropertyView> {
        let moref = self.data.get(path)?.as_reference()?.clone();
        Some(PropertyView::new(Arc::clone(&self.session), moref))
    }
}

impl std::fmt::Debug for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecord").field("data", &self.data).finish()
    }
}

impl Serialize for EventRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}
