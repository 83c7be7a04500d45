use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::models::xml_node::XmlNode;

/// Restricts collected events to a time window. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeFilter {
    pub begin: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeFilter {
    pub fn is_empty(&self) -> bool {
        self.begin.is_none() && self.end.is_none()
    }
}

/// Restricts collected events to those produced by the listed users.
///
/// `include_system_user` is always sent to the server once a user filter
/// exists; the user list is sent only when it has entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub user_names: Vec<String>,
    pub include_system_user: bool,
}

/// Filter attached to a new event history collector.
///
/// Every dimension is optional; an absent dimension places no restriction.
/// The filter is fixed once the collector exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub time: Option<TimeFilter>,
    pub event_type_ids: Vec<String>,
    pub user: Option<UserFilter>,
}

impl EventFilter {
    pub fn builder() -> EventFilterBuilder {
        EventFilterBuilder::default()
    }

    /// Whether no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.time.is_none() && self.event_type_ids.is_empty() && self.user.is_none()
    }

    /// Encode as the `filter` argument of `CreateCollectorForEvents`.
    ///
    /// Children follow `EventFilterSpec` schema order: `time`, `userName`,
    /// `eventTypeId`.
    pub fn to_node(&self) -> XmlNode {
        let mut filter = XmlNode::new("filter");

        if let Some(time) = self.time.as_ref().filter(|t| !t.is_empty()) {
            let mut node = XmlNode::new("time");
            if let Some(begin) = time.begin {
                node.children.push(XmlNode::text("beginTime", format_datetime(begin)));
            }
            if let Some(end) = time.end {
                node.children.push(XmlNode::text("endTime", format_datetime(end)));
            }
            filter.children.push(node);
        }

        if let Some(user) = &self.user {
            let node = XmlNode::new("userName")
                .with_child(XmlNode::text(
                    "systemUser",
                    user.include_system_user.to_string(),
                ))
                .with_children(
                    user.user_names
                        .iter()
                        .map(|name| XmlNode::text("userList", name.clone())),
                );
            filter.children.push(node);
        }

        filter.children.extend(
            self.event_type_ids
                .iter()
                .map(|id| XmlNode::text("eventTypeId", id.clone())),
        );

        filter
    }
}

/// Assembles an `EventFilter` one dimension at a time.
#[derive(Debug, Clone, Default)]
pub struct EventFilterBuilder {
    filter: EventFilter,
}

impl EventFilterBuilder {
    /// Only events at or after `begin`.
    pub fn begin(mut self, begin: DateTime<Utc>) -> Self {
        self.filter.time.get_or_insert_with(TimeFilter::default).begin = Some(begin);
        self
    }

    /// Only events at or before `end`.
    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.filter.time.get_or_insert_with(TimeFilter::default).end = Some(end);
        self
    }

    /// Add one event type id, e.g. `UserLoginSessionEvent`.
    pub fn event_type(mut self, id: impl Into<String>) -> Self {
        self.filter.event_type_ids.push(id.into());
        self
    }

    pub fn event_types<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.event_type_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Restrict to the given users. An empty list with
    /// `include_system_user = true` selects system-generated events only.
    pub fn users<I, S>(mut self, names: I, include_system_user: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.user = Some(UserFilter {
            user_names: names.into_iter().map(Into::into).collect(),
            include_system_user,
        });
        self
    }

    pub fn build(self) -> EventFilter {
        self.filter
    }
}

/// xsd:dateTime as the server expects it.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
