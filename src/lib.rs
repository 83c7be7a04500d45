//! Client for the vSphere `EventHistoryCollector`.
//!
//! Build an [`EventFilter`], create an [`EventHistoryCollector`] on a
//! connected [`ViSession`], then page through the filtered history or
//! read the latest page.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use secrecy::SecretString;
//! use vievents::{EventFilter, EventHistoryCollector, HttpTransport, ServerSection, ViSession};
//!
//! # fn main() -> vievents::Result<()> {
//! let transport = HttpTransport::new("https://vcenter.lab/sdk", &ServerSection::default())?;
//! let session = Arc::new(ViSession::connect(transport)?);
//! session.login("ops@vsphere.local", &SecretString::from("secret".to_string()))?;
//!
//! let filter = EventFilter::builder().event_type("UserLoginSessionEvent").build();
//! let collector = EventHistoryCollector::create(Arc::clone(&session), &filter)?;
//! collector.rewind_collector()?;
//! loop {
//!     let page = collector.read_next_events(100)?;
//!     if page.is_empty() {
//!         break;
//!     }
//!     for event in &page {
//!         println!("{} {}", event.event_type(), event.message().unwrap_or_default());
//!     }
//! }
//! collector.destroy_collector()?;
//! session.logout()?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::transport::http_transport::HttpTransport;
pub use crate::config::app_config::{AppConfig, ServerSection};
pub use crate::core::errors::{Result, ViError};
pub use crate::core::models::data_object::{DataObject, PropertyValue};
pub use crate::core::models::event_filter::{EventFilter, EventFilterBuilder, TimeFilter, UserFilter};
pub use crate::core::models::event_record::EventRecord;
pub use crate::core::models::managed_object::ManagedObjectRef;
pub use crate::core::models::max_count::MaxCount;
pub use crate::core::models::soap_call::SoapCall;
pub use crate::core::models::soap_fault::SoapFault;
pub use crate::core::models::xml_node::XmlNode;
pub use crate::core::services::event_history_collector::{EventHistoryCollector, ReadDirection};
pub use crate::core::services::property_view::PropertyView;
pub use crate::core::services::session::ViSession;
pub use crate::core::traits::transport::SoapTransport;
