pub mod data_object;
pub mod event_filter;
pub mod event_record;
pub mod managed_object;
pub mod max_count;
pub mod service_content;
pub mod soap_call;
pub mod soap_fault;
pub mod xml_node;
