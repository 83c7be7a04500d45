//! vim25 SOAP codec: request envelopes, response parsing and fault
//! translation.

pub mod envelope;
pub mod fault;
pub mod parser;
