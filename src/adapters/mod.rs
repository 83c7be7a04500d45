pub mod soap;
pub mod transport;
