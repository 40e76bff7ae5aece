//! Port traits the services depend on.

pub mod config_port;
pub mod price_port;
pub mod quote_port;
