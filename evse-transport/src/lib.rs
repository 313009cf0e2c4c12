//! Transport layer for the EVSE driver stack
//!
//! This crate provides the transport traits consumed by the driver crates
//! and two concrete implementations: a Modbus-TCP register transport for
//! the binary device family and an HTTP/JSON transport for the JSON device
//! family.
//!
//! The drivers treat every transport call as a single blocking operation
//! that either returns data or fails; timeouts live in the transport
//! settings, retries belong to the caller.

pub mod http;
pub mod modbus_tcp;
pub mod register;

pub use http::{HttpJsonTransport, HttpSettings, JsonTransport};
pub use modbus_tcp::{ModbusTcpSettings, ModbusTcpTransport};
pub use register::RegisterTransport;
