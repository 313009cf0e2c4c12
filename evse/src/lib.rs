//! Capability-adaptive drivers for EV charge controllers and energy meters
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `evse-core`: Canonical types, field codec, status mapping, errors
//! - `evse-transport`: Modbus-TCP register transport and HTTP/JSON transport
//! - `evse-charger`: Charger driver for the binary register family
//! - `evse-meter`: Meter driver for the JSON document family
//!
//! Both drivers probe their device once at construction and expose only
//! the operations that probe found present, so "this hardware cannot
//! measure that" is visible in the handle's surface rather than as a
//! runtime error.
//!
//! # Usage
//!
//! ```rust,no_run
//! use evse::charger::ChargerBuilder;
//! use evse::meter::MeterBuilder;
//!
//! # async fn run() -> evse::EvseResult<()> {
//! let charger = ChargerBuilder::new("192.168.1.30:502").connect().await?;
//! if let Some(meter) = charger.power_meter() {
//!     let watts = meter.current_power().await?;
//! }
//!
//! let meter = MeterBuilder::new("http://192.168.1.50").connect().await?;
//! let reading = meter.reading().await?;
//! # Ok(()) }
//! ```

// Re-export core types
pub use evse_core::{
    CanonicalReading, CapabilitySet, ChargeStatus, EvseError, EvseResult,
};

// Re-export charger API
pub mod charger {
    pub use evse_charger::*;
}

// Re-export meter API
pub mod meter {
    pub use evse_meter::*;
}

// Re-export transports
pub mod transport {
    pub use evse_transport::*;
}
