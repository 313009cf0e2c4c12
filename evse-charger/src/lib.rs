//! Capability-adaptive charger driver for the binary register family
//!
//! This crate talks to charge controllers that expose their state as
//! big-endian register blocks. At construction it detects the firmware
//! generation (legacy controllers lack the model-identifier block), probes
//! which optional readings the device actually supports, and returns a
//! composed [`Charger`] handle exposing exactly those operations.
//!
//! # Usage
//!
//! ```rust,no_run
//! use evse_charger::ChargerBuilder;
//!
//! # async fn run() -> evse_core::EvseResult<()> {
//! let charger = ChargerBuilder::new("192.168.1.30:502").connect().await?;
//!
//! let status = charger.status().await?;
//! if let Some(meter) = charger.power_meter() {
//!     let watts = meter.current_power().await?;
//! }
//! # Ok(()) }
//! ```

pub mod charger;
pub mod diagnostics;
mod driver;
mod probe;
pub mod registers;

pub use charger::{
    Battery, Charger, ChargerBuilder, EnergyMeter, Identifier, PhaseCurrents, PhaseVoltages,
    PowerMeter,
};
pub use diagnostics::Diagnostics;
