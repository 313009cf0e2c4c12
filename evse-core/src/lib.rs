//! Core types and utilities for the EVSE driver stack
//!
//! This crate provides fundamental types, error handling, and wire-level
//! decoding used throughout the charger (binary register) and meter (JSON)
//! driver families.

pub mod auth;
pub mod capability;
pub mod error;
pub mod field;
pub mod reading;
pub mod status;

pub use auth::{AlwaysAuthorized, AuthorizationGate};
pub use capability::CapabilitySet;
pub use error::{EvseError, EvseResult};
pub use field::{RegisterField, SentinelPolicy};
pub use reading::CanonicalReading;
pub use status::{ChargeStatus, StatusTable};
