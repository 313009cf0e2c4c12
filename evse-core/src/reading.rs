//! Canonical reading record
//!
//! The normalized, unit-consistent output independent of source generation
//! or model: power in W, currents in A, voltages in V, accumulated energy
//! in kWh. Every field is optional so that "this document shape does not
//! carry this channel" stays distinct from "the device reports zero".

use crate::status::ChargeStatus;
use serde::{Deserialize, Serialize};

/// Normalized device reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalReading {
    /// Present active power in W
    pub power: Option<f64>,
    /// Per-phase currents in A
    pub currents: Option<[f64; 3]>,
    /// Per-phase voltages in V
    pub voltages: Option<[f64; 3]>,
    /// Accumulated energy in kWh
    pub total_energy: Option<f64>,
    /// Vehicle state of charge, 0-100
    pub soc: Option<f64>,
    /// Vehicle or user identifier
    pub identifier: Option<String>,
    /// Charge status
    pub status: Option<ChargeStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_nothing() {
        let reading = CanonicalReading::default();
        assert!(reading.power.is_none());
        assert!(reading.total_energy.is_none());
        assert!(reading.status.is_none());
    }
}
