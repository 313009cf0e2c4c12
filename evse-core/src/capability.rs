//! Capability set for optional device operations
//!
//! A device's capability set is determined exactly once, by probing at
//! construction time, and never re-evaluated during the device's lifetime.
//! A device that loses a sensor mid-session keeps its originally probed
//! capabilities but may surface a runtime error on read.

use serde::{Deserialize, Serialize};

/// Set of optional operations a device instance supports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Aggregate active power reading
    pub power: bool,
    /// Per-phase current readings
    pub phase_currents: bool,
    /// Per-phase voltage readings
    pub phase_voltages: bool,
    /// Accumulated energy total
    pub total_energy: bool,
    /// Vehicle state-of-charge reading
    pub state_of_charge: bool,
    /// Vehicle / user identification
    pub identify: bool,
}

impl CapabilitySet {
    /// The empty capability set
    pub const fn none() -> Self {
        Self {
            power: false,
            phase_currents: false,
            phase_voltages: false,
            total_energy: false,
            state_of_charge: false,
            identify: false,
        }
    }

    /// Whether no optional operation is supported
    pub fn is_empty(&self) -> bool {
        *self == Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(CapabilitySet::default().is_empty());
        assert_eq!(CapabilitySet::default(), CapabilitySet::none());
    }

    #[test]
    fn test_non_empty() {
        let caps = CapabilitySet {
            power: true,
            ..CapabilitySet::none()
        };
        assert!(!caps.is_empty());
    }
}
