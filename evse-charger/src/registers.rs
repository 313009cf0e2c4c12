//! Register layouts for the charge controller families
//!
//! The two firmware generations store the same logical quantities at
//! different addresses with different widths and scale factors. Each
//! generation gets its own field-location table; the prober selects the
//! table once at construction and every subsequent read uses that table
//! exclusively.
//!
//! Legacy firmware carries no model-identifier block and no aggregate
//! power or energy registers: power is derived from phase currents and
//! energy from the per-phase accumulation blocks.

use evse_core::{ChargeStatus, RegisterField, SentinelPolicy, StatusTable};

// Informational registers, identical in both layouts.
pub const REG_FIRMWARE: RegisterField = RegisterField::new(100, 2, 1.0, SentinelPolicy::None);
pub const REG_OCPP_CP_STATUS: RegisterField = RegisterField::new(104, 1, 1.0, SentinelPolicy::None);
pub const REG_PROTOCOL_VERSION: RegisterField =
    RegisterField::new(120, 2, 1.0, SentinelPolicy::None);
pub const REG_CHARGE_POINT_STATE: RegisterField =
    RegisterField::new(122, 1, 1.0, SentinelPolicy::None);
/// Present only on modern firmware; a failed read selects the legacy layout.
pub const REG_CHARGE_POINT_MODEL: RegisterField =
    RegisterField::new(142, 10, 1.0, SentinelPolicy::None);

// Identification and vehicle registers (modern firmware).
pub const REG_USER_ID: RegisterField = RegisterField::new(720, 10, 1.0, SentinelPolicy::None);
pub const REG_EV_BATTERY_STATE: RegisterField =
    RegisterField::new(730, 1, 1.0, SentinelPolicy::None);
pub const REG_SMART_VEHICLE: RegisterField = RegisterField::new(740, 1, 1.0, SentinelPolicy::None);
pub const REG_EVCC_ID: RegisterField = RegisterField::new(741, 6, 1.0, SentinelPolicy::None);

/// Shared enable / current-limit register: 0 disables, any positive value
/// enables at that limit in amperes.
pub const REG_HEMS_CURRENT_LIMIT: RegisterField =
    RegisterField::new(1000, 1, 1.0, SentinelPolicy::None);

/// Status code table for the charge-point state register
pub const CHARGE_POINT_STATES: StatusTable = StatusTable::new(&[
    (1, ChargeStatus::A),
    (2, ChargeStatus::B),
    (3, ChargeStatus::C),
    (4, ChargeStatus::C),
]);

/// Per-generation field-location table
#[derive(Debug, Clone, Copy)]
pub struct RegisterLayout {
    /// Headline field probed for meter presence; the all-ones sentinel here
    /// means the whole meter block is unsupported.
    pub probe_power: RegisterField,
    /// Aggregate active power in W; absent on legacy firmware (derived
    /// from phase currents instead).
    pub active_power: Option<RegisterField>,
    /// Phase currents, mA on the wire
    pub currents: RegisterField,
    /// Phase voltages, V on the wire
    pub voltages: RegisterField,
    /// First phase of the voltage block, probed for population
    pub probe_voltage: RegisterField,
    /// Accumulated energy total in Wh; absent on legacy firmware
    pub total_energy: Option<RegisterField>,
    /// Per-phase energy accumulation blocks (mWh per phase); legacy only
    pub phase_energy: Option<RegisterField>,
}

/// Modern firmware layout
pub const MODERN_LAYOUT: RegisterLayout = RegisterLayout {
    probe_power: RegisterField::new(220, 2, 1.0, SentinelPolicy::TreatMaxAsUnsupported),
    active_power: Some(RegisterField::new(220, 2, 1.0, SentinelPolicy::None)),
    currents: RegisterField::new(212, 6, 1000.0, SentinelPolicy::TreatMaxAsZero),
    voltages: RegisterField::new(222, 6, 1.0, SentinelPolicy::TreatMaxAsZero),
    probe_voltage: RegisterField::new(222, 2, 1.0, SentinelPolicy::None),
    total_energy: Some(RegisterField::new(218, 2, 1000.0, SentinelPolicy::None)),
    phase_energy: None,
};

/// Legacy firmware layout
pub const LEGACY_LAYOUT: RegisterLayout = RegisterLayout {
    probe_power: RegisterField::new(200, 2, 1.0, SentinelPolicy::TreatMaxAsUnsupported),
    active_power: None,
    currents: RegisterField::new(212, 6, 1000.0, SentinelPolicy::TreatMaxAsZero),
    voltages: RegisterField::new(222, 6, 1.0, SentinelPolicy::TreatMaxAsZero),
    probe_voltage: RegisterField::new(222, 2, 1.0, SentinelPolicy::None),
    total_energy: None,
    phase_energy: Some(RegisterField::new(200, 6, 1000.0, SentinelPolicy::None)),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_place_power_differently() {
        assert_eq!(MODERN_LAYOUT.probe_power.address, 220);
        assert_eq!(LEGACY_LAYOUT.probe_power.address, 200);
        assert!(MODERN_LAYOUT.active_power.is_some());
        assert!(LEGACY_LAYOUT.active_power.is_none());
        assert!(LEGACY_LAYOUT.phase_energy.is_some());
        assert!(MODERN_LAYOUT.phase_energy.is_none());
    }

    #[test]
    fn test_phase_fields_zero_on_sentinel() {
        assert_eq!(
            MODERN_LAYOUT.currents.sentinel,
            SentinelPolicy::TreatMaxAsZero
        );
        assert_eq!(
            MODERN_LAYOUT.voltages.sentinel,
            SentinelPolicy::TreatMaxAsZero
        );
    }

    #[test]
    fn test_probe_field_marks_unsupported() {
        assert!(MODERN_LAYOUT.probe_power.is_unsupported(u32::MAX as u64));
        assert!(LEGACY_LAYOUT.probe_power.is_unsupported(u32::MAX as u64));
    }
}
