//! Capability prober
//!
//! Runs exactly once, before the composed handle exists. Every trial read
//! is tolerant of failure: a failed trial just leaves the corresponding
//! capability unset, probing never aborts on a single failed trial. Only
//! a failure of the initial connection itself is fatal, and that happens
//! before probing starts.

use crate::driver::ChargerCore;
use crate::registers::{REG_CHARGE_POINT_MODEL, REG_EV_BATTERY_STATE};
use evse_core::field::be_u32;
use evse_core::CapabilitySet;
use evse_transport::RegisterTransport;

/// Detect the register layout generation
///
/// The model-identifier block exists only on modern firmware; a failed
/// read selects the legacy layout for every subsequent field.
pub(crate) async fn detect_legacy<T: RegisterTransport>(conn: &mut T) -> bool {
    conn.read_block(REG_CHARGE_POINT_MODEL.address, REG_CHARGE_POINT_MODEL.words)
        .await
        .is_err()
}

impl<T: RegisterTransport> ChargerCore<T> {
    /// Probe which optional operations this device supports
    pub(crate) async fn probe(&self) -> CapabilitySet {
        let mut caps = CapabilitySet::none();

        // Headline power field: success with a non-sentinel raw value marks
        // the whole meter block present. Power, phase currents and the
        // energy total share one underlying register block on legacy
        // firmware and are algorithmically coupled.
        let probe = self.layout.probe_power;
        if let Ok(data) = self.read_field(&probe).await {
            if let Ok(raw) = be_u32(&data) {
                if !probe.is_unsupported(raw as u64) {
                    caps.power = true;
                    caps.phase_currents = true;
                    caps.total_energy = true;
                }
            }
        }

        // Voltage block, probed independently: all-zero means wired but
        // unpopulated and is excluded.
        if let Ok(data) = self.read_field(&self.layout.probe_voltage).await {
            if matches!(be_u32(&data), Ok(raw) if raw > 0) {
                caps.phase_voltages = true;
            }
        }

        // Battery register exists only on modern firmware; any successful
        // read marks state-of-charge present regardless of value.
        if !self.legacy && self.read_field(&REG_EV_BATTERY_STATE).await.is_ok() {
            caps.state_of_charge = true;
        }

        if self.identify().await.is_ok() {
            caps.identify = true;
        }

        log::debug!(
            "probed capabilities (legacy={}): {:?}",
            self.legacy,
            caps
        );
        caps
    }
}
