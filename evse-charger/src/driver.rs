//! Charger driver core: register operations against one device
//!
//! All reads and writes go through one transport connection guarded by a
//! single mutex, so a shared handle still issues operations sequentially.
//! The only state cached across reads is the capability-relevant layout
//! selection (immutable after construction) and the last successfully
//! written current limit.

use crate::registers::{
    RegisterLayout, CHARGE_POINT_STATES, REG_CHARGE_POINT_STATE, REG_EVCC_ID,
    REG_EV_BATTERY_STATE, REG_HEMS_CURRENT_LIMIT, REG_SMART_VEHICLE, REG_USER_ID,
};
use evse_core::field::{be_u16, block_string};
use evse_core::{ChargeStatus, EvseError, EvseResult, RegisterField};
use evse_transport::RegisterTransport;
use tokio::sync::Mutex;

/// Nominal phase voltage used to derive power on legacy firmware
const NOMINAL_PHASE_VOLTAGE: f64 = 230.0;

pub(crate) struct ChargerState<T> {
    pub(crate) conn: T,
    /// Last successfully written current limit in A; written back to the
    /// device when the charger is re-enabled.
    pub(crate) current: u16,
}

/// Driver core for one charge controller
///
/// Created by the composed [`crate::Charger`] handle after layout
/// detection; not constructed directly by callers.
pub struct ChargerCore<T: RegisterTransport> {
    pub(crate) state: Mutex<ChargerState<T>>,
    pub(crate) layout: &'static RegisterLayout,
    pub(crate) legacy: bool,
}

impl<T: RegisterTransport> ChargerCore<T> {
    pub(crate) fn new(conn: T, legacy: bool, layout: &'static RegisterLayout, current: u16) -> Self {
        Self {
            state: Mutex::new(ChargerState { conn, current }),
            layout,
            legacy,
        }
    }

    /// Whether the legacy register layout is in use
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    pub(crate) async fn read_field(&self, field: &RegisterField) -> EvseResult<Vec<u8>> {
        let mut state = self.state.lock().await;
        state.conn.read_block(field.address, field.words).await
    }

    /// Current charge status
    pub async fn status(&self) -> EvseResult<ChargeStatus> {
        let data = self.read_field(&REG_CHARGE_POINT_STATE).await?;
        CHARGE_POINT_STATES.map(be_u16(&data)?)
    }

    /// Whether charging is enabled (current limit register nonzero)
    pub async fn enabled(&self) -> EvseResult<bool> {
        let data = self.read_field(&REG_HEMS_CURRENT_LIMIT).await?;
        Ok(be_u16(&data)? != 0)
    }

    /// Enable or disable charging
    ///
    /// Disabling writes `0` to the shared current-limit register; enabling
    /// writes the cached limit back.
    pub async fn set_enabled(&self, enable: bool) -> EvseResult<()> {
        let mut state = self.state.lock().await;
        let amps = if enable { state.current } else { 0 };
        state
            .conn
            .write_block(REG_HEMS_CURRENT_LIMIT.address, &amps.to_be_bytes())
            .await
    }

    /// Set the charging current limit in amperes
    ///
    /// Writes the caller's requested value; the cached limit updates only
    /// after the write succeeds.
    pub async fn set_current_limit(&self, amps: u16) -> EvseResult<()> {
        let mut state = self.state.lock().await;
        state
            .conn
            .write_block(REG_HEMS_CURRENT_LIMIT.address, &amps.to_be_bytes())
            .await?;
        state.current = amps;
        Ok(())
    }

    /// Present active power in W
    pub(crate) async fn current_power(&self) -> EvseResult<f64> {
        match self.layout.active_power {
            Some(field) => {
                let data = self.read_field(&field).await?;
                field.decode(&data)
            }
            // Legacy firmware has no power register; derive from currents.
            None => {
                let [l1, l2, l3] = self.currents().await?;
                Ok(NOMINAL_PHASE_VOLTAGE * (l1 + l2 + l3))
            }
        }
    }

    /// Per-phase currents in A
    pub(crate) async fn currents(&self) -> EvseResult<[f64; 3]> {
        let field = self.layout.currents;
        let data = self.read_field(&field).await?;
        field.decode_triplet(&data)
    }

    /// Per-phase voltages in V
    pub(crate) async fn voltages(&self) -> EvseResult<[f64; 3]> {
        let field = self.layout.voltages;
        let data = self.read_field(&field).await?;
        field.decode_triplet(&data)
    }

    /// Accumulated energy in kWh
    pub(crate) async fn total_energy(&self) -> EvseResult<f64> {
        if let Some(field) = self.layout.total_energy {
            let data = self.read_field(&field).await?;
            // Wh on the wire; the field divisor yields kWh directly.
            return Ok(field.decode(&data)?);
        }
        let field = self.layout.phase_energy.ok_or_else(|| {
            EvseError::InvalidData("layout carries no energy field".to_string())
        })?;
        let data = self.read_field(&field).await?;
        let phases = field.decode_triplet(&data)?;
        // Per-phase accumulators are mWh; the triplet divisor yields Wh.
        Ok(phases.iter().sum::<f64>() / 1000.0)
    }

    /// Vehicle state of charge, 0-100
    ///
    /// Fails with [`EvseError::NotAvailable`] when no smart vehicle is
    /// detected or the register carries out-of-range telemetry; both are
    /// per-read transient conditions, not capability absence.
    pub(crate) async fn soc(&self) -> EvseResult<f64> {
        let data = self.read_field(&REG_SMART_VEHICLE).await?;
        if be_u16(&data)? != 1 {
            return Err(EvseError::NotAvailable);
        }
        let data = self.read_field(&REG_EV_BATTERY_STATE).await?;
        let soc = be_u16(&data)?;
        if soc > 100 {
            return Err(EvseError::NotAvailable);
        }
        Ok(soc as f64)
    }

    /// Vehicle or user identification
    ///
    /// Modern firmware first checks the smart-vehicle flag and prefers the
    /// vehicle-supplied identifier; a non-empty vehicle id (or a vehicle-id
    /// read error) is returned immediately. Otherwise the user/RFID block
    /// is read; an empty string is a valid "no identifier presented"
    /// result, not an error.
    pub(crate) async fn identify(&self) -> EvseResult<String> {
        if !self.legacy {
            if let Ok(flag) = self.read_field(&REG_SMART_VEHICLE).await {
                if be_u16(&flag)? != 0 {
                    match self.read_field(&REG_EVCC_ID).await {
                        Ok(data) => {
                            let id = block_string(&data);
                            if !id.is_empty() {
                                return Ok(id);
                            }
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        let data = self.read_field(&REG_USER_ID).await?;
        Ok(block_string(&data))
    }
}
