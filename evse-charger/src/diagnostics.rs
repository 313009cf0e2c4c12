//! Best-effort diagnostic dump
//!
//! Reads a fixed set of informational registers and reports whichever
//! succeed; a single register's failure never fails the whole dump.

use crate::driver::ChargerCore;
use crate::registers::{
    REG_CHARGE_POINT_MODEL, REG_EVCC_ID, REG_FIRMWARE, REG_OCPP_CP_STATUS, REG_PROTOCOL_VERSION,
    REG_SMART_VEHICLE, REG_USER_ID,
};
use evse_core::field::{be_u16, block_string};
use evse_transport::RegisterTransport;
use std::fmt;

/// Informational register snapshot; absent entries failed to read
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub legacy: bool,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub protocol_version: Option<String>,
    pub ocpp_status: Option<u16>,
    pub smart_vehicle: Option<bool>,
    pub vehicle_id: Option<String>,
    pub user_id: Option<String>,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Legacy:\t\t{}", self.legacy)?;
        if let Some(model) = &self.model {
            writeln!(f, "Model:\t\t{}", model)?;
        }
        if let Some(firmware) = &self.firmware {
            writeln!(f, "Firmware:\t{}", firmware)?;
        }
        if let Some(protocol) = &self.protocol_version {
            writeln!(f, "Protocol:\t{}", protocol)?;
        }
        if let Some(status) = self.ocpp_status {
            writeln!(f, "OCPP Status:\t{}", status)?;
        }
        if let Some(smart) = self.smart_vehicle {
            writeln!(f, "Smart Vehicle:\t{}", smart)?;
        }
        if let Some(id) = &self.vehicle_id {
            writeln!(f, "Vehicle ID:\t{}", id)?;
        }
        if let Some(id) = &self.user_id {
            writeln!(f, "User ID:\t{}", id)?;
        }
        Ok(())
    }
}

impl<T: RegisterTransport> ChargerCore<T> {
    /// Read the informational registers, keeping whatever succeeds
    pub(crate) async fn diagnose(&self) -> Diagnostics {
        let mut diag = Diagnostics {
            legacy: self.legacy,
            ..Diagnostics::default()
        };

        if !self.legacy {
            if let Ok(data) = self.read_field(&REG_CHARGE_POINT_MODEL).await {
                diag.model = Some(block_string(&data));
            }
            if let Ok(data) = self.read_field(&REG_SMART_VEHICLE).await {
                diag.smart_vehicle = be_u16(&data).ok().map(|v| v != 0);
            }
        }
        if let Ok(data) = self.read_field(&REG_FIRMWARE).await {
            diag.firmware = Some(block_string(&data));
        }
        if let Ok(data) = self.read_field(&REG_PROTOCOL_VERSION).await {
            diag.protocol_version = Some(block_string(&data));
        }
        if let Ok(data) = self.read_field(&REG_OCPP_CP_STATUS).await {
            diag.ocpp_status = be_u16(&data).ok();
        }
        if let Ok(data) = self.read_field(&REG_EVCC_ID).await {
            diag.vehicle_id = Some(block_string(&data));
        }
        if let Ok(data) = self.read_field(&REG_USER_ID).await {
            diag.user_id = Some(block_string(&data));
        }

        diag
    }
}
