//! Generation-2+ status document (`GET /rpc/Shelly.GetStatus`)
//!
//! Gen-2 firmware keys each channel as its own object: a combined
//! switch+energy channel (`switch:0`), a single-phase power-monitor
//! channel (`pm1:0`), or independent multi-phase energy-meter channels
//! (`em1:N` realtime plus `em1data:N` accumulation). All quantities are
//! already in canonical units; no quirk table applies.

use serde::Deserialize;

/// Gen-2+ status response, reduced to the metering channels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2Status {
    #[serde(default, rename = "switch:0")]
    pub switch0: Option<Gen2Switch>,
    #[serde(default, rename = "pm1:0")]
    pub pm0: Option<Gen2Pm>,
    #[serde(default, rename = "em1:0")]
    pub em0: Option<Gen2Em>,
    #[serde(default, rename = "em1:1")]
    pub em1: Option<Gen2Em>,
    #[serde(default, rename = "em1:2")]
    pub em2: Option<Gen2Em>,
    #[serde(default, rename = "em1data:0")]
    pub em0_data: Option<Gen2EmData>,
    #[serde(default, rename = "em1data:1")]
    pub em1_data: Option<Gen2EmData>,
    #[serde(default, rename = "em1data:2")]
    pub em2_data: Option<Gen2EmData>,
}

/// Combined switch + energy channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2Switch {
    #[serde(default)]
    pub output: bool,
    #[serde(default)]
    pub apower: f64,
    #[serde(default)]
    pub voltage: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub aenergy: Gen2Energy,
}

/// Single-phase power-monitor channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2Pm {
    #[serde(default)]
    pub apower: f64,
    #[serde(default)]
    pub voltage: f64,
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub aenergy: Gen2Energy,
}

/// Accumulated-energy sub-object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2Energy {
    #[serde(default)]
    pub total: f64,
}

/// Multi-phase realtime channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2Em {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub voltage: f64,
    #[serde(default)]
    pub act_power: f64,
}

/// Multi-phase accumulation channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen2EmData {
    #[serde(default)]
    pub total_act_energy: f64,
    #[serde(default)]
    pub total_act_ret_energy: f64,
}
