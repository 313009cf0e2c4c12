//! Per-model energy unit quirks for generation-1 firmware
//!
//! Gen-1 devices report their accumulated `total` in a model-dependent
//! unit: dedicated energy meters already count Wh, relay devices count
//! watt-minutes, and the first-generation switch has no meter at all.

/// How a model's accumulated energy maps to Wh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyQuirk {
    /// Counter is already in Wh
    PassThrough,
    /// Counter must be divided by the given factor to reach Wh
    Divide(f64),
    /// Device has no metering hardware; energy is a constant zero
    NoMeter,
}

impl EnergyQuirk {
    /// Convert a raw counter value to Wh
    pub fn apply(&self, raw: f64) -> f64 {
        match self {
            EnergyQuirk::PassThrough => raw,
            EnergyQuirk::Divide(factor) => raw / factor,
            EnergyQuirk::NoMeter => 0.0,
        }
    }
}

/// Model-keyed quirk lookup with a fallback for unlisted models
pub struct QuirkTable {
    entries: &'static [(&'static str, EnergyQuirk)],
    default: EnergyQuirk,
}

/// Dedicated energy meters count Wh natively; everything else counts
/// watt-minutes unless listed as meterless.
static GEN1_QUIRKS: &[(&str, EnergyQuirk)] = &[
    ("SHEM", EnergyQuirk::PassThrough),
    ("SHEM-3", EnergyQuirk::PassThrough),
    ("SHSW-1", EnergyQuirk::NoMeter),
];

impl Default for QuirkTable {
    fn default() -> Self {
        Self {
            entries: GEN1_QUIRKS,
            default: EnergyQuirk::Divide(60.0),
        }
    }
}

impl QuirkTable {
    /// Quirk for the given model string
    pub fn lookup(&self, model: &str) -> EnergyQuirk {
        self.entries
            .iter()
            .find(|(m, _)| *m == model)
            .map(|(_, q)| *q)
            .unwrap_or(self.default)
    }
}
