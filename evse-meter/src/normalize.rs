//! Generation normalizer: per-generation document shapes to one record
//!
//! The normalizer is constructed once per device with the model id,
//! the generation, and an explicit quirk table, then maps whatever
//! status document the firmware serves into a [`CanonicalReading`].
//! Channels absent from the document stay `None` so callers can tell
//! "reports zero" from "this shape does not carry the channel".

use crate::gen1::Gen1Status;
use crate::gen2::{Gen2Em, Gen2EmData, Gen2Status};
use crate::quirk::{EnergyQuirk, QuirkTable};
use evse_core::{CanonicalReading, EvseResult};
use serde_json::Value;

/// Maps raw status documents of one device into canonical readings
pub struct Normalizer {
    model: String,
    generation: u8,
    quirks: QuirkTable,
}

impl Normalizer {
    pub fn new(model: impl Into<String>, generation: u8, quirks: QuirkTable) -> Self {
        Self {
            model: model.into(),
            generation,
            quirks,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Normalize one raw status document
    pub fn normalize(&self, doc: &Value) -> EvseResult<CanonicalReading> {
        if self.generation <= 1 {
            let status: Gen1Status = serde_json::from_value(doc.clone())?;
            Ok(self.normalize_gen1(&status))
        } else {
            let status: Gen2Status = serde_json::from_value(doc.clone())?;
            Ok(self.normalize_gen2(&status))
        }
    }

    fn normalize_gen1(&self, status: &Gen1Status) -> CanonicalReading {
        let quirk = self.quirks.lookup(&self.model);
        let mut reading = CanonicalReading::default();

        if let Some(emeter) = status.emeters.first() {
            reading.power = Some(emeter.power);
            reading.voltages = Some([emeter.voltage, 0.0, 0.0]);
            reading.total_energy = gen1_energy(quirk, emeter.total);
        } else if let Some(meter) = status.meters.first() {
            reading.power = Some(meter.power);
            reading.total_energy = gen1_energy(quirk, meter.total);
        }
        reading
    }

    fn normalize_gen2(&self, status: &Gen2Status) -> CanonicalReading {
        let mut reading = CanonicalReading::default();

        let channels: Vec<&Gen2Em> = [&status.em0, &status.em1, &status.em2]
            .into_iter()
            .flatten()
            .collect();
        if !channels.is_empty() {
            let mut currents = [0.0; 3];
            let mut voltages = [0.0; 3];
            for (i, em) in channels.iter().enumerate().take(3) {
                currents[i] = em.current;
                voltages[i] = em.voltage;
            }
            reading.power = Some(channels.iter().map(|em| em.act_power).sum());
            reading.currents = Some(currents);
            reading.voltages = Some(voltages);
            let data: Vec<&Gen2EmData> = [&status.em0_data, &status.em1_data, &status.em2_data]
                .into_iter()
                .flatten()
                .collect();
            if !data.is_empty() {
                let wh: f64 = data.iter().map(|d| d.total_act_energy).sum();
                reading.total_energy = Some(wh / 1000.0);
            }
            return reading;
        }

        if let Some(pm) = &status.pm0 {
            reading.power = Some(pm.apower);
            reading.currents = Some([pm.current, 0.0, 0.0]);
            reading.voltages = Some([pm.voltage, 0.0, 0.0]);
            reading.total_energy = Some(pm.aenergy.total / 1000.0);
            return reading;
        }

        if let Some(switch) = &status.switch0 {
            reading.power = Some(switch.apower);
            reading.currents = Some([switch.current, 0.0, 0.0]);
            reading.voltages = Some([switch.voltage, 0.0, 0.0]);
            reading.total_energy = Some(switch.aenergy.total / 1000.0);
        }
        reading
    }
}

/// Gen-1 accumulated energy in kWh
///
/// A meterless model reads as a hard zero even when the schema carries a
/// counter; a present counter goes through the model quirk to reach Wh,
/// then down to kWh. An absent counter stays absent.
fn gen1_energy(quirk: EnergyQuirk, total: Option<f64>) -> Option<f64> {
    match (quirk, total) {
        (EnergyQuirk::NoMeter, _) => Some(0.0),
        (_, Some(raw)) => Some(quirk.apply(raw) / 1000.0),
        (_, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gen1_relay_doc() -> Value {
        json!({
            "relays": [{"ison": false}],
            "meters": [{"power": 4711.12, "is_valid": true, "total": 6472513}],
        })
    }

    #[test]
    fn test_relay_total_goes_through_watt_minute_quirk() {
        let norm = Normalizer::new("SHSW-PM", 1, QuirkTable::default());
        let reading = norm.normalize(&gen1_relay_doc()).unwrap();

        assert_eq!(reading.power, Some(4711.12));
        // 6472513 Wmin / 60 = 107875.2167 Wh
        let kwh = reading.total_energy.unwrap();
        assert!((kwh - 107.87521666666666).abs() < 1e-9);
        assert!(reading.currents.is_none());
        assert!(reading.voltages.is_none());
    }

    #[test]
    fn test_meterless_model_reads_zero_energy() {
        let norm = Normalizer::new("SHSW-1", 1, QuirkTable::default());
        let reading = norm.normalize(&gen1_relay_doc()).unwrap();
        assert_eq!(reading.total_energy, Some(0.0));
    }

    #[test]
    fn test_energy_meter_passes_through() {
        let doc = json!({
            "emeters": [
                {"power": -620.34, "voltage": 235.68, "is_valid": true,
                 "total": 401472.9, "total_returned": 653673.7},
            ],
        });
        let norm = Normalizer::new("SHEM", 1, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.power, Some(-620.34));
        assert!((reading.total_energy.unwrap() - 401.4729).abs() < 1e-9);
        assert_eq!(reading.voltages, Some([235.68, 0.0, 0.0]));
    }

    #[test]
    fn test_missing_total_stays_absent() {
        let doc = json!({"meters": [{"power": 81.5, "is_valid": true}]});
        let norm = Normalizer::new("SHPLG-S", 1, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.power, Some(81.5));
        assert!(reading.total_energy.is_none());
    }

    #[test]
    fn test_gen2_switch_channel() {
        let doc = json!({
            "switch:0": {"output": true, "apower": 47.11, "voltage": 232.0,
                         "current": 0.203, "aenergy": {"total": 5125.0}},
        });
        let norm = Normalizer::new("SNSW-001P16EU", 2, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.power, Some(47.11));
        assert_eq!(reading.currents, Some([0.203, 0.0, 0.0]));
        assert_eq!(reading.voltages, Some([232.0, 0.0, 0.0]));
        assert_eq!(reading.total_energy, Some(5.125));
    }

    #[test]
    fn test_gen2_power_monitor_channel() {
        let doc = json!({
            "pm1:0": {"voltage": 239.9, "current": 7.434, "apower": 1780.1,
                      "aenergy": {"total": 3551.682}},
        });
        let norm = Normalizer::new("S3PM-001PCEU16", 3, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.power, Some(1780.1));
        assert_eq!(reading.currents, Some([7.434, 0.0, 0.0]));
        assert!((reading.total_energy.unwrap() - 3.551682).abs() < 1e-9);
    }

    #[test]
    fn test_gen2_em_channels_take_priority() {
        let doc = json!({
            "switch:0": {"output": false},
            "em1:0": {"current": 3.705, "voltage": 242.8, "act_power": 598.9},
            "em1:1": {"current": 0.194, "voltage": 242.8, "act_power": 0.0},
            "em1:2": {"current": 0.027, "voltage": 242.8, "act_power": 0.0},
            "em1data:0": {"total_act_energy": 3458.24, "total_act_ret_energy": 1605.24},
            "em1data:1": {"total_act_energy": 2768.67, "total_act_ret_energy": 25.49},
            "em1data:2": {"total_act_energy": 3.09, "total_act_ret_energy": 0.71},
        });
        let norm = Normalizer::new("SPEM-003CEBEU", 2, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.power, Some(598.9));
        assert_eq!(reading.currents, Some([3.705, 0.194, 0.027]));
        let kwh = reading.total_energy.unwrap();
        assert!((kwh - 6.23).abs() < 1e-9);
    }

    #[test]
    fn test_gen2_monophase_em_fills_first_slot() {
        let doc = json!({
            "em1:0": {"current": 1.473, "voltage": 226.9, "act_power": 332.2},
            "em1data:0": {"total_act_energy": 1264.15, "total_act_ret_energy": 0.0},
        });
        let norm = Normalizer::new("SPEM-002CEBEU50", 2, QuirkTable::default());
        let reading = norm.normalize(&doc).unwrap();

        assert_eq!(reading.currents, Some([1.473, 0.0, 0.0]));
        assert_eq!(reading.voltages, Some([226.9, 0.0, 0.0]));
    }

    #[test]
    fn test_empty_document_carries_nothing() {
        let norm = Normalizer::new("SPEM-003CEBEU", 2, QuirkTable::default());
        let reading = norm.normalize(&json!({"ble": {}})).unwrap();
        assert_eq!(reading, CanonicalReading::default());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let doc = gen1_relay_doc();
        let norm = Normalizer::new("SHSW-PM", 1, QuirkTable::default());
        let first = norm.normalize(&doc).unwrap();
        let second = norm.normalize(&doc).unwrap();
        assert_eq!(first, second);
    }
}
