//! Generation-1 status document (`GET /status`)
//!
//! Gen-1 firmware exposes a flat `meters[]` array (relay devices) or an
//! `emeters[]` array (dedicated energy meters). The accumulated `total`
//! is in a model-dependent unit and must go through the quirk table.

use serde::Deserialize;

/// Gen-1 status response, reduced to the metering channels
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1Status {
    #[serde(default)]
    pub meters: Vec<Gen1Meter>,
    #[serde(default)]
    pub emeters: Vec<Gen1EMeter>,
}

/// Relay-device metering channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1Meter {
    #[serde(default)]
    pub power: f64,
    /// Accumulated total in the model's native unit; absent on devices
    /// without metering hardware.
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub is_valid: bool,
}

/// Energy-meter channel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Gen1EMeter {
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub voltage: f64,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub total_returned: f64,
    #[serde(default)]
    pub is_valid: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_channel() {
        let doc = r#"{"relays":[{"ison":false}],"meters":[{"power":4711.12,"overpower":0.00,"is_valid":true,"timestamp":1676138370,"counters":[0.000, 0.000, 0.000],"total":6472513}],"uptime":17284290}"#;
        let status: Gen1Status = serde_json::from_str(doc).unwrap();

        assert_eq!(status.meters.len(), 1);
        assert_eq!(status.meters[0].power, 4711.12);
        assert_eq!(status.meters[0].total, Some(6472513.0));
        assert!(status.emeters.is_empty());
    }

    #[test]
    fn test_meter_without_total() {
        let doc = r#"{"meters":[{"power":81.5,"is_valid":true}]}"#;
        let status: Gen1Status = serde_json::from_str(doc).unwrap();

        assert_eq!(status.meters[0].power, 81.5);
        assert_eq!(status.meters[0].total, None);
    }

    #[test]
    fn test_emeter_channels() {
        let doc = r#"{"emeters":[{"power":-620.34,"reactive":714.48,"pf":-0.66,"voltage":235.68,"is_valid":true,"total":401472.9,"total_returned":653673.7},{"power":0.00,"reactive":0.00,"pf":0.00,"voltage":235.68,"is_valid":true,"total":173411.3,"total_returned":294.2}]}"#;
        let status: Gen1Status = serde_json::from_str(doc).unwrap();

        assert_eq!(status.emeters.len(), 2);
        assert_eq!(status.emeters[0].power, -620.34);
        assert_eq!(status.emeters[0].total, Some(401472.9));
        assert_eq!(status.emeters[0].voltage, 235.68);
    }
}
