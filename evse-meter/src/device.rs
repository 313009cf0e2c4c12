//! Device identity document (`GET /shelly`)

use serde::Deserialize;

/// Identity reported by the device's discovery endpoint
///
/// Generation-1 firmware reports its model under `type` and omits `gen`;
/// generation 2+ reports `model` and `gen` explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "type")]
    pub model: String,
    #[serde(default)]
    pub gen: u8,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub auth_en: bool,
}

impl DeviceInfo {
    /// Document generation, with absent `gen` meaning generation 1
    pub fn generation(&self) -> u8 {
        self.gen.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen2_device_info() {
        let doc = r#"{"name":null,"id":"shellypro3em-fce8c0dba900","mac":"FCE8C0DBA900","slot":1,"model":"SPEM-003CEBEU","gen":2,"fw_id":"20241011-114455/1.4.4-g6d2a586","ver":"1.4.4","app":"Pro3EM","auth_en":false,"auth_domain":null,"profile":"monophase"}"#;
        let info: DeviceInfo = serde_json::from_str(doc).unwrap();

        assert_eq!(info.app, "Pro3EM");
        assert_eq!(info.profile, "monophase");
        assert_eq!(info.model, "SPEM-003CEBEU");
        assert_eq!(info.generation(), 2);
    }

    #[test]
    fn test_gen1_device_info_uses_type_field() {
        let doc = r#"{"type":"SHSW-PM","mac":"84CCA8AABBCC","auth":false,"fw":"20221108-153925/v1.12.1","num_outputs":1,"num_meters":1}"#;
        let info: DeviceInfo = serde_json::from_str(doc).unwrap();

        assert_eq!(info.model, "SHSW-PM");
        assert_eq!(info.generation(), 1);
    }
}
