//! Composed meter handle over the JSON transport
//!
//! Connecting fetches the identity document once, selects the
//! generation-appropriate status endpoint and quirk key, and keeps both
//! for the life of the handle. Every subsequent read fetches one status
//! document and normalizes it.

use crate::device::DeviceInfo;
use crate::normalize::Normalizer;
use crate::quirk::QuirkTable;
use evse_core::{CanonicalReading, EvseError, EvseResult};
use evse_transport::{HttpJsonTransport, HttpSettings, JsonTransport};

const GEN1_STATUS_PATH: &str = "/status";
const GEN2_STATUS_PATH: &str = "/rpc/Shelly.GetStatus";
const IDENTITY_PATH: &str = "/shelly";

/// One JSON-family metering device
pub struct Meter<T: JsonTransport> {
    conn: T,
    info: DeviceInfo,
    normalizer: Normalizer,
    status_path: &'static str,
}

impl<T: JsonTransport> Meter<T> {
    /// Connect to a device: fetch its identity and fix generation, model
    /// and quirk handling for the life of the handle
    pub async fn connect(conn: T) -> EvseResult<Self> {
        let doc = conn.get_json(IDENTITY_PATH).await?;
        let info: DeviceInfo = serde_json::from_value(doc)?;

        let generation = info.generation();
        let status_path = if generation <= 1 {
            GEN1_STATUS_PATH
        } else {
            GEN2_STATUS_PATH
        };
        log::debug!(
            "meter {} model {} generation {}",
            info.id.as_deref().unwrap_or("<unnamed>"),
            info.model,
            generation
        );

        let normalizer = Normalizer::new(info.model.clone(), generation, QuirkTable::default());
        Ok(Self {
            conn,
            info,
            normalizer,
            status_path,
        })
    }

    /// Identity reported by the device at connect time
    pub fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn generation(&self) -> u8 {
        self.normalizer.generation()
    }

    /// Fetch and normalize one status document
    pub async fn reading(&self) -> EvseResult<CanonicalReading> {
        let doc = self.conn.get_json(self.status_path).await?;
        self.normalizer.normalize(&doc)
    }

    /// Present active power in W
    pub async fn current_power(&self) -> EvseResult<f64> {
        self.reading().await?.power.ok_or(EvseError::NotAvailable)
    }

    /// Accumulated energy in kWh
    pub async fn total_energy(&self) -> EvseResult<f64> {
        self.reading()
            .await?
            .total_energy
            .ok_or(EvseError::NotAvailable)
    }
}

/// Builder for a meter over the bundled HTTP transport
pub struct MeterBuilder {
    settings: HttpSettings,
}

impl MeterBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            settings: HttpSettings::new(base_url),
        }
    }

    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.settings = self.settings.with_timeout(timeout);
        self
    }

    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.settings = self.settings.with_basic_auth(user, password);
        self
    }

    pub async fn connect(self) -> EvseResult<Meter<HttpJsonTransport>> {
        let conn = HttpJsonTransport::new(self.settings)?;
        Meter::connect(conn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct FakeDevice {
        documents: HashMap<&'static str, Value>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeDevice {
        fn new(identity: Value, status_path: &'static str, status: Value) -> Self {
            let mut documents = HashMap::new();
            documents.insert(IDENTITY_PATH, identity);
            documents.insert(status_path, status);
            Self {
                documents,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl JsonTransport for FakeDevice {
        async fn get_json(&self, path: &str) -> EvseResult<Value> {
            self.requests.lock().unwrap().push(path.to_string());
            self.documents
                .get(path)
                .cloned()
                .ok_or_else(|| EvseError::Protocol(format!("404 {}", path)))
        }
    }

    #[tokio::test]
    async fn test_gen1_meter_reads_status_endpoint() {
        let device = FakeDevice::new(
            json!({"type": "SHSW-PM", "mac": "84CCA8AABBCC", "auth": false}),
            GEN1_STATUS_PATH,
            json!({"meters": [{"power": 4711.12, "is_valid": true, "total": 6472513}]}),
        );
        let requests = device.requests.clone();

        let meter = Meter::connect(device).await.unwrap();
        assert_eq!(meter.generation(), 1);
        assert_eq!(meter.device_info().model, "SHSW-PM");

        let reading = meter.reading().await.unwrap();
        assert_eq!(reading.power, Some(4711.12));
        assert!((reading.total_energy.unwrap() - 107.87521666666666).abs() < 1e-9);

        let log = requests.lock().unwrap();
        assert_eq!(*log, vec![IDENTITY_PATH, GEN1_STATUS_PATH]);
    }

    #[tokio::test]
    async fn test_gen2_meter_reads_rpc_endpoint() {
        let device = FakeDevice::new(
            json!({"id": "shellypro3em-fce8c0dba900", "model": "SPEM-003CEBEU",
                   "gen": 2, "app": "Pro3EM", "profile": "triphase"}),
            GEN2_STATUS_PATH,
            json!({
                "em1:0": {"current": 3.705, "voltage": 242.8, "act_power": 598.9},
                "em1:1": {"current": 0.194, "voltage": 242.8, "act_power": 0.0},
                "em1:2": {"current": 0.027, "voltage": 242.8, "act_power": 0.0},
                "em1data:0": {"total_act_energy": 3458.24},
                "em1data:1": {"total_act_energy": 2768.67},
                "em1data:2": {"total_act_energy": 3.09},
            }),
        );

        let meter = Meter::connect(device).await.unwrap();
        assert_eq!(meter.generation(), 2);

        assert_eq!(meter.current_power().await.unwrap(), 598.9);
        let reading = meter.reading().await.unwrap();
        assert_eq!(reading.currents, Some([3.705, 0.194, 0.027]));
    }

    #[tokio::test]
    async fn test_channel_free_document_has_no_power() {
        let device = FakeDevice::new(
            json!({"model": "SNSN-0013A", "gen": 2}),
            GEN2_STATUS_PATH,
            json!({"ble": {}, "cloud": {"connected": false}}),
        );

        let meter = Meter::connect(device).await.unwrap();
        assert!(matches!(
            meter.current_power().await,
            Err(EvseError::NotAvailable)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_identity_fails_connect() {
        let device = FakeDevice {
            documents: HashMap::new(),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        assert!(Meter::connect(device).await.is_err());
    }
}
