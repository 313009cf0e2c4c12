//! HTTP/JSON transport for the JSON device family

use async_trait::async_trait;
use evse_core::{EvseError, EvseResult};
use serde_json::Value;
use std::time::Duration;

/// JSON document access against one device
///
/// `path` is relative to the device base URL (e.g. `/status`,
/// `/rpc/Shelly.GetStatus`).
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn get_json(&self, path: &str) -> EvseResult<Value>;
}

/// HTTP transport settings
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Base URL without trailing slash (e.g. "http://192.168.1.50")
    pub base_url: String,
    pub timeout: Duration,
    /// Optional basic-auth credentials
    pub user: Option<String>,
    pub password: Option<String>,
}

impl HttpSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(10),
            user: None,
            password: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }
}

/// HTTP/JSON transport implementation backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpJsonTransport {
    client: reqwest::Client,
    settings: HttpSettings,
}

impl HttpJsonTransport {
    pub fn new(settings: HttpSettings) -> EvseResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| EvseError::Protocol(format!("http client: {}", e)))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl JsonTransport for HttpJsonTransport {
    async fn get_json(&self, path: &str) -> EvseResult<Value> {
        let url = format!("{}{}", self.settings.base_url, path);
        log::trace!("GET {}", url);

        let mut request = self.client.get(&url);
        if let (Some(user), Some(password)) = (&self.settings.user, &self.settings.password) {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.map_err(http_error)?;
        let response = response.error_for_status().map_err(http_error)?;
        response.json::<Value>().await.map_err(http_error)
    }
}

fn http_error(err: reqwest::Error) -> EvseError {
    if err.is_timeout() {
        EvseError::Timeout
    } else if err.is_decode() {
        EvseError::InvalidData(err.to_string())
    } else {
        EvseError::Protocol(err.to_string())
    }
}
