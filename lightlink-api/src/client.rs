use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Command, ControlRequest, Device, devices_from_value};
use crate::{API_KEY_HEADER, GOVEE_CONTROL_URL, GOVEE_DEVICES_URL};

const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const CONTROL_TIMEOUT: Duration = Duration::from_secs(8);

/// Operations the bridge needs from a light vendor.
#[async_trait]
pub trait LightApi: Send + Sync {
    /// Lists the devices registered on the account.
    async fn list_devices(&self) -> Result<Vec<Device>>;

    /// Sends a single command to one device.
    async fn control(&self, device: &Device, cmd: Command) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub devices_url: String,
    pub control_url: String,
}

impl Endpoints {
    /// Both endpoints rooted at `base`, used against local mocks.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');

        Self {
            devices_url: format!("{base}/router/api/v1/user/devices"),
            control_url: format!("{base}/v1/devices/control"),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            devices_url: GOVEE_DEVICES_URL.to_string(),
            control_url: GOVEE_CONTROL_URL.to_string(),
        }
    }
}

pub struct GoveeClient {
    http: Client,
    endpoints: Endpoints,
}

impl GoveeClient {
    pub fn new(api_key: &str, endpoints: Endpoints) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self { http, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Raw listing response, as returned by the vendor.
    pub async fn fetch_devices_raw(&self) -> Result<Value> {
        let response = self
            .http
            .get(&self.endpoints.devices_url)
            .timeout(LIST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LightApi for GoveeClient {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        let body = self.fetch_devices_raw().await?;

        devices_from_value(&body)
    }

    async fn control(&self, device: &Device, cmd: Command) -> Result<()> {
        let response = self
            .http
            .put(&self.endpoints.control_url)
            .timeout(CONTROL_TIMEOUT)
            .json(&ControlRequest::new(device, cmd))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Status { status, body })
            }
        }
    }
}
