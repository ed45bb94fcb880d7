pub mod client;
pub mod error;
pub mod models;

pub use client::{GoveeClient, LightApi};
pub use error::{DeviceError, Error, Result};

/// Control endpoint of the Govee developer API.
pub const GOVEE_CONTROL_URL: &str = "https://developer-api.govee.com/v1/devices/control";

/// Device listing endpoint of the Govee Open API.
pub const GOVEE_DEVICES_URL: &str = "https://openapi.api.govee.com/router/api/v1/user/devices";

/// Header carrying the account key on every request (`Govee-API-Key`).
pub const API_KEY_HEADER: &str = "govee-api-key";
