use std::sync::Arc;
use std::time::Duration;

use lightlink_api::GoveeClient;
use lightlink_api::client::Endpoints;
use lightlink_api::models::Device;
use lightlink_bridge::bridge::Bridge;
use lightlink_bridge::services::{Cooldown, Dispatcher, TriggerWords};
use lightlink_mock::MockGovee;
use lightlink_mock::settings::MockDevice;

pub const API_KEY: &str = "integration-key";

pub struct MockApp {
    pub govee: MockGovee,
    pub base_url: String,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_govee(MockGovee::new(API_KEY, Self::devices())).await
    }

    pub async fn with_govee(govee: MockGovee) -> Self {
        let address = govee
            .spawn(([127, 0, 0, 1], 0).into())
            .await
            .unwrap();

        Self {
            govee,
            base_url: format!("http://{address}"),
        }
    }

    pub fn devices() -> Vec<MockDevice> {
        vec![
            MockDevice {
                device: "AA:BB:CC:DD:EE:FF:00:11".to_string(),
                sku: "H6006".to_string(),
                device_name: "Bedroom Lamp".to_string(),
            },
            MockDevice {
                device: "AA:BB:CC:DD:EE:FF:00:22".to_string(),
                sku: "h6006".to_string(),
                device_name: "Bedside Lamp".to_string(),
            },
            MockDevice {
                device: "AA:BB:CC:DD:EE:FF:00:33".to_string(),
                sku: "H6199".to_string(),
                device_name: "TV Backlight".to_string(),
            },
        ]
    }

    pub fn client(&self) -> Arc<GoveeClient> {
        self.client_with_key(API_KEY)
    }

    pub fn client_with_key(&self, key: &str) -> Arc<GoveeClient> {
        Arc::new(GoveeClient::new(key, Endpoints::with_base(&self.base_url)).unwrap())
    }

    pub fn bridge(&self, devices: Vec<Device>, cooldown: Duration) -> Bridge<GoveeClient> {
        Bridge::new(
            Dispatcher::new(self.client(), devices),
            Cooldown::new(cooldown),
            TriggerWords::default(),
        )
    }
}
