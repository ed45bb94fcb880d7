use std::fs;
use std::path::Path;

use lightlink_api::GoveeClient;

use crate::configs;

pub const EXIT_OK: u8 = 0;
pub const EXIT_CLIENT: u8 = 1;
pub const EXIT_REQUEST: u8 = 2;
pub const EXIT_WRITE: u8 = 3;

/// Builds a client from `govee` and saves its device listing to `out`.
pub async fn fetch_devices(govee: &configs::Govee, out: &Path) -> u8 {
    match GoveeClient::new(&govee.api_key, govee.endpoints()) {
        Ok(client) => fetch_and_save(&client, out).await,
        Err(e) => {
            tracing::error!("{}", e);
            EXIT_CLIENT
        }
    }
}

/// Prints the raw listing pretty-formatted and writes the same text to `out`.
/// Keys keep the order the vendor sent them in.
pub async fn fetch_and_save(client: &GoveeClient, out: &Path) -> u8 {
    tracing::info!("GET {}", client.endpoints().devices_url);

    let body = match client.fetch_devices_raw().await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("HTTP request failed: {}", e);
            return EXIT_REQUEST;
        }
    };

    let pretty = match serde_json::to_string_pretty(&body) {
        Ok(pretty) => pretty,
        Err(e) => {
            tracing::error!("Failed to format response: {}", e);
            return EXIT_REQUEST;
        }
    };

    println!("{pretty}");

    if let Err(e) = fs::write(out, &pretty) {
        tracing::error!("Failed to write {}: {}", out.display(), e);
        return EXIT_WRITE;
    }

    println!("Wrote response to {}", out.display());

    EXIT_OK
}

#[cfg(test)]
mod tests {
    use lightlink_api::client::Endpoints;
    use lightlink_mock::MockGovee;
    use lightlink_mock::settings::MockDevice;
    use mockito::Server;

    use super::*;

    fn govee(api_key: &str, endpoints: Endpoints) -> configs::Govee {
        configs::Govee {
            api_key: api_key.to_string(),
            devices: None,
            allowed_model: "H6006".to_string(),
            devices_url: endpoints.devices_url,
            control_url: endpoints.control_url,
        }
    }

    async fn spawn_mock() -> String {
        let mock = MockGovee::new(
            "key",
            vec![MockDevice {
                device: "AA:BB:CC:DD:EE:FF:00:11".to_string(),
                sku: "H6006".to_string(),
                device_name: "Bedroom Lamp".to_string(),
            }],
        );
        let address = mock.spawn(([127, 0, 0, 1], 0).into()).await.unwrap();

        format!("http://{address}")
    }

    #[tokio::test]
    async fn test_writes_listing_in_vendor_key_order() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/router/api/v1/user/devices")
            .with_status(200)
            .with_body(r#"{"code":200,"message":"success","data":[{"sku":"H6006","device":"AA"}]}"#)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("devices.json");

        let code = fetch_devices(&govee("key", Endpoints::with_base(&server.url())), &out).await;

        assert_eq!(code, EXIT_OK);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            r#"{
  "code": 200,
  "message": "success",
  "data": [
    {
      "sku": "H6006",
      "device": "AA"
    }
  ]
}"#
        );
    }

    #[tokio::test]
    async fn test_saved_file_matches_mock_listing() {
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("devices.json");

        let code = fetch_devices(&govee("key", Endpoints::with_base(&base)), &out).await;
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();

        assert_eq!(code, EXIT_OK);
        assert_eq!(saved["data"][0]["device"], "AA:BB:CC:DD:EE:FF:00:11");
        assert_eq!(saved["data"][0]["deviceName"], "Bedroom Lamp");
    }

    #[tokio::test]
    async fn test_missing_key_exits_with_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("devices.json");

        let code = fetch_devices(&govee("  ", Endpoints::default()), &out).await;

        assert_eq!(code, EXIT_CLIENT);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_wrong_key_exits_with_request_error() {
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("devices.json");

        let code = fetch_devices(&govee("wrong", Endpoints::with_base(&base)), &out).await;

        assert_eq!(code, EXIT_REQUEST);
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_exits_with_write_error() {
        let base = spawn_mock().await;
        let dir = tempfile::tempdir().unwrap();

        let code = fetch_devices(&govee("key", Endpoints::with_base(&base)), dir.path()).await;

        assert_eq!(code, EXIT_WRITE);
    }
}
