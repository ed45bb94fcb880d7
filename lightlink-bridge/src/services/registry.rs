use lightlink_api::LightApi;
use lightlink_api::models::{Device, parse_device_list};

use crate::errors::{BridgeError, Result};

/// Restricts control to a single model code so that other lights on the
/// account (TV backlights and the like) are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFilter {
    allowed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub kept: Vec<Device>,
    pub ignored: usize,
}

impl ModelFilter {
    /// An empty model disables filtering.
    pub fn new(allowed_model: &str) -> Self {
        let allowed = allowed_model.trim().to_uppercase();

        Self {
            allowed: (!allowed.is_empty()).then_some(allowed),
        }
    }

    pub fn allowed_model(&self) -> Option<&str> {
        self.allowed.as_deref()
    }

    pub fn allows(&self, device: &Device) -> bool {
        match &self.allowed {
            Some(model) => device.model.trim().to_uppercase() == *model,
            None => true,
        }
    }

    pub fn apply(&self, devices: Vec<Device>) -> FilterOutcome {
        let total = devices.len();
        let kept: Vec<Device> = devices.into_iter().filter(|device| self.allows(device)).collect();

        FilterOutcome {
            ignored: total - kept.len(),
            kept,
        }
    }
}

/// Parses the configured device list, warning about every rejected entry.
pub fn configured_devices(raw: Option<&str>) -> Vec<Device> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let parsed = parse_device_list(raw);
    for rejected in &parsed.rejected {
        tracing::warn!("Skipping malformed device entry {:?}: {}", rejected.entry, rejected.reason);
    }

    parsed.devices
}

/// Resolves the set of lights the bridge will drive.
///
/// Configured entries win; discovery through `api` is only attempted when
/// none parse. Ending up with no candidates at all is fatal, while a filter
/// that removes every candidate only produces a warning.
pub async fn resolve_devices<A>(raw: Option<&str>, filter: &ModelFilter, api: &A) -> Result<Vec<Device>>
where
    A: LightApi + ?Sized,
{
    let mut devices = configured_devices(raw);

    if devices.is_empty() {
        tracing::info!("GOVEE_DEVICES empty; trying Govee API to discover devices");

        devices = match api.list_devices().await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Could not fetch devices from Govee API: {}", e);
                Vec::new()
            }
        };

        if devices.is_empty() {
            return Err(BridgeError::NoDevices);
        }

        tracing::info!("Fetched {} devices from API", devices.len());
    }

    let outcome = filter.apply(devices);

    match filter.allowed_model() {
        Some(model) if outcome.ignored > 0 => tracing::info!(
            "Filtered devices to only model {}: {} kept, {} ignored",
            model,
            outcome.kept.len(),
            outcome.ignored
        ),
        Some(_) => {}
        None => tracing::info!("ALLOWED_MODEL not set; not filtering devices"),
    }

    if outcome.kept.is_empty() {
        tracing::warn!(
            "No devices of model {} found; bridge will run without sending Govee commands",
            filter.allowed_model().unwrap_or("*")
        );
    }

    Ok(outcome.kept)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use lightlink_api::models::Command;

    use super::*;

    struct StaticApi {
        devices: Option<Vec<Device>>,
        calls: AtomicUsize,
    }

    impl StaticApi {
        fn new(devices: Option<Vec<Device>>) -> Self {
            Self {
                devices,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LightApi for StaticApi {
        async fn list_devices(&self) -> lightlink_api::Result<Vec<Device>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.devices
                .clone()
                .ok_or_else(|| lightlink_api::Error::UnexpectedShape("offline".to_string()))
        }

        async fn control(&self, _device: &Device, _cmd: Command) -> lightlink_api::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_filter_keeps_allowed_model_only() {
        let devices = configured_devices(Some("aa:bb:cc:dd:ee:ff:H6006;11:22:33:44:55:66:H6100"));
        let outcome = ModelFilter::new("H6006").apply(devices);

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(outcome.ignored, 1);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = ModelFilter::new(" h6006 ");

        assert_eq!(filter.allowed_model(), Some("H6006"));
        assert!(filter.allows(&Device::new("aa:bb:cc:dd:ee:ff", "h6006")));
        assert!(!filter.allows(&Device::new("aa:bb:cc:dd:ee:ff", "H6100")));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ModelFilter::new("");
        let devices = vec![
            Device::new("aa:bb:cc:dd:ee:ff", "H6006"),
            Device::new("11:22:33:44:55:66", "H6100"),
        ];

        let outcome = filter.apply(devices.clone());

        assert_eq!(filter.allowed_model(), None);
        assert_eq!(outcome.kept, devices);
        assert_eq!(outcome.ignored, 0);
    }

    #[tokio::test]
    async fn test_configured_devices_skip_discovery() {
        let api = StaticApi::new(Some(vec![Device::new("00:00:00:00:00:00", "H6006")]));

        let devices = resolve_devices(
            Some("aa:bb:cc:dd:ee:ff:H6006;11:22:33:44:55:66:H6100"),
            &ModelFilter::new("H6006"),
            &api,
        )
        .await
        .unwrap();

        assert_eq!(devices, vec![Device::new("aa:bb:cc:dd:ee:ff", "H6006")]);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_discovery_when_list_is_malformed() {
        let api = StaticApi::new(Some(vec![
            Device::new("AA:BB:CC:DD:EE:FF:00:11", "H6006"),
            Device::new("AA:BB:CC:DD:EE:FF:00:22", "H6199"),
        ]));

        let devices = resolve_devices(Some("not-a-device"), &ModelFilter::new("H6006"), &api)
            .await
            .unwrap();

        assert_eq!(devices, vec![Device::new("AA:BB:CC:DD:EE:FF:00:11", "H6006")]);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_devices_is_fatal() {
        let offline = StaticApi::new(None);
        let result = resolve_devices(None, &ModelFilter::new("H6006"), &offline).await;
        assert!(matches!(result, Err(BridgeError::NoDevices)));

        let empty = StaticApi::new(Some(Vec::new()));
        let result = resolve_devices(None, &ModelFilter::new("H6006"), &empty).await;
        assert!(matches!(result, Err(BridgeError::NoDevices)));
    }

    #[tokio::test]
    async fn test_everything_filtered_is_not_fatal() {
        let api = StaticApi::new(None);

        let devices = resolve_devices(Some("11:22:33:44:55:66:H6100"), &ModelFilter::new("H6006"), &api)
            .await
            .unwrap();

        assert!(devices.is_empty());
    }
}
