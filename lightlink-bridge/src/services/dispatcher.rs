use std::sync::Arc;

use lightlink_api::LightApi;
use lightlink_api::models::{Command, Device};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchReport {
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Fans a command out to every registered light.
pub struct Dispatcher<A: ?Sized> {
    api: Arc<A>,
    devices: Vec<Device>,
    lights_on: Option<bool>,
}

impl<A> Dispatcher<A>
where
    A: LightApi + ?Sized,
{
    pub fn new(api: Arc<A>, devices: Vec<Device>) -> Self {
        Self {
            api,
            devices,
            lights_on: None,
        }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Last power state sent, `None` until the first on/off command.
    pub fn lights_on(&self) -> Option<bool> {
        self.lights_on
    }

    /// Sends `cmd` to each device in order. A failing device is logged and
    /// does not stop the remaining ones.
    pub async fn dispatch(&mut self, cmd: Command) -> DispatchReport {
        let mut report = DispatchReport::default();

        for device in &self.devices {
            match self.api.control(device, cmd).await {
                Ok(()) => {
                    report.succeeded += 1;
                    tracing::info!("[OK] {} -> {}", device, cmd);
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("[ERR] {} -> {}: {}", device, cmd, e);
                }
            }
        }

        if let Command::Turn(state) = cmd {
            self.lights_on = Some(state.is_on());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lightlink_api::models::PowerState;

    use super::*;

    #[derive(Default)]
    struct RecordingApi {
        failing: Vec<String>,
        sent: Mutex<Vec<(String, Command)>>,
    }

    #[async_trait]
    impl LightApi for RecordingApi {
        async fn list_devices(&self) -> lightlink_api::Result<Vec<Device>> {
            Ok(Vec::new())
        }

        async fn control(&self, device: &Device, cmd: Command) -> lightlink_api::Result<()> {
            self.sent.lock().unwrap().push((device.address.clone(), cmd));

            if self.failing.contains(&device.address) {
                Err(lightlink_api::Error::UnexpectedShape("device offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn devices() -> Vec<Device> {
        vec![
            Device::new("aa:bb:cc:dd:ee:ff", "H6006"),
            Device::new("11:22:33:44:55:66", "H6006"),
        ]
    }

    #[tokio::test]
    async fn test_dispatch_to_every_device() {
        let api = Arc::new(RecordingApi::default());
        let mut dispatcher = Dispatcher::new(api.clone(), devices());

        assert_eq!(dispatcher.devices(), devices().as_slice());
        assert_eq!(dispatcher.lights_on(), None);

        let report = dispatcher.dispatch(Command::Turn(PowerState::On)).await;

        assert!(report.all_ok());
        assert_eq!(report.succeeded, 2);
        assert_eq!(dispatcher.lights_on(), Some(true));
        assert_eq!(
            *api.sent.lock().unwrap(),
            vec![
                ("aa:bb:cc:dd:ee:ff".to_string(), Command::Turn(PowerState::On)),
                ("11:22:33:44:55:66".to_string(), Command::Turn(PowerState::On)),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_others() {
        let api = Arc::new(RecordingApi {
            failing: vec!["aa:bb:cc:dd:ee:ff".to_string()],
            ..Default::default()
        });
        let mut dispatcher = Dispatcher::new(api.clone(), devices());

        let report = dispatcher.dispatch(Command::Turn(PowerState::Off)).await;

        assert!(!report.all_ok());
        assert_eq!(report, DispatchReport { succeeded: 1, failed: 1 });
        assert_eq!(api.sent.lock().unwrap().len(), 2);
        assert_eq!(dispatcher.lights_on(), Some(false));
    }

    #[tokio::test]
    async fn test_brightness_keeps_power_state() {
        let api = Arc::new(RecordingApi::default());
        let mut dispatcher = Dispatcher::new(api, devices());

        dispatcher.dispatch(Command::Brightness(30)).await;

        assert_eq!(dispatcher.lights_on(), None);
    }

    #[tokio::test]
    async fn test_no_devices_is_noop() {
        let api = Arc::new(RecordingApi::default());
        let mut dispatcher = Dispatcher::new(api.clone(), Vec::new());

        let report = dispatcher.dispatch(Command::Turn(PowerState::On)).await;

        assert!(report.all_ok());
        assert_eq!(report.succeeded, 0);
        assert!(api.sent.lock().unwrap().is_empty());
    }
}
