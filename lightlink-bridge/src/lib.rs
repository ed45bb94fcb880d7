use std::sync::Arc;

use lightlink_api::{GoveeClient, LightApi};

use crate::bridge::Bridge;
use crate::configs::Settings;
use crate::errors::Result;
use crate::services::{Cooldown, Dispatcher, ModelFilter, TriggerWords, resolve_devices};

pub mod bridge;
pub mod configs;
pub mod errors;
pub mod services;
pub mod tools;

pub async fn run(settings: &Arc<Settings>) -> Result<()> {
    let api: Arc<dyn LightApi> = Arc::new(GoveeClient::new(
        &settings.govee.api_key,
        settings.govee.endpoints(),
    )?);

    let filter = ModelFilter::new(&settings.govee.allowed_model);
    let devices = resolve_devices(settings.govee.devices.as_deref(), &filter, api.as_ref()).await?;

    let mut bridge = Bridge::new(
        Dispatcher::new(api, devices),
        Cooldown::new(settings.trigger.cooldown()),
        TriggerWords::from(&settings.trigger),
    );

    tracing::info!("Starting Govee serial bridge");
    tracing::info!(
        "Serial: {} @ {}",
        settings.serial.port.as_deref().unwrap_or("<auto>"),
        settings.serial.baud_rate
    );
    tracing::info!(
        "Devices: {}",
        bridge
            .dispatcher()
            .devices()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!(
        "Commands: {} | {} | BRIGHTNESS:<0-100>",
        bridge.words().on,
        bridge.words().off
    );

    tokio::select! {
        _ = bridge.listen(&settings.serial) => {},
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("Exiting");
        }
    }

    Ok(())
}
