use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use lightlink_api::client::Endpoints;
use lightlink_api::{GOVEE_CONTROL_URL, GOVEE_DEVICES_URL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Serial {
    pub port: Option<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub reconnect_delay_ms: u64,
}

impl Serial {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Govee {
    pub api_key: String,
    pub devices: Option<String>,
    pub allowed_model: String,
    pub devices_url: String,
    pub control_url: String,
}

impl Govee {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            devices_url: self.devices_url.clone(),
            control_url: self.control_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub cooldown_ms: u64,
    pub on_word: String,
    pub off_word: String,
}

impl Trigger {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub serial: Serial,
    pub govee: Govee,
    pub trigger: Trigger,
}

const CONFIG_DIR: &str = "configs";

/// `LIGHTLINK__SECTION__KEY` variables.
fn environment() -> Environment {
    Environment::with_prefix("LIGHTLINK")
        .prefix_separator("__")
        .separator("__")
}

/// Flat variables kept for compatibility with existing `.env` files.
const STRING_OVERRIDES: [(&str, &str); 4] = [
    ("GOVEE_API_KEY", "govee.api_key"),
    ("GOVEE_DEVICES", "govee.devices"),
    ("ALLOWED_MODEL", "govee.allowed_model"),
    ("SERIAL_PORT", "serial.port"),
];

const NUMERIC_OVERRIDES: [(&str, &str); 2] = [
    ("COOLDOWN_MS", "trigger.cooldown_ms"),
    ("BAUDRATE", "serial.baud_rate"),
];

impl Settings {
    /// Loads `.env`, the config files and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Message(format!("Failed to read .env: {e}")));
            }
        }

        Self::build(|key| env::var(key).ok(), environment(), Path::new(CONFIG_DIR))
    }

    /// Same layering as [`Settings::new`], with variables taken from `vars`
    /// instead of the process and config files read from `config_dir`.
    pub fn from_vars(vars: &HashMap<String, String>, config_dir: &Path) -> Result<Self, ConfigError> {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self::build(|key| vars.get(key).cloned(), environment().source(Some(source)), config_dir)
    }

    fn build<F>(lookup: F, environment: Environment, config_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = lookup("RUN_MODE").unwrap_or("development".into());

        let mut builder = Self::defaults()?
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(File::from(config_dir.join(&run_mode)).required(false))
            .add_source(environment);

        for (var, key) in STRING_OVERRIDES {
            builder = builder.set_override_option(key, lookup(var))?;
        }

        for (var, key) in NUMERIC_OVERRIDES {
            let value = lookup(var)
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| {
                        ConfigError::Message(format!("{var} must be a non-negative integer, got {raw:?}"))
                    })
                })
                .transpose()?;

            builder = builder.set_override_option(key, value)?;
        }

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.normalize()?;

        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("logger.level", "info")?
            .set_default("serial.baud_rate", 115_200)?
            .set_default("serial.read_timeout_ms", 1_000)?
            .set_default("serial.reconnect_delay_ms", 3_000)?
            .set_default("govee.api_key", "")?
            .set_default("govee.allowed_model", "H6006")?
            .set_default("govee.devices_url", GOVEE_DEVICES_URL)?
            .set_default("govee.control_url", GOVEE_CONTROL_URL)?
            .set_default("trigger.cooldown_ms", 800)?
            .set_default("trigger.on_word", "LIGHTS_ON")?
            .set_default("trigger.off_word", "LIGHTS_OFF")
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        self.govee.api_key = self.govee.api_key.trim().to_string();
        if self.govee.api_key.is_empty() {
            return Err(ConfigError::Message("GOVEE_API_KEY missing".into()));
        }

        self.govee.allowed_model = self.govee.allowed_model.trim().to_uppercase();
        self.govee.devices = self
            .govee
            .devices
            .take()
            .map(|devices| devices.trim().to_string())
            .filter(|devices| !devices.is_empty());
        self.serial.port = self
            .serial
            .port
            .take()
            .map(|port| port.trim().to_string())
            .filter(|port| !port.is_empty());

        Ok(())
    }
}
