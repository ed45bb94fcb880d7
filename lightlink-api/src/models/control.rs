use std::fmt;

use serde::{Deserialize, Serialize};

use super::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, PowerState::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::On => f.write_str("ON"),
            PowerState::Off => f.write_str("OFF"),
        }
    }
}

/// Command sent to a light, encoded as `{"name": ..., "value": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "lowercase")]
pub enum Command {
    /// Switch the light on or off
    Turn(PowerState),
    /// Brightness percentage (0-100)
    Brightness(u8),
}

impl Command {
    pub const MAX_BRIGHTNESS: u8 = 100;
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Turn(state) => write!(f, "{state}"),
            Command::Brightness(level) => write!(f, "BRIGHTNESS {level}%"),
        }
    }
}

/// Body of the control endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRequest {
    /// Target device identifier
    pub device: String,
    /// Target device model
    pub model: String,
    /// Command to execute
    pub cmd: Command,
}

impl ControlRequest {
    pub fn new(device: &Device, cmd: Command) -> Self {
        Self {
            device: device.address.clone(),
            model: device.model.clone(),
            cmd,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_control_request_body() {
        let device = Device::new("aa:bb:cc:dd:ee:ff", "H6006");

        let turn_on = serde_json::to_value(ControlRequest::new(&device, Command::Turn(PowerState::On))).unwrap();
        assert_eq!(
            turn_on,
            json!({
                "device": "aa:bb:cc:dd:ee:ff",
                "model": "H6006",
                "cmd": { "name": "turn", "value": "on" }
            })
        );

        let dim = serde_json::to_value(ControlRequest::new(&device, Command::Brightness(40))).unwrap();
        assert_eq!(dim["cmd"], json!({ "name": "brightness", "value": 40 }));
    }

    #[test]
    fn test_command_decode() {
        let cmd: Command = serde_json::from_value(json!({ "name": "turn", "value": "off" })).unwrap();
        assert_eq!(cmd, Command::Turn(PowerState::Off));
        assert_eq!(cmd.to_string(), "OFF");
    }
}
