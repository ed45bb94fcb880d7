use std::fmt;

use lightlink_api::models::{Command, PowerState};

use crate::configs;

const BRIGHTNESS_PREFIX: &str = "BRIGHTNESS:";

/// Words that switch the lights, taken from the `trigger` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerWords {
    pub on: String,
    pub off: String,
}

impl Default for TriggerWords {
    fn default() -> Self {
        Self {
            on: "LIGHTS_ON".to_string(),
            off: "LIGHTS_OFF".to_string(),
        }
    }
}

impl From<&configs::Trigger> for TriggerWords {
    fn from(trigger: &configs::Trigger) -> Self {
        Self {
            on: trigger.on_word.clone(),
            off: trigger.off_word.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    LightsOn,
    LightsOff,
    Brightness(u8),
    /// Anything else the microcontroller prints, e.g. raw sensor readings
    Other(String),
}

impl Trigger {
    pub fn parse(line: &str, words: &TriggerWords) -> Self {
        if line == words.on {
            return Trigger::LightsOn;
        }
        if line == words.off {
            return Trigger::LightsOff;
        }

        if let Some(level) = line.strip_prefix(BRIGHTNESS_PREFIX) {
            if let Ok(level) = level.trim().parse::<u8>() {
                if level <= Command::MAX_BRIGHTNESS {
                    return Trigger::Brightness(level);
                }
            }
        }

        Trigger::Other(line.to_string())
    }

    pub fn command(&self) -> Option<Command> {
        match self {
            Trigger::LightsOn => Some(Command::Turn(PowerState::On)),
            Trigger::LightsOff => Some(Command::Turn(PowerState::Off)),
            Trigger::Brightness(level) => Some(Command::Brightness(*level)),
            Trigger::Other(_) => None,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::LightsOn => f.write_str("lights on"),
            Trigger::LightsOff => f.write_str("lights off"),
            Trigger::Brightness(level) => write!(f, "brightness {level}"),
            Trigger::Other(text) => f.write_str(text),
        }
    }
}

/// Decodes a raw serial line, dropping invalid UTF-8 and line endings.
pub fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .trim()
        .to_string()
}
