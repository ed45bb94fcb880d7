use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

const ADDRESS_OCTETS: usize = 6;

/// Colon separated hex sextet such as `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    pub fn parse(value: &str) -> Result<Self, DeviceError> {
        let octets: Vec<&str> = value.split(':').collect();
        if octets.len() < ADDRESS_OCTETS {
            return Err(DeviceError::TooFewFields(octets.len()));
        }
        if octets.len() > ADDRESS_OCTETS {
            return Err(DeviceError::TrailingFields(octets[ADDRESS_OCTETS..].join(":")));
        }

        Self::from_octets(&octets)
    }

    fn from_octets(octets: &[&str]) -> Result<Self, DeviceError> {
        for octet in octets {
            let valid = octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit());
            if !valid {
                return Err(DeviceError::InvalidOctet(octet.to_string()));
            }
        }

        Ok(Self(octets.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DeviceAddress> for String {
    fn from(address: DeviceAddress) -> Self {
        address.0
    }
}

/// A controllable light. Addresses coming from the vendor listing are kept
/// verbatim, only configured entries go through [`DeviceAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Vendor device identifier
    pub address: String,
    /// Product model code, e.g. `H6006`
    pub model: String,
}

impl Device {
    pub fn new(address: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.address, self.model)
    }
}

impl FromStr for Device {
    type Err = DeviceError;

    /// Parses a single `aa:bb:cc:dd:ee:ff:MODEL` entry.
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = entry.trim().split(':').collect();

        if fields.len() <= ADDRESS_OCTETS {
            return Err(DeviceError::TooFewFields(fields.len()));
        }
        if fields.len() > ADDRESS_OCTETS + 1 {
            return Err(DeviceError::TrailingFields(fields[ADDRESS_OCTETS + 1..].join(":")));
        }

        let address = DeviceAddress::from_octets(&fields[..ADDRESS_OCTETS])?;
        let model = fields[ADDRESS_OCTETS].trim();
        if model.is_empty() {
            return Err(DeviceError::EmptyModel);
        }

        Ok(Device::new(address, model))
    }
}

/// Entry of a device list that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub entry: String,
    pub reason: DeviceError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDevices {
    pub devices: Vec<Device>,
    pub rejected: Vec<RejectedEntry>,
}

/// Parses a `mac:MODEL;mac:MODEL` list. Blank entries are ignored, malformed
/// entries are returned in `rejected` so the caller decides how to report them.
pub fn parse_device_list(raw: &str) -> ParsedDevices {
    let mut parsed = ParsedDevices::default();

    for entry in raw.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        match entry.parse::<Device>() {
            Ok(device) => parsed.devices.push(device),
            Err(reason) => parsed.rejected.push(RejectedEntry {
                entry: entry.to_string(),
                reason,
            }),
        }
    }

    parsed
}
