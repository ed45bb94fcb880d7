use serde_json::{Map, Value};

use super::Device;
use crate::error::{Error, Result};

const ID_KEYS: [&str; 3] = ["device", "deviceId", "id"];
const MODEL_KEYS: [&str; 3] = ["model", "sku", "productModel"];

/// Extracts the device list from a listing response.
///
/// The vendor has shipped several envelopes over time, so this accepts
/// `{"data": {"devices": [..]}}`, `{"devices": [..]}`, `{"data": [..]}` and a
/// bare array, in that order of preference. Entries without an identifier or
/// a model are dropped.
pub fn devices_from_value(value: &Value) -> Result<Vec<Device>> {
    let items = match value {
        Value::Object(map) => devices_array(map)?,
        Value::Array(items) => items.as_slice(),
        other => {
            return Err(Error::UnexpectedShape(format!(
                "expected object or array, got {}",
                type_name(other)
            )));
        }
    };

    Ok(items.iter().filter_map(device_from_item).collect())
}

fn devices_array(map: &Map<String, Value>) -> Result<&[Value]> {
    if let Some(Value::Object(data)) = map.get("data") {
        if let Some(devices) = data.get("devices") {
            return match devices {
                Value::Array(items) => Ok(items.as_slice()),
                Value::Null => Ok(&[]),
                other => Err(Error::UnexpectedShape(format!(
                    "data.devices is {}",
                    type_name(other)
                ))),
            };
        }
    }

    if let Some(Value::Array(items)) = map.get("devices") {
        return Ok(items.as_slice());
    }

    if let Some(Value::Array(items)) = map.get("data") {
        return Ok(items.as_slice());
    }

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    Err(Error::UnexpectedShape(format!("keys: [{}]", keys.join(", "))))
}

fn device_from_item(item: &Value) -> Option<Device> {
    let Value::Object(fields) = item else {
        tracing::debug!("skipping non-object device entry: {}", item);
        return None;
    };

    let address = first_string(fields, &ID_KEYS);
    let model = first_string(fields, &MODEL_KEYS);

    match (address, model) {
        (Some(address), Some(model)) => Some(Device::new(address, model)),
        _ => {
            tracing::debug!("skipping device entry without id or model: {}", item);
            None
        }
    }
}

fn first_string<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
