use serde_json::{json, Value};

use crate::types::DeviceDescriptor;
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.smartthings.com/v1";

pub const MAIN_COMPONENT: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Switch,
    TemperatureMeasurement,
    RelativeHumidityMeasurement,
    AirConditionerMode,
    AirConditionerFanMode,
    FanOscillationMode,
    AirConditionerOptionalMode,
    ThermostatCoolingSetpoint,
}

impl Capability {
    pub fn id(&self) -> &'static str {
        match self {
            Capability::Switch => "switch",
            Capability::TemperatureMeasurement => "temperatureMeasurement",
            Capability::RelativeHumidityMeasurement => "relativeHumidityMeasurement",
            Capability::AirConditionerMode => "airConditionerMode",
            Capability::AirConditionerFanMode => "airConditionerFanMode",
            Capability::FanOscillationMode => "fanOscillationMode",
            Capability::AirConditionerOptionalMode => "custom.airConditionerOptionalMode",
            Capability::ThermostatCoolingSetpoint => "thermostatCoolingSetpoint",
        }
    }

    /// Attribute holding the capability's current value in a status response.
    pub fn attribute(&self) -> &'static str {
        match self {
            Capability::Switch => "switch",
            Capability::TemperatureMeasurement => "temperature",
            Capability::RelativeHumidityMeasurement => "humidity",
            Capability::AirConditionerMode => "airConditionerMode",
            Capability::AirConditionerFanMode => "fanMode",
            Capability::FanOscillationMode => "fanOscillationMode",
            Capability::AirConditionerOptionalMode => "acOptionalMode",
            Capability::ThermostatCoolingSetpoint => "coolingSetpoint",
        }
    }
}

pub fn devices_path() -> &'static str {
    "/devices"
}

pub fn status_path(device_id: &str, capability: Capability) -> String {
    format!(
        "/devices/{device_id}/components/{MAIN_COMPONENT}/capabilities/{}/status",
        capability.id()
    )
}

pub fn commands_path(device_id: &str) -> String {
    format!("/devices/{device_id}/commands")
}

pub fn command_body(capability: Capability, command: &str, arguments: Option<Value>) -> Value {
    let mut cmd = json!({
        "component": MAIN_COMPONENT,
        "capability": capability.id(),
        "command": command,
    });
    if let Some(args) = arguments {
        cmd["arguments"] = args;
    }
    json!({ "commands": [cmd] })
}

/// Extract `{<attribute>: {value}}` from a capability status response.
pub fn status_value(capability: Capability, body: &Value) -> Result<&Value> {
    match body.get(capability.attribute()).and_then(|a| a.get("value")) {
        Some(Value::Null) | None => Err(Error::Protocol(format!(
            "{} status has no {} value",
            capability.id(),
            capability.attribute()
        ))),
        Some(v) => Ok(v),
    }
}

pub fn status_str(capability: Capability, body: &Value) -> Result<&str> {
    status_value(capability, body)?.as_str().ok_or_else(|| {
        Error::Protocol(format!("{} value is not a string", capability.id()))
    })
}

pub fn status_f64(capability: Capability, body: &Value) -> Result<f64> {
    status_value(capability, body)?.as_f64().ok_or_else(|| {
        Error::Protocol(format!("{} value is not a number", capability.id()))
    })
}

/// One page of `GET /devices`, plus the absolute URL of the next page if any.
pub fn parse_device_page(body: &Value) -> Result<(Vec<DeviceDescriptor>, Option<String>)> {
    let items = match body.get("items") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::Protocol("device list items is not an array".into())),
        None => return Ok((vec![], None)),
    };
    let devices = items
        .iter()
        .map(|item| serde_json::from_value(item.clone()))
        .collect::<std::result::Result<Vec<DeviceDescriptor>, _>>()?;
    let next = body
        .pointer("/_links/next/href")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Ok((devices, next))
}
