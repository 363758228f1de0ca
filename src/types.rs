use std::fmt;

use serde::{Deserialize, Serialize};

/// Temperature stored as Celsius internally.
/// Fahrenheit devices are converted to whole degrees on both directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature(f64);

impl Temperature {
    pub fn from_celsius(c: f64) -> Self {
        Self(c)
    }

    /// Interpret a reading reported in the device's unit.
    pub fn from_vendor(value: f64, unit: TemperatureUnit) -> Self {
        match unit {
            TemperatureUnit::Celsius => Self(value),
            TemperatureUnit::Fahrenheit => Self(((value - 32.0) * 5.0 / 9.0).round()),
        }
    }

    pub fn celsius(&self) -> f64 {
        self.0
    }

    /// Whole-degree value in the device's unit, as accepted by setpoint commands.
    pub fn to_vendor(&self, unit: TemperatureUnit) -> i64 {
        match unit {
            TemperatureUnit::Celsius => self.0.round() as i64,
            TemperatureUnit::Fahrenheit => (self.0 * 1.8 + 32.0).round() as i64,
        }
    }

    pub fn clamp(self, min: f64, max: f64) -> Self {
        Self(self.0.clamp(min, max))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}\u{00b0}C", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_smartthings_str(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }

    pub fn from_smartthings_str(s: &str) -> Option<Self> {
        match s {
            "on" => Some(PowerState::On),
            "off" => Some(PowerState::Off),
            _ => None,
        }
    }

    pub fn is_on(&self) -> bool {
        *self == PowerState::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcMode {
    Cool,
    Heat,
    Dry,
    /// Fan-only operation.
    Wind,
    Auto,
}

impl AcMode {
    pub fn as_smartthings_str(&self) -> &'static str {
        match self {
            AcMode::Cool => "cool",
            AcMode::Heat => "heat",
            AcMode::Dry => "dry",
            AcMode::Wind => "wind",
            AcMode::Auto => "auto",
        }
    }

    pub fn from_smartthings_str(s: &str) -> Option<Self> {
        match s {
            "cool" => Some(AcMode::Cool),
            "heat" => Some(AcMode::Heat),
            "dry" => Some(AcMode::Dry),
            "wind" => Some(AcMode::Wind),
            "auto" => Some(AcMode::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanSpeed {
    Auto,
    Low,
    Medium,
    High,
    Turbo,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 5] = [
        FanSpeed::Auto,
        FanSpeed::Low,
        FanSpeed::Medium,
        FanSpeed::High,
        FanSpeed::Turbo,
    ];

    pub fn as_smartthings_str(&self) -> &'static str {
        match self {
            FanSpeed::Auto => "auto",
            FanSpeed::Low => "low",
            FanSpeed::Medium => "medium",
            FanSpeed::High => "high",
            FanSpeed::Turbo => "turbo",
        }
    }

    pub fn from_smartthings_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(FanSpeed::Auto),
            "low" => Some(FanSpeed::Low),
            "medium" => Some(FanSpeed::Medium),
            "high" => Some(FanSpeed::High),
            "turbo" => Some(FanSpeed::Turbo),
            _ => None,
        }
    }
}

/// Louver movement. Only `all` and `fixed` are ever sent; anything else the
/// device reports is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOscillation {
    All,
    Fixed,
    Other(String),
}

impl FanOscillation {
    pub fn as_smartthings_str(&self) -> &str {
        match self {
            FanOscillation::All => "all",
            FanOscillation::Fixed => "fixed",
            FanOscillation::Other(s) => s.as_str(),
        }
    }

    pub fn from_smartthings_str(s: &str) -> Self {
        match s {
            "all" => FanOscillation::All,
            "fixed" => FanOscillation::Fixed,
            other => FanOscillation::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalMode {
    Off,
    WindFree,
}

impl OptionalMode {
    pub fn as_smartthings_str(&self) -> &'static str {
        match self {
            OptionalMode::Off => "off",
            OptionalMode::WindFree => "windFree",
        }
    }

    pub fn from_smartthings_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(OptionalMode::Off),
            "windFree" => Some(OptionalMode::WindFree),
            _ => None,
        }
    }
}

/// A device as listed by `GET /devices`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub device_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer_name: String,
    #[serde(default)]
    pub device_type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl DeviceDescriptor {
    pub fn display_name(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.name.is_empty() {
            &self.name
        } else {
            &self.device_id
        }
    }

    pub fn model(&self) -> &str {
        if self.device_type_name.is_empty() {
            &self.name
        } else {
            &self.device_type_name
        }
    }
}

/// Per-accessory state handed to every handler. Persisted by the host inside
/// the accessory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryContext {
    pub device: DeviceDescriptor,
    pub token: String,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

impl AccessoryContext {
    pub fn device_id(&self) -> &str {
        &self.device.device_id
    }
}
