//! Home-automation side of the bridge: services, characteristics and their
//! integer vocabularies as the host understands them.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Service {
    HeaterCooler,
    Fan,
    HumiditySensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Characteristic {
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    CurrentTemperature,
    CoolingThresholdTemperature,
    HeatingThresholdTemperature,
    SwingMode,
    RotationSpeed,
    CurrentFanState,
    TargetFanState,
    CurrentRelativeHumidity,
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Wire value of a characteristic. Enumerations travel as small integers,
/// temperatures and percentages as floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Int(u8),
    Float(f64),
}

impl CharacteristicValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            CharacteristicValue::Int(v) => *v as f64,
            CharacteristicValue::Float(v) => *v,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            CharacteristicValue::Int(v) => Some(*v),
            CharacteristicValue::Float(v) if v.fract() == 0.0 && (0.0..=255.0).contains(v) => {
                Some(*v as u8)
            }
            CharacteristicValue::Float(_) => None,
        }
    }
}

impl From<f64> for CharacteristicValue {
    fn from(v: f64) -> Self {
        CharacteristicValue::Float(v)
    }
}

macro_rules! hap_enum {
    ($name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn value(&self) -> u8 {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn from_value(v: u8) -> Option<Self> {
                match v {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for CharacteristicValue {
            fn from(v: $name) -> Self {
                CharacteristicValue::Int(v.value())
            }
        }

        impl TryFrom<CharacteristicValue> for $name {
            type Error = Error;

            fn try_from(v: CharacteristicValue) -> Result<Self> {
                v.as_u8().and_then($name::from_value).ok_or_else(|| {
                    Error::InvalidCharacteristic(format!(
                        "{} is not a valid {}",
                        v.as_f64(),
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

hap_enum!(Active { Inactive = 0, Active = 1 });
hap_enum!(CurrentHeaterCoolerState { Inactive = 0, Idle = 1, Heating = 2, Cooling = 3 });
hap_enum!(TargetHeaterCoolerState { Auto = 0, Heat = 1, Cool = 2 });
hap_enum!(CurrentFanState { Inactive = 0, Idle = 1, BlowingAir = 2 });
hap_enum!(TargetFanState { Manual = 0, Auto = 1 });
hap_enum!(SwingMode { Disabled = 0, Enabled = 1 });

impl Active {
    pub fn from_bool(on: bool) -> Self {
        if on { Active::Active } else { Active::Inactive }
    }

    pub fn is_active(&self) -> bool {
        *self == Active::Active
    }
}

/// Out-of-band value pushed to the host after a composite operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacteristicUpdate {
    pub accessory: Uuid,
    pub service: Service,
    pub characteristic: Characteristic,
    pub value: CharacteristicValue,
}
