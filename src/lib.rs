mod accessory;
mod client;
mod config;
mod discovery;
mod error;
pub mod hap;
mod logger;
pub mod mapping;
mod platform;
mod protocol;
mod translator;
mod types;

pub use accessory::{
    Accessory, AccessoryBuilder, AccessoryInformation, CharacteristicSpec, Props, SwingBinding,
};
pub use client::{SmartThingsClient, SmartThingsClientBuilder};
pub use config::PlatformConfig;
pub use discovery::{discover, filter_devices, is_air_conditioner};
pub use error::{Error, Result};
pub use platform::{accessory_uuid, AccessoryRecord, Platform, PlatformBuilder};
pub use protocol::{Capability, DEFAULT_BASE_URL};
pub use translator::{StateTranslator, FALLBACK_TEMPERATURE_C, MAX_THRESHOLD_C, MIN_THRESHOLD_C};
pub use types::*;
