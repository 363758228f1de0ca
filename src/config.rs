//! Platform configuration as it appears in the host's JSON config block.

use std::path::Path;

use serde::Deserialize;

use crate::client::SmartThingsClient;
use crate::protocol::DEFAULT_BASE_URL;
use crate::types::TemperatureUnit;
use crate::{Error, Result};

pub const DEFAULT_PLATFORM_NAME: &str = "SmartThings AC";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Personal access token, https://account.smartthings.com/tokens
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub wind_free_supported: bool,
    /// Exact label of a device to bridge even if its type is not recognised.
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub show_humidity: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Append every API exchange to this NDJSON file.
    #[serde(default)]
    pub message_log: Option<String>,
}

fn default_name() -> String {
    DEFAULT_PLATFORM_NAME.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl PlatformConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            token: token.into(),
            temperature_unit: TemperatureUnit::default(),
            wind_free_supported: false,
            device_name: None,
            show_humidity: false,
            base_url: default_base_url(),
            message_log: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validated(mut self) -> Result<Self> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("token is required".into()));
        }
        if self.device_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            self.device_name = None;
        }
        Ok(self)
    }

    /// Shared client for discovery; accessories derive their own from it.
    pub fn client(&self) -> Result<SmartThingsClient> {
        let mut builder = SmartThingsClient::builder(&self.token).base_url(&self.base_url);
        if let Some(ref path) = self.message_log {
            builder = builder.message_log(path);
        }
        builder.build()
    }
}
