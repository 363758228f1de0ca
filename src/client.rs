use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::{debug, trace, warn};

use crate::logger::MessageLogger;
use crate::protocol::{
    command_body, commands_path, devices_path, parse_device_page, status_f64, status_path,
    status_str, Capability, DEFAULT_BASE_URL,
};
use crate::types::*;
use crate::{Error, Result};

pub struct SmartThingsClientBuilder {
    token: String,
    base_url: String,
    log_path: Option<String>,
}

impl SmartThingsClientBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            log_path: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn message_log(mut self, path: impl Into<String>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SmartThingsClient> {
        let http = reqwest::Client::builder().build()?;

        let logger = match self.log_path {
            Some(path) => Some(Arc::new(Mutex::new(MessageLogger::new(&path)?))),
            None => None,
        };

        Ok(SmartThingsClient {
            http,
            base_url: self.base_url,
            token: self.token,
            logger,
        })
    }
}

/// Stateless per-capability access to the SmartThings devices API.
///
/// Cloning is cheap; clones share the connection pool and the message log.
#[derive(Clone)]
pub struct SmartThingsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    logger: Option<Arc<Mutex<MessageLogger>>>,
}

impl SmartThingsClient {
    pub fn builder(token: impl Into<String>) -> SmartThingsClientBuilder {
        SmartThingsClientBuilder::new(token)
    }

    /// Same connection pool and log, different credentials.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..self.clone()
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every device the token can see, following pagination links. A link
    /// back to a page already fetched ends the listing.
    pub async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        let mut url = format!("{}{}", self.base_url, devices_path());
        let mut seen = HashSet::new();
        let mut devices = Vec::new();
        loop {
            let body = self.get_json(&url).await?;
            let (page, next) = parse_device_page(&body)?;
            debug!(count = page.len(), "fetched device page");
            devices.extend(page);
            seen.insert(url);
            match next {
                Some(next) if !seen.contains(&next) => url = next,
                Some(next) => {
                    warn!(url = %next, "device list links back to a fetched page, stopping");
                    break;
                }
                None => break,
            }
        }
        Ok(devices)
    }

    pub async fn power(&self, device_id: &str) -> Result<PowerState> {
        let body = self.status(device_id, Capability::Switch).await?;
        let raw = status_str(Capability::Switch, &body)?;
        PowerState::from_smartthings_str(raw).ok_or_else(|| invalid(Capability::Switch, raw))
    }

    pub async fn set_power(&self, device_id: &str, state: PowerState) -> Result<()> {
        self.execute(device_id, Capability::Switch, state.as_smartthings_str(), None)
            .await
    }

    pub async fn mode(&self, device_id: &str) -> Result<AcMode> {
        let body = self.status(device_id, Capability::AirConditionerMode).await?;
        let raw = status_str(Capability::AirConditionerMode, &body)?;
        AcMode::from_smartthings_str(raw)
            .ok_or_else(|| invalid(Capability::AirConditionerMode, raw))
    }

    pub async fn set_mode(&self, device_id: &str, mode: AcMode) -> Result<()> {
        self.execute(
            device_id,
            Capability::AirConditionerMode,
            "setAirConditionerMode",
            Some(json!([mode.as_smartthings_str()])),
        )
        .await
    }

    pub async fn fan_speed(&self, device_id: &str) -> Result<FanSpeed> {
        let body = self.status(device_id, Capability::AirConditionerFanMode).await?;
        let raw = status_str(Capability::AirConditionerFanMode, &body)?;
        FanSpeed::from_smartthings_str(raw)
            .ok_or_else(|| invalid(Capability::AirConditionerFanMode, raw))
    }

    pub async fn set_fan_speed(&self, device_id: &str, speed: FanSpeed) -> Result<()> {
        self.execute(
            device_id,
            Capability::AirConditionerFanMode,
            "setFanMode",
            Some(json!([speed.as_smartthings_str()])),
        )
        .await
    }

    pub async fn fan_oscillation(&self, device_id: &str) -> Result<FanOscillation> {
        let body = self.status(device_id, Capability::FanOscillationMode).await?;
        let raw = status_str(Capability::FanOscillationMode, &body)?;
        Ok(FanOscillation::from_smartthings_str(raw))
    }

    pub async fn set_fan_oscillation(&self, device_id: &str, mode: &FanOscillation) -> Result<()> {
        self.execute(
            device_id,
            Capability::FanOscillationMode,
            "setFanOscillationMode",
            Some(json!([mode.as_smartthings_str()])),
        )
        .await
    }

    pub async fn optional_mode(&self, device_id: &str) -> Result<OptionalMode> {
        let body = self
            .status(device_id, Capability::AirConditionerOptionalMode)
            .await?;
        let raw = status_str(Capability::AirConditionerOptionalMode, &body)?;
        OptionalMode::from_smartthings_str(raw)
            .ok_or_else(|| invalid(Capability::AirConditionerOptionalMode, raw))
    }

    pub async fn set_optional_mode(&self, device_id: &str, mode: OptionalMode) -> Result<()> {
        self.execute(
            device_id,
            Capability::AirConditionerOptionalMode,
            "setAcOptionalMode",
            Some(json!([mode.as_smartthings_str()])),
        )
        .await
    }

    /// Setpoint in the device's own unit.
    pub async fn cooling_setpoint(&self, device_id: &str) -> Result<f64> {
        let body = self
            .status(device_id, Capability::ThermostatCoolingSetpoint)
            .await?;
        status_f64(Capability::ThermostatCoolingSetpoint, &body)
    }

    pub async fn set_cooling_setpoint(&self, device_id: &str, value: i64) -> Result<()> {
        self.execute(
            device_id,
            Capability::ThermostatCoolingSetpoint,
            "setCoolingSetpoint",
            Some(json!([value])),
        )
        .await
    }

    pub async fn temperature(&self, device_id: &str) -> Result<f64> {
        let body = self
            .status(device_id, Capability::TemperatureMeasurement)
            .await?;
        status_f64(Capability::TemperatureMeasurement, &body)
    }

    pub async fn humidity(&self, device_id: &str) -> Result<f64> {
        let body = self
            .status(device_id, Capability::RelativeHumidityMeasurement)
            .await?;
        status_f64(Capability::RelativeHumidityMeasurement, &body)
    }

    // -- Helpers --

    async fn status(&self, device_id: &str, capability: Capability) -> Result<Value> {
        let url = format!("{}{}", self.base_url, status_path(device_id, capability));
        trace!(device = device_id, capability = capability.id(), "reading status");
        self.get_json(&url).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        self.log(|l| l.log_request("GET", url));

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;
        let status = resp.status().as_u16();
        let body: Value = resp.json().await?;

        self.log(|l| l.log_response(url, status, &body));
        Ok(body)
    }

    async fn execute(
        &self,
        device_id: &str,
        capability: Capability,
        command: &str,
        arguments: Option<Value>,
    ) -> Result<()> {
        let body = command_body(capability, command, arguments);
        debug!(device = device_id, capability = capability.id(), command, "sending command");
        self.log(|l| l.log_command(device_id, &body));

        let url = format!("{}{}", self.base_url, commands_path(device_id));
        self.http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn log(&self, f: impl FnOnce(&mut MessageLogger)) {
        if let Some(ref logger) = self.logger
            && let Ok(mut logger) = logger.lock()
        {
            f(&mut logger);
        }
    }
}

fn invalid(capability: Capability, raw: &str) -> Error {
    Error::InvalidValue {
        capability: capability.id(),
        value: raw.to_string(),
    }
}
