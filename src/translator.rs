//! Characteristic handlers for one air conditioner.
//!
//! Nothing here is cached: every get re-reads the device, every set is a
//! short sequence of commands followed by pushes for the characteristics the
//! host cannot infer on its own. Gets never fail; they log and fall back to a
//! fixed default. Sets return the first vendor error unchanged.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::client::SmartThingsClient;
use crate::hap::*;
use crate::mapping;
use crate::types::*;
use crate::{Error, Result};

pub type UpdateCallback = Arc<dyn Fn(&CharacteristicUpdate) + Send + Sync>;

pub const MIN_THRESHOLD_C: f64 = 10.0;
pub const MAX_THRESHOLD_C: f64 = 30.0;
pub const FALLBACK_TEMPERATURE_C: f64 = 20.0;

pub struct StateTranslator {
    accessory: Uuid,
    ctx: AccessoryContext,
    client: SmartThingsClient,
    on_update: Vec<UpdateCallback>,
}

impl StateTranslator {
    pub fn new(
        accessory: Uuid,
        ctx: AccessoryContext,
        client: SmartThingsClient,
        on_update: Vec<UpdateCallback>,
    ) -> Self {
        Self {
            accessory,
            ctx,
            client,
            on_update,
        }
    }

    pub fn context(&self) -> &AccessoryContext {
        &self.ctx
    }

    fn device(&self) -> &str {
        self.ctx.device_id()
    }

    fn unit(&self) -> TemperatureUnit {
        self.ctx.temperature_unit
    }

    // -- Heater-cooler service --

    pub async fn active(&self) -> Active {
        let result = self
            .read_state()
            .await
            .map(|(power, mode)| mapping::heater_cooler_active(power, mode));
        self.or_default(Characteristic::Active, result, Active::Inactive)
    }

    pub async fn set_active(&self, value: Active) -> Result<()> {
        if !value.is_active() {
            self.client.set_power(self.device(), PowerState::Off).await?;
            self.push(Service::Fan, Characteristic::CurrentFanState, CurrentFanState::Inactive);
            self.push(Service::Fan, Characteristic::Active, Active::Inactive);
            return Ok(());
        }

        let mode = self.client.mode(self.device()).await?;
        if mode == AcMode::Wind {
            debug!(device = self.device(), "leaving fan-only mode");
            self.apply_mode(AcMode::Auto).await?;
            self.push(
                Service::HeaterCooler,
                Characteristic::TargetHeaterCoolerState,
                TargetHeaterCoolerState::Auto,
            );
        } else {
            self.client.set_power(self.device(), PowerState::On).await?;
        }
        self.push(Service::Fan, Characteristic::Active, Active::Active);
        self.push(Service::Fan, Characteristic::CurrentFanState, CurrentFanState::BlowingAir);
        Ok(())
    }

    pub async fn current_heater_cooler_state(&self) -> CurrentHeaterCoolerState {
        let result = self
            .read_state()
            .await
            .map(|(power, mode)| mapping::heater_cooler_state(power, mode));
        self.or_default(
            Characteristic::CurrentHeaterCoolerState,
            result,
            CurrentHeaterCoolerState::Inactive,
        )
    }

    pub async fn target_heater_cooler_state(&self) -> TargetHeaterCoolerState {
        let result = self
            .client
            .mode(self.device())
            .await
            .map(mapping::target_state_from_mode);
        self.or_default(
            Characteristic::TargetHeaterCoolerState,
            result,
            TargetHeaterCoolerState::Auto,
        )
    }

    /// Changing the target mode always powers the unit on.
    pub async fn set_target_heater_cooler_state(&self, target: TargetHeaterCoolerState) -> Result<()> {
        self.apply_mode(mapping::mode_from_target_state(target)).await?;
        self.push(Service::HeaterCooler, Characteristic::Active, Active::Active);
        self.push(Service::Fan, Characteristic::Active, Active::Active);
        self.push(Service::Fan, Characteristic::CurrentFanState, CurrentFanState::BlowingAir);
        Ok(())
    }

    pub async fn current_temperature(&self) -> f64 {
        let result = self
            .client
            .temperature(self.device())
            .await
            .map(|v| Temperature::from_vendor(v, self.unit()).celsius());
        self.or_default(Characteristic::CurrentTemperature, result, FALLBACK_TEMPERATURE_C)
    }

    /// Both threshold characteristics read the single cooling setpoint.
    pub async fn threshold_temperature(&self, characteristic: Characteristic) -> f64 {
        let result = self.client.cooling_setpoint(self.device()).await.map(|v| {
            Temperature::from_vendor(v, self.unit())
                .clamp(MIN_THRESHOLD_C, MAX_THRESHOLD_C)
                .celsius()
        });
        self.or_default(characteristic, result, FALLBACK_TEMPERATURE_C)
    }

    pub async fn set_threshold_temperature(&self, characteristic: Characteristic, celsius: f64) -> Result<()> {
        let sibling = match characteristic {
            Characteristic::CoolingThresholdTemperature => Characteristic::HeatingThresholdTemperature,
            Characteristic::HeatingThresholdTemperature => Characteristic::CoolingThresholdTemperature,
            other => return Err(Error::InvalidCharacteristic(format!("{other} is not a threshold"))),
        };
        let target = Temperature::from_celsius(celsius);
        let value = target.to_vendor(self.unit());
        debug!(device = self.device(), %target, value, "setting setpoint");
        self.client.set_cooling_setpoint(self.device(), value).await?;
        let held = Temperature::from_vendor(value as f64, self.unit()).celsius();
        self.push(Service::HeaterCooler, sibling, held);
        Ok(())
    }

    pub async fn oscillation_swing(&self) -> SwingMode {
        let result = self
            .client
            .fan_oscillation(self.device())
            .await
            .map(|o| mapping::swing_from_oscillation(&o));
        self.or_default(Characteristic::SwingMode, result, SwingMode::Disabled)
    }

    pub async fn set_oscillation_swing(&self, swing: SwingMode) -> Result<()> {
        let oscillation = mapping::oscillation_from_swing(swing);
        self.client
            .set_fan_oscillation(self.device(), &oscillation)
            .await
    }

    pub async fn wind_free_swing(&self) -> SwingMode {
        let result = self
            .client
            .optional_mode(self.device())
            .await
            .map(mapping::swing_from_optional_mode);
        self.or_default(Characteristic::SwingMode, result, SwingMode::Disabled)
    }

    pub async fn set_wind_free_swing(&self, swing: SwingMode) -> Result<()> {
        let mode = mapping::optional_mode_from_swing(swing);
        self.client.set_optional_mode(self.device(), mode).await
    }

    // -- Fan service --

    /// The fan runs whenever the unit is powered.
    pub async fn fan_active(&self) -> Active {
        let result = self
            .client
            .power(self.device())
            .await
            .map(|p| Active::from_bool(p.is_on()));
        self.or_default(Characteristic::Active, result, Active::Inactive)
    }

    /// Starting the fan on a powered-off unit starts fan-only mode; stopping
    /// it powers the whole unit off.
    pub async fn set_fan_active(&self, value: Active) -> Result<()> {
        if !value.is_active() {
            self.client.set_power(self.device(), PowerState::Off).await?;
            self.push(Service::HeaterCooler, Characteristic::Active, Active::Inactive);
            self.push(
                Service::HeaterCooler,
                Characteristic::CurrentHeaterCoolerState,
                CurrentHeaterCoolerState::Inactive,
            );
            self.push(Service::Fan, Characteristic::CurrentFanState, CurrentFanState::Inactive);
            return Ok(());
        }

        let power = self.client.power(self.device()).await?;
        if !power.is_on() {
            self.apply_mode(AcMode::Wind).await?;
        }
        self.push(Service::Fan, Characteristic::CurrentFanState, CurrentFanState::BlowingAir);
        Ok(())
    }

    pub async fn current_fan_state(&self) -> CurrentFanState {
        let result = self
            .client
            .power(self.device())
            .await
            .map(mapping::current_fan_state);
        self.or_default(Characteristic::CurrentFanState, result, CurrentFanState::Inactive)
    }

    pub async fn target_fan_state(&self) -> TargetFanState {
        let result = self
            .client
            .fan_speed(self.device())
            .await
            .map(mapping::target_fan_state_from_speed);
        self.or_default(Characteristic::TargetFanState, result, TargetFanState::Auto)
    }

    /// Only meaningful while heating or cooling; otherwise the displayed
    /// value snaps back to MANUAL and the device is left alone.
    pub async fn set_target_fan_state(&self, target: TargetFanState) -> Result<()> {
        let (power, mode) = self.read_state().await?;
        if !mapping::heater_cooler_active(power, mode).is_active() {
            debug!(device = self.device(), ?target, "heater-cooler inactive, ignoring target fan state");
            self.push(Service::Fan, Characteristic::TargetFanState, TargetFanState::Manual);
            return Ok(());
        }

        let speed = mapping::fan_speed_for_target(target);
        self.client.set_fan_speed(self.device(), speed).await?;
        if target == TargetFanState::Manual {
            self.push(
                Service::Fan,
                Characteristic::RotationSpeed,
                mapping::fan_speed_to_percentage(speed),
            );
        }
        Ok(())
    }

    pub async fn rotation_speed(&self) -> f64 {
        let result = self
            .client
            .fan_speed(self.device())
            .await
            .map(mapping::fan_speed_to_percentage);
        self.or_default(Characteristic::RotationSpeed, result, 0.0)
    }

    pub async fn set_rotation_speed(&self, percent: f64) -> Result<()> {
        if percent == 0.0 {
            return self.set_fan_active(Active::Inactive).await;
        }
        let speed = mapping::fan_speed_from_percentage(percent).ok_or_else(|| {
            Error::InvalidCharacteristic(format!(
                "rotation speed {percent} is not a multiple of {}",
                mapping::ROTATION_STEP
            ))
        })?;

        let (power, mode) = self.read_state().await?;
        match mapping::heater_cooler_state(power, mode) {
            CurrentHeaterCoolerState::Idle => {
                let current = self.client.fan_speed(self.device()).await?;
                info!(
                    device = self.device(),
                    requested = ?speed,
                    current = ?current,
                    "fan speed cannot change while idle, reverting"
                );
                self.push(
                    Service::Fan,
                    Characteristic::RotationSpeed,
                    mapping::fan_speed_to_percentage(current),
                );
                return Ok(());
            }
            CurrentHeaterCoolerState::Inactive => {
                if mode != AcMode::Wind {
                    self.client.set_mode(self.device(), AcMode::Wind).await?;
                }
                if !power.is_on() {
                    self.client.set_power(self.device(), PowerState::On).await?;
                    self.push(Service::Fan, Characteristic::Active, Active::Active);
                    self.push(
                        Service::Fan,
                        Characteristic::CurrentFanState,
                        CurrentFanState::BlowingAir,
                    );
                }
            }
            CurrentHeaterCoolerState::Heating | CurrentHeaterCoolerState::Cooling => {}
        }

        self.client.set_fan_speed(self.device(), speed).await?;
        self.push(Service::Fan, Characteristic::TargetFanState, TargetFanState::Manual);
        Ok(())
    }

    // -- Humidity sensor --

    pub async fn humidity(&self) -> f64 {
        let result = self.client.humidity(self.device()).await;
        self.or_default(Characteristic::CurrentRelativeHumidity, result, 0.0)
    }

    // -- Helpers --

    async fn read_state(&self) -> Result<(PowerState, AcMode)> {
        let power = self.client.power(self.device()).await?;
        let mode = self.client.mode(self.device()).await?;
        Ok((power, mode))
    }

    /// The device needs an explicit power-on after a mode change.
    async fn apply_mode(&self, mode: AcMode) -> Result<()> {
        self.client.set_mode(self.device(), mode).await?;
        self.client.set_power(self.device(), PowerState::On).await
    }

    fn or_default<T: Debug>(&self, characteristic: Characteristic, result: Result<T>, default: T) -> T {
        match result {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    device = self.device(),
                    %characteristic,
                    error = %e,
                    fallback = ?default,
                    "read failed, reporting default"
                );
                default
            }
        }
    }

    fn push(&self, service: Service, characteristic: Characteristic, value: impl Into<CharacteristicValue>) {
        let update = CharacteristicUpdate {
            accessory: self.accessory,
            service,
            characteristic,
            value: value.into(),
        };
        for cb in &self.on_update {
            cb(&update);
        }
    }
}
