//! Binds one air conditioner's characteristics to translator handlers.

use std::sync::Arc;

use uuid::Uuid;

use crate::client::SmartThingsClient;
use crate::hap::*;
use crate::translator::{StateTranslator, UpdateCallback, MAX_THRESHOLD_C, MIN_THRESHOLD_C};
use crate::types::AccessoryContext;
use crate::{Error, Result};

/// Numeric constraints the host enforces on a characteristic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Props {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

const THRESHOLD_PROPS: Props = Props {
    min: MIN_THRESHOLD_C,
    max: MAX_THRESHOLD_C,
    step: 1.0,
};

const ROTATION_PROPS: Props = Props {
    min: 0.0,
    max: 100.0,
    step: crate::mapping::ROTATION_STEP,
};

const TARGET_HEATER_COOLER_VALUES: &[u8] = &[0, 1, 2];

/// Which vendor capability drives each swing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingBinding {
    /// Fan swing toggles louver oscillation; the heater-cooler has no swing.
    Oscillation,
    /// Fan swing toggles wind-free; heater-cooler swing toggles oscillation.
    WindFree,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Active,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    CurrentTemperature,
    Threshold,
    OscillationSwing,
    WindFreeSwing,
    FanActive,
    CurrentFanState,
    TargetFanState,
    RotationSpeed,
    Humidity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicSpec {
    pub service: Service,
    pub characteristic: Characteristic,
    pub writable: bool,
    pub props: Option<Props>,
    pub valid_values: Option<&'static [u8]>,
    handler: Handler,
}

impl CharacteristicSpec {
    fn read_only(service: Service, characteristic: Characteristic, handler: Handler) -> Self {
        Self {
            service,
            characteristic,
            writable: false,
            props: None,
            valid_values: None,
            handler,
        }
    }

    fn writable(service: Service, characteristic: Characteristic, handler: Handler) -> Self {
        Self {
            writable: true,
            ..Self::read_only(service, characteristic, handler)
        }
    }

    fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    fn with_valid_values(mut self, values: &'static [u8]) -> Self {
        self.valid_values = Some(values);
        self
    }

    fn check(&self, value: CharacteristicValue) -> Result<()> {
        if !self.writable {
            return Err(Error::InvalidCharacteristic(format!(
                "{} is read-only",
                self.characteristic
            )));
        }
        let v = value.as_f64();
        if let Some(props) = self.props
            && !(props.min..=props.max).contains(&v)
        {
            return Err(Error::InvalidCharacteristic(format!(
                "{} {v} outside {}..={}",
                self.characteristic, props.min, props.max
            )));
        }
        if let Some(props) = self.props
            && ((v - props.min) / props.step).fract() != 0.0
        {
            return Err(Error::InvalidCharacteristic(format!(
                "{} {v} is not a multiple of {} from {}",
                self.characteristic, props.step, props.min
            )));
        }
        if let Some(valid) = self.valid_values
            && !value.as_u8().is_some_and(|b| valid.contains(&b))
        {
            return Err(Error::InvalidCharacteristic(format!(
                "{} {v} not in {valid:?}",
                self.characteristic
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
}

pub struct AccessoryBuilder {
    uuid: Uuid,
    context: AccessoryContext,
    client: SmartThingsClient,
    wind_free: bool,
    humidity: bool,
    on_update: Vec<UpdateCallback>,
}

impl AccessoryBuilder {
    pub fn new(uuid: Uuid, context: AccessoryContext, client: &SmartThingsClient) -> Self {
        let client = client.with_token(context.token.clone());
        Self {
            uuid,
            context,
            client,
            wind_free: false,
            humidity: false,
            on_update: Vec::new(),
        }
    }

    pub fn wind_free(mut self, enabled: bool) -> Self {
        self.wind_free = enabled;
        self
    }

    pub fn humidity(mut self, enabled: bool) -> Self {
        self.humidity = enabled;
        self
    }

    pub fn on_update(mut self, f: impl Fn(&CharacteristicUpdate) + Send + Sync + 'static) -> Self {
        self.on_update.push(Arc::new(f));
        self
    }

    pub(crate) fn on_update_shared(mut self, f: UpdateCallback) -> Self {
        self.on_update.push(f);
        self
    }

    pub fn build(self) -> Accessory {
        let swing = if self.wind_free {
            SwingBinding::WindFree
        } else {
            SwingBinding::Oscillation
        };
        let specs = declare(swing, self.humidity);

        let device = &self.context.device;
        let information = AccessoryInformation {
            name: device.display_name().to_string(),
            manufacturer: device.manufacturer_name.clone(),
            model: device.model().to_string(),
            serial_number: device.device_id.clone(),
        };

        Accessory {
            uuid: self.uuid,
            information,
            swing,
            specs,
            translator: StateTranslator::new(self.uuid, self.context, self.client, self.on_update),
        }
    }
}

fn declare(swing: SwingBinding, humidity: bool) -> Vec<CharacteristicSpec> {
    use Characteristic as C;
    use CharacteristicSpec as Spec;
    use Service::*;

    let mut specs = vec![
        Spec::writable(HeaterCooler, C::Active, Handler::Active),
        Spec::read_only(HeaterCooler, C::CurrentHeaterCoolerState, Handler::CurrentHeaterCoolerState),
        Spec::writable(HeaterCooler, C::TargetHeaterCoolerState, Handler::TargetHeaterCoolerState)
            .with_valid_values(TARGET_HEATER_COOLER_VALUES),
        Spec::read_only(HeaterCooler, C::CurrentTemperature, Handler::CurrentTemperature),
        Spec::writable(HeaterCooler, C::CoolingThresholdTemperature, Handler::Threshold)
            .with_props(THRESHOLD_PROPS),
        Spec::writable(HeaterCooler, C::HeatingThresholdTemperature, Handler::Threshold)
            .with_props(THRESHOLD_PROPS),
        Spec::writable(Fan, C::Active, Handler::FanActive),
        Spec::writable(Fan, C::RotationSpeed, Handler::RotationSpeed).with_props(ROTATION_PROPS),
        Spec::read_only(Fan, C::CurrentFanState, Handler::CurrentFanState),
        Spec::writable(Fan, C::TargetFanState, Handler::TargetFanState),
    ];

    match swing {
        SwingBinding::WindFree => {
            specs.push(Spec::writable(Fan, C::SwingMode, Handler::WindFreeSwing));
            specs.push(Spec::writable(HeaterCooler, C::SwingMode, Handler::OscillationSwing));
        }
        SwingBinding::Oscillation => {
            specs.push(Spec::writable(Fan, C::SwingMode, Handler::OscillationSwing));
        }
    }

    if humidity {
        specs.push(Spec::read_only(
            HumiditySensor,
            C::CurrentRelativeHumidity,
            Handler::Humidity,
        ));
    }
    specs
}

/// One air conditioner as the host sees it: a heater-cooler, a fan and
/// optionally a humidity sensor.
pub struct Accessory {
    uuid: Uuid,
    information: AccessoryInformation,
    swing: SwingBinding,
    specs: Vec<CharacteristicSpec>,
    translator: StateTranslator,
}

impl Accessory {
    pub fn builder(uuid: Uuid, context: AccessoryContext, client: &SmartThingsClient) -> AccessoryBuilder {
        AccessoryBuilder::new(uuid, context, client)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    pub fn context(&self) -> &AccessoryContext {
        self.translator.context()
    }

    pub fn swing_binding(&self) -> SwingBinding {
        self.swing
    }

    pub fn characteristics(&self) -> &[CharacteristicSpec] {
        &self.specs
    }

    pub fn spec(&self, service: Service, characteristic: Characteristic) -> Option<&CharacteristicSpec> {
        self.specs
            .iter()
            .find(|s| s.service == service && s.characteristic == characteristic)
    }

    pub fn translator(&self) -> &StateTranslator {
        &self.translator
    }

    fn handler(&self, service: Service, characteristic: Characteristic) -> Result<&CharacteristicSpec> {
        self.spec(service, characteristic)
            .ok_or_else(|| Error::Unbound(format!("{service:?}.{characteristic}")))
    }

    /// Host read. Only fails for characteristics this accessory does not expose.
    pub async fn handle_get(
        &self,
        service: Service,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue> {
        let spec = self.handler(service, characteristic)?;
        let t = &self.translator;
        let value: CharacteristicValue = match spec.handler {
            Handler::Active => t.active().await.into(),
            Handler::CurrentHeaterCoolerState => t.current_heater_cooler_state().await.into(),
            Handler::TargetHeaterCoolerState => t.target_heater_cooler_state().await.into(),
            Handler::CurrentTemperature => t.current_temperature().await.into(),
            Handler::Threshold => t.threshold_temperature(characteristic).await.into(),
            Handler::OscillationSwing => t.oscillation_swing().await.into(),
            Handler::WindFreeSwing => t.wind_free_swing().await.into(),
            Handler::FanActive => t.fan_active().await.into(),
            Handler::CurrentFanState => t.current_fan_state().await.into(),
            Handler::TargetFanState => t.target_fan_state().await.into(),
            Handler::RotationSpeed => t.rotation_speed().await.into(),
            Handler::Humidity => t.humidity().await.into(),
        };
        Ok(value)
    }

    /// Host write. Vendor failures are returned to the host as a failed command.
    pub async fn handle_set(
        &self,
        service: Service,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        let spec = self.handler(service, characteristic)?;
        spec.check(value)?;
        let t = &self.translator;
        match spec.handler {
            Handler::Active => t.set_active(value.try_into()?).await,
            Handler::TargetHeaterCoolerState => t.set_target_heater_cooler_state(value.try_into()?).await,
            Handler::Threshold => t.set_threshold_temperature(characteristic, value.as_f64()).await,
            Handler::OscillationSwing => t.set_oscillation_swing(value.try_into()?).await,
            Handler::WindFreeSwing => t.set_wind_free_swing(value.try_into()?).await,
            Handler::FanActive => t.set_fan_active(value.try_into()?).await,
            Handler::TargetFanState => t.set_target_fan_state(value.try_into()?).await,
            Handler::RotationSpeed => t.set_rotation_speed(value.as_f64()).await,
            Handler::CurrentHeaterCoolerState
            | Handler::CurrentTemperature
            | Handler::CurrentFanState
            | Handler::Humidity => Err(Error::InvalidCharacteristic(format!(
                "{characteristic} is read-only"
            ))),
        }
    }
}
