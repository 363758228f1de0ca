use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::accessory::Accessory;
use crate::client::SmartThingsClient;
use crate::config::PlatformConfig;
use crate::discovery::discover;
use crate::hap::CharacteristicUpdate;
use crate::translator::UpdateCallback;
use crate::types::{AccessoryContext, DeviceDescriptor};
use crate::Result;

type RegisterCallback = Box<dyn Fn(&AccessoryRecord) + Send + Sync>;

const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1e_4c2a_9b3d_4e8f_a1c7_52d0_e9b4_3a18);

/// Stable accessory id for a SmartThings device id.
pub fn accessory_uuid(device_id: &str) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, device_id.as_bytes())
}

/// What the host persists per accessory between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryRecord {
    pub uuid: Uuid,
    pub display_name: String,
    pub context: AccessoryContext,
}

pub struct PlatformBuilder {
    config: PlatformConfig,
    client: Option<SmartThingsClient>,
    on_register: Vec<RegisterCallback>,
    on_record_updated: Vec<RegisterCallback>,
    on_update: Vec<UpdateCallback>,
}

impl PlatformBuilder {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            client: None,
            on_register: Vec::new(),
            on_record_updated: Vec::new(),
            on_update: Vec::new(),
        }
    }

    /// Use an existing client instead of building one from the config.
    pub fn client(mut self, client: SmartThingsClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Called once for every accessory the host has not seen before.
    pub fn on_register(mut self, f: impl Fn(&AccessoryRecord) + Send + Sync + 'static) -> Self {
        self.on_register.push(Box::new(f));
        self
    }

    /// Called when discovery refreshes a restored record; the host should
    /// persist it again.
    pub fn on_record_updated(mut self, f: impl Fn(&AccessoryRecord) + Send + Sync + 'static) -> Self {
        self.on_record_updated.push(Box::new(f));
        self
    }

    /// Called for every out-of-band characteristic push from any accessory.
    pub fn on_update(mut self, f: impl Fn(&CharacteristicUpdate) + Send + Sync + 'static) -> Self {
        self.on_update.push(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<Platform> {
        let client = match self.client {
            Some(client) => client,
            None => self.config.client()?,
        };
        Ok(Platform {
            config: self.config,
            client,
            records: Vec::new(),
            accessories: HashMap::new(),
            on_register: self.on_register,
            on_record_updated: self.on_record_updated,
            on_update: self.on_update,
        })
    }
}

pub struct Platform {
    config: PlatformConfig,
    client: SmartThingsClient,
    records: Vec<AccessoryRecord>,
    accessories: HashMap<Uuid, Accessory>,
    on_register: Vec<RegisterCallback>,
    on_record_updated: Vec<RegisterCallback>,
    on_update: Vec<UpdateCallback>,
}

impl Platform {
    pub fn builder(config: PlatformConfig) -> PlatformBuilder {
        PlatformBuilder::new(config)
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Hand back a record the host restored from its cache. Handlers are bound
    /// once discovery confirms the device still exists.
    pub fn configure_accessory(&mut self, record: AccessoryRecord) {
        info!(name = %record.display_name, "loading accessory from cache");
        self.records.retain(|r| r.uuid != record.uuid);
        self.records.push(record);
    }

    /// Discover devices and create or rebind their accessories. Returns the
    /// number of accessories bound. Accessories whose device disappeared are
    /// left untouched.
    pub async fn discover_devices(&mut self) -> Result<usize> {
        let devices = match discover(&self.client, self.config.device_name.as_deref()).await {
            Ok(devices) => devices,
            Err(e) => {
                error!(error = %e, "device discovery failed");
                return Err(e);
            }
        };

        let count = devices.len();
        for device in devices {
            self.reconcile(device);
        }
        Ok(count)
    }

    fn reconcile(&mut self, device: DeviceDescriptor) {
        let uuid = accessory_uuid(&device.device_id);
        let context = AccessoryContext {
            device,
            token: self.config.token.clone(),
            temperature_unit: self.config.temperature_unit,
        };

        let record = match self.records.iter().position(|r| r.uuid == uuid) {
            Some(idx) => {
                let existing = &mut self.records[idx];
                info!(name = %existing.display_name, "restoring existing accessory from cache");
                if existing.context.token != context.token {
                    info!(name = %existing.display_name, "token changed, updating accessory");
                }
                if existing.context.temperature_unit != context.temperature_unit {
                    info!(
                        name = %existing.display_name,
                        from = ?existing.context.temperature_unit,
                        to = ?context.temperature_unit,
                        "temperature unit changed, updating accessory"
                    );
                }
                let display_name = context.device.display_name().to_string();
                if existing.display_name != display_name {
                    info!(from = %existing.display_name, to = %display_name, "device renamed");
                    existing.display_name = display_name;
                }
                existing.context = context;
                for cb in &self.on_record_updated {
                    cb(existing);
                }
                existing.clone()
            }
            None => {
                let record = AccessoryRecord {
                    uuid,
                    display_name: context.device.display_name().to_string(),
                    context,
                };
                info!(name = %record.display_name, "adding new accessory");
                for cb in &self.on_register {
                    cb(&record);
                }
                self.records.push(record.clone());
                record
            }
        };

        let accessory = self.bind(record);
        self.accessories.insert(uuid, accessory);
    }

    fn bind(&self, record: AccessoryRecord) -> Accessory {
        debug!(uuid = %record.uuid, device = record.context.device_id(), "binding handlers");
        let mut builder = Accessory::builder(record.uuid, record.context, &self.client)
            .wind_free(self.config.wind_free_supported)
            .humidity(self.config.show_humidity);
        for cb in &self.on_update {
            builder = builder.on_update_shared(cb.clone());
        }
        builder.build()
    }

    pub fn records(&self) -> &[AccessoryRecord] {
        &self.records
    }

    pub fn accessory(&self, uuid: &Uuid) -> Option<&Accessory> {
        self.accessories.get(uuid)
    }

    pub fn accessories(&self) -> impl Iterator<Item = &Accessory> {
        self.accessories.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessory_uuid_is_stable() {
        assert_eq!(accessory_uuid("abc"), accessory_uuid("abc"));
        assert_ne!(accessory_uuid("abc"), accessory_uuid("abd"));
        assert_eq!(accessory_uuid("abc").get_version_num(), 5);
    }

    #[test]
    fn record_round_trips_through_host_storage() {
        let record = AccessoryRecord {
            uuid: accessory_uuid("d1"),
            display_name: "Bedroom".into(),
            context: AccessoryContext {
                device: DeviceDescriptor {
                    device_id: "d1".into(),
                    label: "Bedroom".into(),
                    ..Default::default()
                },
                token: "t".into(),
                temperature_unit: Default::default(),
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AccessoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
