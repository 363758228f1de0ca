use tracing::{error, info};

use crate::client::SmartThingsClient;
use crate::types::DeviceDescriptor;
use crate::Result;

/// Lowercase fragments of the type names air conditioners report.
const AIR_CONDITIONER_PATTERNS: &[&str] = &["air conditioner", "air-conditioner", "room a/c"];

pub fn is_air_conditioner(device: &DeviceDescriptor) -> bool {
    [&device.device_type_name, &device.name].iter().any(|s| {
        let lower = s.to_lowercase();
        AIR_CONDITIONER_PATTERNS.iter().any(|p| lower.contains(p))
    })
}

/// Keep air conditioners, plus the device whose label is `device_name` if set.
pub fn filter_devices(devices: Vec<DeviceDescriptor>, device_name: Option<&str>) -> Vec<DeviceDescriptor> {
    devices
        .into_iter()
        .filter(|d| is_air_conditioner(d) || device_name.is_some_and(|name| d.label == name))
        .collect()
}

/// List the account's devices and pick the air conditioners among them.
///
/// Finding nothing is not an error: the full inventory is logged so the
/// operator can copy the exact label into `deviceName`.
pub async fn discover(
    client: &SmartThingsClient,
    device_name: Option<&str>,
) -> Result<Vec<DeviceDescriptor>> {
    let devices = client.list_devices().await?;
    let total = devices.len();
    info!(total, "devices found on account");

    let inventory: Vec<String> = devices
        .iter()
        .map(|d| format!("{} ({})", d.display_name(), d.model()))
        .collect();

    let matched = filter_devices(devices, device_name);
    if matched.is_empty() {
        error!(
            total,
            device_name = device_name.unwrap_or(""),
            devices = ?inventory,
            "no air conditioner matched; set deviceName to one of the labels listed"
        );
        return Ok(matched);
    }

    let names: Vec<&str> = matched.iter().map(|d| d.display_name()).collect();
    info!(count = matched.len(), names = ?names, "air conditioners matched");
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: &str, label: &str, type_name: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            device_id: id.into(),
            label: label.into(),
            device_type_name: type_name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn type_pattern_is_case_insensitive() {
        assert!(is_air_conditioner(&device("1", "x", "Samsung OCF Air Conditioner")));
        assert!(is_air_conditioner(&device("2", "x", "SAMSUNG ROOM A/C")));
        assert!(!is_air_conditioner(&device("3", "x", "Samsung OCF TV")));
    }

    #[test]
    fn falls_back_to_device_name() {
        let d = DeviceDescriptor {
            device_id: "1".into(),
            name: "Samsung Room A/C".into(),
            ..Default::default()
        };
        assert!(is_air_conditioner(&d));
    }

    #[test]
    fn override_name_must_match_label_exactly() {
        let devices = vec![
            device("1", "Bedroom Unit", "c2c-switch"),
            device("2", "bedroom unit", "c2c-switch"),
            device("3", "Kitchen", "Samsung OCF Air Conditioner"),
        ];
        let matched = filter_devices(devices, Some("Bedroom Unit"));
        let ids: Vec<&str> = matched.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn no_override_keeps_only_air_conditioners() {
        let devices = vec![device("1", "Lamp", "c2c-switch")];
        assert!(filter_devices(devices, None).is_empty());
    }
}
