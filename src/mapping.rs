//! Value tables between SmartThings capabilities and host characteristics.
//! Every function here is pure; the translator feeds them fresh vendor reads.

use crate::hap::{Active, CurrentFanState, CurrentHeaterCoolerState, SwingMode, TargetFanState, TargetHeaterCoolerState};
use crate::types::{AcMode, FanOscillation, FanSpeed, OptionalMode, PowerState};

/// Step of the exposed rotation-speed control; one step per named fan speed.
pub const ROTATION_STEP: f64 = 25.0;

pub fn heater_cooler_state(power: PowerState, mode: AcMode) -> CurrentHeaterCoolerState {
    if !power.is_on() {
        return CurrentHeaterCoolerState::Inactive;
    }
    match mode {
        AcMode::Cool | AcMode::Dry => CurrentHeaterCoolerState::Cooling,
        AcMode::Heat => CurrentHeaterCoolerState::Heating,
        AcMode::Wind => CurrentHeaterCoolerState::Inactive,
        AcMode::Auto => CurrentHeaterCoolerState::Idle,
    }
}

/// Powered and doing more than moving air.
pub fn heater_cooler_active(power: PowerState, mode: AcMode) -> Active {
    Active::from_bool(heater_cooler_state(power, mode) != CurrentHeaterCoolerState::Inactive)
}

pub fn target_state_from_mode(mode: AcMode) -> TargetHeaterCoolerState {
    match mode {
        AcMode::Cool => TargetHeaterCoolerState::Cool,
        AcMode::Heat => TargetHeaterCoolerState::Heat,
        AcMode::Dry | AcMode::Wind | AcMode::Auto => TargetHeaterCoolerState::Auto,
    }
}

pub fn mode_from_target_state(target: TargetHeaterCoolerState) -> AcMode {
    match target {
        TargetHeaterCoolerState::Cool => AcMode::Cool,
        TargetHeaterCoolerState::Heat => AcMode::Heat,
        TargetHeaterCoolerState::Auto => AcMode::Auto,
    }
}

pub fn current_fan_state(power: PowerState) -> CurrentFanState {
    if power.is_on() {
        CurrentFanState::BlowingAir
    } else {
        CurrentFanState::Inactive
    }
}

pub fn fan_speed_to_percentage(speed: FanSpeed) -> f64 {
    match speed {
        FanSpeed::Auto => 0.0,
        FanSpeed::Low => 25.0,
        FanSpeed::Medium => 50.0,
        FanSpeed::High => 75.0,
        FanSpeed::Turbo => 100.0,
    }
}

/// Only exact steps map back; the exposed control never produces anything else.
pub fn fan_speed_from_percentage(percent: f64) -> Option<FanSpeed> {
    if percent.fract() != 0.0 {
        return None;
    }
    match percent as i64 {
        0 => Some(FanSpeed::Auto),
        25 => Some(FanSpeed::Low),
        50 => Some(FanSpeed::Medium),
        75 => Some(FanSpeed::High),
        100 => Some(FanSpeed::Turbo),
        _ => None,
    }
}

pub fn target_fan_state_from_speed(speed: FanSpeed) -> TargetFanState {
    match speed {
        FanSpeed::Auto => TargetFanState::Auto,
        _ => TargetFanState::Manual,
    }
}

pub fn fan_speed_for_target(target: TargetFanState) -> FanSpeed {
    match target {
        TargetFanState::Auto => FanSpeed::Auto,
        TargetFanState::Manual => FanSpeed::Medium,
    }
}

pub fn swing_from_oscillation(oscillation: &FanOscillation) -> SwingMode {
    match oscillation {
        FanOscillation::All => SwingMode::Enabled,
        FanOscillation::Fixed | FanOscillation::Other(_) => SwingMode::Disabled,
    }
}

pub fn oscillation_from_swing(swing: SwingMode) -> FanOscillation {
    match swing {
        SwingMode::Enabled => FanOscillation::All,
        SwingMode::Disabled => FanOscillation::Fixed,
    }
}

/// Swing on means normal airflow, i.e. wind-free off.
pub fn swing_from_optional_mode(mode: OptionalMode) -> SwingMode {
    match mode {
        OptionalMode::Off => SwingMode::Enabled,
        OptionalMode::WindFree => SwingMode::Disabled,
    }
}

pub fn optional_mode_from_swing(swing: SwingMode) -> OptionalMode {
    match swing {
        SwingMode::Enabled => OptionalMode::Off,
        SwingMode::Disabled => OptionalMode::WindFree,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_speed_percentage_round_trip() {
        for speed in FanSpeed::ALL {
            let pct = fan_speed_to_percentage(speed);
            assert_eq!(pct % ROTATION_STEP, 0.0);
            assert_eq!(fan_speed_from_percentage(pct), Some(speed));
        }
    }

    #[test]
    fn off_step_percentages_do_not_map() {
        assert_eq!(fan_speed_from_percentage(30.0), None);
        assert_eq!(fan_speed_from_percentage(25.5), None);
        assert_eq!(fan_speed_from_percentage(125.0), None);
    }

    #[test]
    fn active_requires_power_and_non_fan_mode() {
        assert_eq!(heater_cooler_active(PowerState::On, AcMode::Wind), Active::Inactive);
        assert_eq!(heater_cooler_active(PowerState::On, AcMode::Cool), Active::Active);
        assert_eq!(heater_cooler_active(PowerState::On, AcMode::Auto), Active::Active);
        for mode in [AcMode::Cool, AcMode::Heat, AcMode::Dry, AcMode::Wind, AcMode::Auto] {
            assert_eq!(heater_cooler_active(PowerState::Off, mode), Active::Inactive);
        }
    }

    #[test]
    fn current_state_table() {
        use CurrentHeaterCoolerState::*;
        assert_eq!(heater_cooler_state(PowerState::On, AcMode::Cool), Cooling);
        assert_eq!(heater_cooler_state(PowerState::On, AcMode::Dry), Cooling);
        assert_eq!(heater_cooler_state(PowerState::On, AcMode::Heat), Heating);
        assert_eq!(heater_cooler_state(PowerState::On, AcMode::Wind), Inactive);
        assert_eq!(heater_cooler_state(PowerState::On, AcMode::Auto), Idle);
    }

    #[test]
    fn dry_and_wind_have_no_target_equivalent() {
        assert_eq!(target_state_from_mode(AcMode::Dry), TargetHeaterCoolerState::Auto);
        assert_eq!(target_state_from_mode(AcMode::Wind), TargetHeaterCoolerState::Auto);
        for target in [
            TargetHeaterCoolerState::Auto,
            TargetHeaterCoolerState::Heat,
            TargetHeaterCoolerState::Cool,
        ] {
            assert_eq!(target_state_from_mode(mode_from_target_state(target)), target);
        }
    }

    #[test]
    fn swing_tables() {
        assert_eq!(swing_from_oscillation(&FanOscillation::All), SwingMode::Enabled);
        assert_eq!(
            swing_from_oscillation(&FanOscillation::Other("vertical".into())),
            SwingMode::Disabled
        );
        assert_eq!(oscillation_from_swing(SwingMode::Disabled), FanOscillation::Fixed);
        assert_eq!(swing_from_optional_mode(OptionalMode::WindFree), SwingMode::Disabled);
        assert_eq!(optional_mode_from_swing(SwingMode::Enabled), OptionalMode::Off);
    }
}
