use smartthings_ac::{AcMode, FanSpeed, OptionalMode, PowerState, Temperature, TemperatureUnit};

#[test]
fn celsius_passes_through() {
    let t = Temperature::from_vendor(22.5, TemperatureUnit::Celsius);
    assert_eq!(t.celsius(), 22.5);
    assert_eq!(t.to_vendor(TemperatureUnit::Celsius), 23);
}

#[test]
fn fahrenheit_setpoint_is_whole_degrees() {
    assert_eq!(Temperature::from_celsius(24.0).to_vendor(TemperatureUnit::Fahrenheit), 75);
    assert_eq!(Temperature::from_celsius(22.5).to_vendor(TemperatureUnit::Fahrenheit), 73);
}

#[test]
fn clamp_limits_setpoint() {
    assert_eq!(Temperature::from_celsius(35.0).clamp(10.0, 30.0).celsius(), 30.0);
    assert_eq!(Temperature::from_celsius(4.0).clamp(10.0, 30.0).celsius(), 10.0);
}

#[test]
fn display() {
    let t = Temperature::from_celsius(22.5);
    assert_eq!(format!("{t}"), "22.5\u{00b0}C");
}

#[test]
fn vendor_strings_roundtrip() {
    for mode in [AcMode::Cool, AcMode::Heat, AcMode::Dry, AcMode::Wind, AcMode::Auto] {
        assert_eq!(AcMode::from_smartthings_str(mode.as_smartthings_str()), Some(mode));
    }
    for speed in FanSpeed::ALL {
        assert_eq!(FanSpeed::from_smartthings_str(speed.as_smartthings_str()), Some(speed));
    }
    for state in [PowerState::On, PowerState::Off] {
        assert_eq!(PowerState::from_smartthings_str(state.as_smartthings_str()), Some(state));
    }
    for mode in [OptionalMode::Off, OptionalMode::WindFree] {
        assert_eq!(OptionalMode::from_smartthings_str(mode.as_smartthings_str()), Some(mode));
    }
}
