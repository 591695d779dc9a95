mod common;

use common::MockOracle;
use coolprop_state::{
    ArityError, FluidProp, FluidState, HumidAirConfig, HumidAirProp, HumidAirState,
    OverflowPolicy, StateError,
};
use proptest::prelude::*;

fn water() -> FluidState {
    FluidState::with_fluid(MockOracle::new().shared(), "Water", &[]).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  Arity
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fluid_takes_two_constraints() {
    let mut s = water();
    s.set_temperature(373.15).unwrap();
    s.set_pressure(101_325.0).unwrap();
    assert!(s.is_complete());

    let err = s.set_density(958.0).unwrap_err();
    assert_eq!(err, StateError::Arity(ArityError::Full { code: "dens", max: 2 }));
    assert_eq!(
        err.to_string(),
        "cannot set dens - system is already fully constrained with 2 properties"
    );
    assert_eq!(s.constraints().properties.len(), 2);
}

#[test]
fn overwriting_an_active_code_is_not_overflow() {
    let mut s = water();
    s.set_temperature(373.15).unwrap();
    s.set_pressure(101_325.0).unwrap();
    s.set_pressure(200_000.0).unwrap();
    assert_eq!(
        s.constraints().properties,
        vec![(FluidProp::Temperature, 373.15), (FluidProp::Pressure, 200_000.0)]
    );
}

#[test]
fn humid_air_takes_three_with_pressure() {
    let mut air = HumidAirState::new(MockOracle::new().shared());
    air.set_temperature(293.15).unwrap();
    air.set_relative_humidity(0.5).unwrap();
    assert!(matches!(
        air.set_wet_bulb(286.0),
        Err(StateError::Arity(ArityError::MissingRequired { required: "press" }))
    ));
    air.set_pressure(101_325.0).unwrap();
    assert!(air.is_complete());
    assert!(matches!(air.set_wet_bulb(286.0), Err(StateError::Arity(ArityError::Full { max: 3, .. }))));
}

#[test]
fn rolling_window_is_opt_in() {
    let oracle = MockOracle::new().shared();
    let mut s = FluidState::with_config(oracle, OverflowPolicy::EvictOldest);
    s.set_fluid("Water").unwrap();
    s.set_temperature(373.15).unwrap();
    s.set_pressure(101_325.0).unwrap();
    s.set_quality(1.0).unwrap();
    assert_eq!(
        s.constraints().properties,
        vec![(FluidProp::Pressure, 101_325.0), (FluidProp::Quality, 1.0)]
    );
}

#[test]
fn humid_air_rolling_window_keeps_pressure() {
    let cfg = HumidAirConfig::open().overflow(OverflowPolicy::EvictOldest);
    let mut air = HumidAirState::with_config(MockOracle::new().shared(), cfg).unwrap();
    air.set_pressure(101_325.0).unwrap();
    air.set_temperature(293.15).unwrap();
    air.set_relative_humidity(0.5).unwrap();
    air.set_dew_point(282.0).unwrap();
    let codes: Vec<_> = air.constraints().properties.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        codes,
        [HumidAirProp::Pressure, HumidAirProp::RelativeHumidity, HumidAirProp::DewPoint]
    );
}

// ═══════════════════════════════════════════════════════════════════
//  reset / replace
// ═══════════════════════════════════════════════════════════════════

#[test]
fn reset_only_touches_active_codes() {
    let mut s = water();
    s.set_temperature(373.15).unwrap();
    assert_eq!(
        s.reset(FluidProp::Pressure, 1e5),
        Err(StateError::Arity(ArityError::NotActive("press")))
    );
    s.reset(FluidProp::Temperature, 300.0).unwrap();
    assert_eq!(s.temperature(), Ok(300.0));
}

#[test]
fn replace_swaps_in_one_step() {
    let mut s = water();
    s.set_temperature(373.15).unwrap();
    s.set_pressure(101_325.0).unwrap();
    s.replace(FluidProp::Temperature, FluidProp::Quality, 0.0).unwrap();
    assert_eq!(
        s.constraints().properties,
        vec![(FluidProp::Pressure, 101_325.0), (FluidProp::Quality, 0.0)]
    );
}

#[test]
fn replace_failures_change_nothing() {
    let mut s = water();
    s.set_temperature(373.15).unwrap();
    s.set_pressure(101_325.0).unwrap();
    let before = s.constraints();
    let r#gen = s.generation();

    assert_eq!(
        s.replace(FluidProp::Temperature, FluidProp::Pressure, 2e5),
        Err(StateError::Arity(ArityError::AlreadyActive("press")))
    );
    assert_eq!(
        s.replace(FluidProp::Density, FluidProp::Enthalpy, 4e5),
        Err(StateError::Arity(ArityError::NotActive("dens")))
    );
    assert!(s.replace(FluidProp::Temperature, FluidProp::Quality, 7.0).is_err());

    assert_eq!(s.constraints(), before);
    assert_eq!(s.generation(), r#gen);
}

#[test]
fn humid_air_replace_keeps_pressure() {
    let mut air = HumidAirState::with_constraints(
        MockOracle::new().shared(),
        &[
            (HumidAirProp::Pressure, 101_325.0),
            (HumidAirProp::Temperature, 293.15),
            (HumidAirProp::RelativeHumidity, 0.5),
        ],
    )
    .unwrap();
    assert!(matches!(
        air.replace(HumidAirProp::Pressure, HumidAirProp::WetBulb, 286.0),
        Err(StateError::Arity(ArityError::MissingRequired { .. }))
    ));
    air.replace(HumidAirProp::RelativeHumidity, HumidAirProp::HumidityRatio, 0.0073).unwrap();
    assert_eq!(air.humidity_ratio(), Ok(0.0073));
}

// ═══════════════════════════════════════════════════════════════════
//  Invariants
// ═══════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn set_then_get_is_exact(t in 200.0_f64..1_500.0, p in 1.0_f64..1.0e8) {
        let mut s = water();
        s.set_temperature(t).unwrap();
        s.set_pressure(p).unwrap();
        prop_assert_eq!(s.temperature().unwrap().to_bits(), t.to_bits());
        prop_assert_eq!(s.pressure().unwrap().to_bits(), p.to_bits());
    }

    #[test]
    fn generation_strictly_increases(values in prop::collection::vec(0.0_f64..1.0, 1..20)) {
        let mut air = HumidAirState::new(MockOracle::new().shared());
        let mut last = air.generation();
        for rh in values {
            air.set_relative_humidity(rh).unwrap();
            prop_assert!(air.generation() > last);
            last = air.generation();
        }
    }
}
