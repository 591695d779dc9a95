mod common;

use approx::assert_relative_eq;
use common::MockOracle;
use coolprop_state::{
    BindingError, FluidProp, FluidState, OracleError, Phase, ResolutionError, StateError,
};

fn water_at(t: f64, p: f64) -> (std::sync::Arc<MockOracle>, FluidState) {
    let oracle = MockOracle::new().shared();
    let state = FluidState::with_fluid(
        oracle.clone(),
        "Water",
        &[(FluidProp::Temperature, t), (FluidProp::Pressure, p)],
    )
    .unwrap();
    (oracle, state)
}

// ═══════════════════════════════════════════════════════════════════
//  Water at 100 °C
// ═══════════════════════════════════════════════════════════════════

#[test]
fn water_at_100c_1atm_is_vapour() {
    common::init_tracing();
    let (_, water) = water_at(373.15, 101_325.0);

    assert_eq!(water.phase(), Ok(Phase::Gas));
    assert_eq!(water.quality(), Ok(None));
    assert_relative_eq!(water.density().unwrap(), 0.5896);
    assert!(water.enthalpy().unwrap() > 2.5e6);
}

#[test]
fn raising_pressure_recomputes_density() {
    let (oracle, mut water) = water_at(373.15, 101_325.0);
    let vapour = water.density().unwrap();
    let calls = oracle.calls();

    water.reset(FluidProp::Pressure, 200_000.0).unwrap();
    let liquid = water.density().unwrap();

    assert!(oracle.calls() > calls);
    assert!(liquid > 900.0, "compressed water should be liquid, got {liquid} kg/m³");
    assert!(liquid > vapour * 1_000.0);
    assert_eq!(water.phase(), Ok(Phase::Liquid));
}

#[test]
fn saturated_state_reports_quality() {
    let oracle = MockOracle::new().shared();
    let mut water = FluidState::with_fluid(oracle.clone(), "Water", &[]).unwrap();
    water.set_pressure(101_325.0).unwrap();
    water.set_quality(0.25).unwrap();

    assert_eq!(water.quality(), Ok(Some(0.25)));
    assert_eq!(water.phase(), Ok(Phase::TwoPhase));
    assert_eq!(water.get_by_name("Q"), Ok(0.25));
}

#[test]
fn short_engine_tokens_reach_the_same_properties() {
    let (_, mut water) = water_at(300.0, 200_000.0);
    let pairs = [
        ("D", FluidProp::Density),
        ("H", FluidProp::Enthalpy),
        ("S", FluidProp::Entropy),
        ("C", FluidProp::Cp),
        ("O", FluidProp::Cv),
        ("U", FluidProp::InternalEnergy),
    ];
    for (token, code) in pairs {
        let by_token = water.get_by_name(token);
        assert!(by_token.is_ok(), "{token} should resolve, got {by_token:?}");
        assert_eq!(by_token, water.get(code), "{token} should read {code}");
    }

    water.replace(FluidProp::Temperature, FluidProp::Enthalpy, 419_100.0).unwrap();
    water.set_by_name("H", 420_000.0).unwrap();
    assert_eq!(water.enthalpy(), Ok(420_000.0));
}

#[test]
fn two_phase_quality_comes_from_engine() {
    let oracle = MockOracle::new()
        .with_fluid_fn(|out, _, _| match out {
            "Phase" => Ok(6.0),
            "Q" => Ok(0.4),
            _ => Ok(1.0),
        })
        .shared();
    let water = FluidState::with_fluid(
        oracle,
        "Water",
        &[(FluidProp::Pressure, 101_325.0), (FluidProp::Enthalpy, 1.3e6)],
    )
    .unwrap();
    assert_eq!(water.quality(), Ok(Some(0.4)));
    assert_eq!(water.get(FluidProp::Quality), Ok(0.4));
}

#[test]
fn quality_outside_dome_is_undefined() {
    let (_, water) = water_at(373.15, 200_000.0);
    assert_eq!(water.quality(), Ok(None));
    let err = water.get(FluidProp::Quality).unwrap_err();
    assert!(err.to_string().contains("liquid"), "{err}");
}

// ═══════════════════════════════════════════════════════════════════
//  Fluid identity
// ═══════════════════════════════════════════════════════════════════

#[test]
fn fluid_must_be_bound_first() {
    let mut state = FluidState::new(MockOracle::new().shared());
    assert_eq!(
        state.set_temperature(300.0),
        Err(StateError::Binding(BindingError::Unbound("tempk")))
    );
    assert!(!state.is_complete());
    state.set_fluid("R134a").unwrap();
    state.set_temperature(300.0).unwrap();
}

#[test]
fn fluid_cannot_be_rebound() {
    let (_, mut water) = water_at(373.15, 101_325.0);
    assert_eq!(water.set_fluid("Water"), Ok(()));
    let err = water.set_fluid("R134a").unwrap_err();
    assert_eq!(
        err,
        StateError::Binding(BindingError::AlreadyBound {
            bound: "Water".into(),
            requested: "R134a".into(),
        })
    );
}

#[test]
fn unknown_fluid_is_rejected_eagerly() {
    let oracle = MockOracle::new().shared();
    let err = FluidState::with_fluid(oracle.clone(), "Kryptonite", &[]).unwrap_err();
    assert_eq!(err, StateError::Resolution(ResolutionError::UnknownFluid("Kryptonite".into())));
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn backend_qualified_name_reaches_engine_unchanged() {
    let oracle = MockOracle::new()
        .knowing("INCOMP::MEG-20%")
        .with_fluid_fn(|_, _, _| Err(OracleError::UnknownFluid("INCOMP::MEG-20%".into())))
        .shared();
    let state = FluidState::with_fluid(
        oracle.clone(),
        "INCOMP::MEG-20%",
        &[(FluidProp::Temperature, 290.0), (FluidProp::Pressure, 101_325.0)],
    )
    .unwrap();
    assert_eq!(state.fluid(), Some("INCOMP::MEG-20%"));
    assert_eq!(oracle.calls(), 0);
    assert_eq!(
        state.density(),
        Err(StateError::Resolution(ResolutionError::UnknownFluid("INCOMP::MEG-20%".into())))
    );
}

#[test]
fn engine_inadmissible_state() {
    let oracle = MockOracle::new()
        .with_fluid_fn(|_, _, _| Err(OracleError::Inadmissible("inputs are not independent".into())))
        .shared();
    let state = FluidState::with_fluid(
        oracle,
        "Water",
        &[(FluidProp::Temperature, 373.15), (FluidProp::Pressure, 101_325.0)],
    )
    .unwrap();
    match state.cp() {
        Err(StateError::Resolution(ResolutionError::Inadmissible { inputs, requested, .. })) => {
            assert_eq!(inputs, ["tempk", "press"]);
            assert_eq!(requested, "cp");
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Snapshot and printout
// ═══════════════════════════════════════════════════════════════════

#[test]
fn snapshot_has_status_and_edition() {
    let (_, water) = water_at(373.15, 101_325.0);
    let snap = water.constraints();
    assert_eq!(snap.fluid.as_deref(), Some("Water"));
    assert_eq!(snap.status, Some(Phase::Gas));
    assert_eq!(snap.edition.as_deref(), Some("6.6.0-mock"));

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["status"], "gas");
    assert_eq!(json["properties"][1][0], "pressure");
}

#[test]
fn incomplete_snapshot_has_no_status() {
    let oracle = MockOracle::new().without_version().shared();
    let mut state = FluidState::with_fluid(oracle.clone(), "R134a", &[]).unwrap();
    state.set_celsius(25.0).unwrap();
    let snap = state.constraints();
    assert!(!snap.is_complete);
    assert_eq!(snap.status, None);
    assert_eq!(snap.edition, None);
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn printout_shows_phase_and_quality() {
    let (_, water) = water_at(373.15, 101_325.0);
    let text = water.to_string();
    assert!(text.starts_with("Water (2 of 2 constraints)"));
    assert!(text.contains("* tempk"));
    assert!(text.contains("phase      = gas"));
    assert!(text.contains("quality    = - (single phase)"));
}
