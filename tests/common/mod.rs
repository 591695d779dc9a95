#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use coolprop_state::oracle::Input;
use coolprop_state::{OracleError, PropertyOracle};

type FluidFn = dyn Fn(&str, Input<'_>, Input<'_>) -> Result<f64, OracleError> + Send + Sync;
type HumidAirFn =
    dyn Fn(&str, Input<'_>, Input<'_>, Input<'_>) -> Result<f64, OracleError> + Send + Sync;

/// Saturation pressure of water at 373.15 K (Pa).
pub const PSAT_WATER_373: f64 = 101_418.0;

/// Deterministic stand-in for CoolProp that counts engine calls.
pub struct MockOracle {
    calls: AtomicUsize,
    fluids: Vec<&'static str>,
    version: Option<String>,
    fluid: Box<FluidFn>,
    humid_air: Box<HumidAirFn>,
}

impl MockOracle {
    /// Knows water and R134a; answers from fixed psychrometric and
    /// steam-table values.
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fluids: vec!["Water", "R134a"],
            version: Some("6.6.0-mock".to_string()),
            fluid: Box::new(water_table),
            humid_air: Box::new(air_table),
        }
    }

    pub fn with_fluid_fn(
        mut self,
        f: impl Fn(&str, Input<'_>, Input<'_>) -> Result<f64, OracleError> + Send + Sync + 'static,
    ) -> Self {
        self.fluid = Box::new(f);
        self
    }

    pub fn with_humid_air_fn(
        mut self,
        f: impl Fn(&str, Input<'_>, Input<'_>, Input<'_>) -> Result<f64, OracleError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.humid_air = Box::new(f);
        self
    }

    /// Accept `name` at bind time as well.
    pub fn knowing(mut self, name: &'static str) -> Self {
        self.fluids.push(name);
        self
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Engine calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PropertyOracle for MockOracle {
    fn props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        fluid: &str,
    ) -> Result<f64, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_known_fluid(fluid) {
            return Err(OracleError::UnknownFluid(fluid.to_string()));
        }
        (self.fluid)(output, in1, in2)
    }

    fn ha_props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        in3: Input<'_>,
    ) -> Result<f64, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.humid_air)(output, in1, in2, in3)
    }

    fn is_known_fluid(&self, fluid: &str) -> bool {
        self.fluids.iter().any(|f| f.eq_ignore_ascii_case(fluid))
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }
}

fn input(name: &str, inputs: &[Input<'_>]) -> Option<f64> {
    inputs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

/// Humid air at 20 °C, 1 atm, 50 % RH.
fn air_table(output: &str, a: Input<'_>, b: Input<'_>, c: Input<'_>) -> Result<f64, OracleError> {
    let inputs = [a, b, c];
    if input("P", &inputs).is_none() {
        return Err(OracleError::Inadmissible("pressure must be an input".into()));
    }
    Ok(match output {
        "T" => 293.15,
        "P" => 101_325.0,
        "R" => 0.5,
        "W" => 0.00728,
        "B" => 286.9,
        "D" => 282.44,
        "H" => 38_622.0,
        "S" => 139.7,
        "V" => 0.8393,
        "C" => 1_019.0,
        "M" => 1.81e-5,
        "K" => 0.0257,
        other => return Err(OracleError::Inadmissible(format!("unknown output {other}"))),
    })
}

/// Water near the normal boiling point: vapour below the saturation
/// pressure, liquid above, two-phase whenever quality is an input.
fn water_table(output: &str, a: Input<'_>, b: Input<'_>) -> Result<f64, OracleError> {
    let inputs = [a, b];
    let two_phase = input("Q", &inputs).is_some();
    let vapour = !two_phase && input("P", &inputs).is_some_and(|p| p < PSAT_WATER_373);

    let (phase, density, enthalpy, entropy, cp) = if two_phase {
        (6.0, 1.19, 1_292_000.0, 3_800.0, 2_100.0)
    } else if vapour {
        (5.0, 0.5896, 2_675_600.0, 7_355.0, 2_080.0)
    } else {
        (0.0, 958.4, 419_100.0, 1_307.0, 4_216.0)
    };

    Ok(match output {
        "Phase" => phase,
        "Dmass" => density,
        "Hmass" => enthalpy,
        "Smass" => entropy,
        "Cpmass" => cp,
        "Cvmass" => cp * 0.75,
        "Umass" => enthalpy - 100_000.0,
        "A" => 472.0,
        "V" => 1.2e-5,
        "L" => 0.025,
        "T" => input("T", &inputs).unwrap_or(373.124),
        "P" => input("P", &inputs).unwrap_or(101_325.0),
        "Q" => input("Q", &inputs).unwrap_or(0.5),
        other => return Err(OracleError::Inadmissible(format!("unknown output {other}"))),
    })
}

/// Installs a test subscriber once so `RUST_LOG=debug` shows engine
/// traffic.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
