use std::fmt;
use std::sync::Arc;

use converter::Converter;
use serde::Serialize;

use super::{StateCore, celsius_converter, write_row};
use crate::backend::coolprop::CoolPropLibrary;
use crate::error::{ArityError, Result};
use crate::oracle::PropertyOracle;
use crate::properties::{HumidAirProp, PropertyCode};
use crate::registry::{ConstraintRegistry, OverflowPolicy};
use crate::resolver::HumidAirResolver;
use crate::validate::validate_input;

/// How a [`HumidAirState`] is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HumidAirConfig {
    /// When set, pressure is held here instead of in the constraint
    /// set, and two further properties define the state.
    pub reference_pressure: Option<f64>,
    pub overflow: OverflowPolicy,
}

impl HumidAirConfig {
    /// Three free constraints, one of which must be pressure.
    pub fn open() -> Self {
        Self::default()
    }

    /// Pressure fixed at `pressure` Pa; two free constraints.
    pub fn fixed_pressure(pressure: f64) -> Self {
        Self { reference_pressure: Some(pressure), ..Self::default() }
    }

    pub fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }
}

/// Serializable snapshot of what currently defines a humid-air state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidAirConstraints {
    pub properties: Vec<(HumidAirProp, f64)>,
    pub reference_pressure: Option<f64>,
    pub is_complete: bool,
}

/// Thermodynamic state of moist air.
///
/// Any three independent properties (pressure among them) define the
/// state; every other property is derived on first read and cached
/// until a constraint changes. Extensive properties are per kg of dry
/// air, all values SI.
///
/// ```no_run
/// use coolprop_state::HumidAirState;
///
/// let mut air = HumidAirState::coolprop()?;
/// air.set_temperature(293.15)?;
/// air.set_pressure(101_325.0)?;
/// air.set_relative_humidity(0.5)?;
/// println!("W = {:.5} kg/kg", air.humidity_ratio()?);
/// # Ok::<(), coolprop_state::StateError>(())
/// ```
#[derive(Clone)]
pub struct HumidAirState {
    core: StateCore<HumidAirProp>,
    reference_pressure: Option<f64>,
}

impl HumidAirState {
    // ================================================================
    //  Constructors
    // ================================================================

    pub fn new(oracle: Arc<dyn PropertyOracle>) -> Self {
        let registry = ConstraintRegistry::new(3).require(HumidAirProp::Pressure);
        Self { core: StateCore::new(oracle, registry), reference_pressure: None }
    }

    pub fn with_config(oracle: Arc<dyn PropertyOracle>, config: HumidAirConfig) -> Result<Self> {
        let registry = match config.reference_pressure {
            Some(p) => {
                validate_input(HumidAirProp::Pressure, p)?;
                ConstraintRegistry::new(2)
            }
            None => ConstraintRegistry::new(3).require(HumidAirProp::Pressure),
        };
        Ok(Self {
            core: StateCore::new(oracle, registry.with_policy(config.overflow)),
            reference_pressure: config.reference_pressure,
        })
    }

    /// Build and populate in one go; the pairs are applied in order.
    pub fn with_constraints(
        oracle: Arc<dyn PropertyOracle>,
        constraints: &[(HumidAirProp, f64)],
    ) -> Result<Self> {
        let mut state = Self::new(oracle);
        for &(code, value) in constraints {
            state.set(code, value)?;
        }
        Ok(state)
    }

    /// Empty state backed by the process-wide CoolProp library.
    pub fn coolprop() -> Result<Self> {
        let lib: Arc<dyn PropertyOracle> = CoolPropLibrary::shared()?;
        Ok(Self::new(lib))
    }

    // ================================================================
    //  Generic access
    // ================================================================

    /// Value of `code` in SI units.
    pub fn get(&self, code: HumidAirProp) -> Result<f64> {
        let core = &self.core;
        core.cached(code, || {
            HumidAirResolver::new(
                core.oracle.as_ref(),
                core.registry.constraints(),
                self.reference_pressure,
            )
            .resolve(code)
        })
    }

    /// Make `code` a defining property with `value` (SI units).
    pub fn set(&mut self, code: HumidAirProp, value: f64) -> Result<()> {
        match (code, self.reference_pressure) {
            (HumidAirProp::Pressure, Some(_)) => self.set_reference_pressure(value),
            _ => self.core.registry.set(code, value),
        }
    }

    pub fn get_many(&self, codes: &[HumidAirProp]) -> Result<Vec<f64>> {
        codes.iter().map(|&c| self.get(c)).collect()
    }

    /// Read by attribute name or engine token (`"humrat"`, `"W"`).
    pub fn get_by_name(&self, name: &str) -> Result<f64> {
        self.get(name.parse()?)
    }

    pub fn set_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        self.set(name.parse()?, value)
    }

    /// Overwrite an already-defining property.
    pub fn reset(&mut self, code: HumidAirProp, value: f64) -> Result<()> {
        match (code, self.reference_pressure) {
            (HumidAirProp::Pressure, Some(_)) => self.set_reference_pressure(value),
            _ => self.core.registry.reset(code, value),
        }
    }

    /// Swap defining property `old` for `new` in one step.
    pub fn replace(&mut self, old: HumidAirProp, new: HumidAirProp, value: f64) -> Result<()> {
        if new == HumidAirProp::Pressure && self.reference_pressure.is_some() {
            return Err(ArityError::AlreadyActive(new.name()).into());
        }
        self.core.registry.replace(old, new, value)
    }

    // ── Boundary units ──────────────────────────────────────────────

    /// Value of `code` in the converter's units.
    pub fn get_in(&self, code: HumidAirProp, conv: &Converter) -> Result<f64> {
        Ok(conv.from_si(code.quantity(), self.get(code)?))
    }

    pub fn set_in(&mut self, code: HumidAirProp, value: f64, conv: &Converter) -> Result<()> {
        self.set(code, conv.to_si(code.quantity(), value))
    }

    pub fn celsius(&self) -> Result<f64> {
        self.get_in(HumidAirProp::Temperature, &celsius_converter())
    }

    pub fn set_celsius(&mut self, value: f64) -> Result<()> {
        self.set_in(HumidAirProp::Temperature, value, &celsius_converter())
    }

    // ── Introspection ───────────────────────────────────────────────

    pub fn constraints(&self) -> HumidAirConstraints {
        HumidAirConstraints {
            properties: self.core.registry.constraints().to_vec(),
            reference_pressure: self.reference_pressure,
            is_complete: self.is_complete(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.core.registry.is_complete()
    }

    pub fn reference_pressure(&self) -> Option<f64> {
        self.reference_pressure
    }

    /// Registry generation, bumped by every successful write.
    pub fn generation(&self) -> u64 {
        self.core.registry.generation()
    }

    /// Derived values currently valid in the cache.
    pub fn cached_len(&self) -> usize {
        self.core.cache.live(self.generation())
    }

    // ── Internals ───────────────────────────────────────────────────

    fn set_reference_pressure(&mut self, value: f64) -> Result<()> {
        validate_input(HumidAirProp::Pressure, value)?;
        self.reference_pressure = Some(value);
        self.core.registry.touch();
        Ok(())
    }
}

named_accessors! {
    HumidAirState, HumidAirProp;
    /// Dry-bulb temperature (K).
    temperature / set_temperature => Temperature,
    /// Total pressure (Pa).
    pressure / set_pressure => Pressure,
    /// Relative humidity, 0–1.
    relative_humidity / set_relative_humidity => RelativeHumidity,
    /// Humidity ratio (kg water / kg dry air).
    humidity_ratio / set_humidity_ratio => HumidityRatio,
    /// Wet-bulb temperature (K).
    wet_bulb / set_wet_bulb => WetBulb,
    /// Dew-point temperature (K).
    dew_point / set_dew_point => DewPoint,
    /// Enthalpy (J/kg dry air).
    enthalpy / set_enthalpy => Enthalpy,
    /// Entropy (J/(kg·K) dry air).
    entropy / set_entropy => Entropy,
    /// Specific volume (m³/kg dry air).
    specific_volume / set_specific_volume => SpecificVolume,
    density / set_density => Density,
    cp => Cp,
    viscosity => Viscosity,
    conductivity => Conductivity,
}

impl fmt::Display for HumidAirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = &self.core.registry;
        writeln!(f, "humid air ({} of {} constraints)", registry.len(), registry.arity())?;
        if let Some(p) = self.reference_pressure {
            writeln!(f, "  reference pressure = {p} Pa")?;
        }
        for &code in HumidAirProp::ALL {
            let pinned = registry.contains(code)
                || (code == HumidAirProp::Pressure && self.reference_pressure.is_some());
            if pinned || self.is_complete() {
                write_row(f, code, pinned, &self.get(code))?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for HumidAirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumidAirState")
            .field("constraints", &self.core.registry.constraints())
            .field("reference_pressure", &self.reference_pressure)
            .field("generation", &self.generation())
            .finish()
    }
}
