use std::fmt;
use std::sync::Arc;

use converter::Converter;
use serde::Serialize;
use tracing::debug;

use super::{StateCore, celsius_converter, write_row};
use crate::backend::coolprop::CoolPropLibrary;
use crate::error::{BindingError, ResolutionError, Result};
use crate::oracle::PropertyOracle;
use crate::properties::{FluidProp, Phase, PropertyCode};
use crate::registry::{ConstraintRegistry, OverflowPolicy};
use crate::resolver::FluidResolver;

/// Serializable snapshot of what currently defines a fluid state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluidConstraints {
    pub properties: Vec<(FluidProp, f64)>,
    pub fluid: Option<String>,
    pub is_complete: bool,
    /// Phase region, when the state is complete and resolvable.
    pub status: Option<Phase>,
    /// Property engine version.
    pub edition: Option<String>,
}

/// Thermodynamic state of a pure or pseudo-pure fluid.
///
/// The fluid is bound once; after that any two independent properties
/// define the state and everything else is derived lazily. All values
/// are SI and mass based.
///
/// ```no_run
/// use coolprop_state::FluidState;
///
/// let mut water = FluidState::coolprop_fluid("Water")?;
/// water.set_temperature(373.15)?;
/// water.set_pressure(101_325.0)?;
/// println!("rho = {:.3} kg/m³ ({})", water.density()?, water.phase()?);
/// # Ok::<(), coolprop_state::StateError>(())
/// ```
#[derive(Clone)]
pub struct FluidState {
    core: StateCore<FluidProp>,
    fluid: Option<String>,
}

impl FluidState {
    // ================================================================
    //  Constructors
    // ================================================================

    /// Unbound state; call [`set_fluid`](Self::set_fluid) before use.
    pub fn new(oracle: Arc<dyn PropertyOracle>) -> Self {
        Self::with_config(oracle, OverflowPolicy::default())
    }

    /// Unbound state with an explicit overflow policy.
    pub fn with_config(oracle: Arc<dyn PropertyOracle>, overflow: OverflowPolicy) -> Self {
        let registry = ConstraintRegistry::new(2).with_policy(overflow);
        Self { core: StateCore::new(oracle, registry), fluid: None }
    }

    /// Bind `fluid` and apply `constraints` in order.
    pub fn with_fluid(
        oracle: Arc<dyn PropertyOracle>,
        fluid: &str,
        constraints: &[(FluidProp, f64)],
    ) -> Result<Self> {
        let mut state = Self::new(oracle);
        state.set_fluid(fluid)?;
        for &(code, value) in constraints {
            state.set(code, value)?;
        }
        Ok(state)
    }

    /// State for `fluid` backed by the process-wide CoolProp library.
    pub fn coolprop_fluid(fluid: &str) -> Result<Self> {
        let lib: Arc<dyn PropertyOracle> = CoolPropLibrary::shared()?;
        Self::with_fluid(lib, fluid, &[])
    }

    // ── Fluid identity ──────────────────────────────────────────────

    /// Bind the fluid identity. Binding the same name again is a no-op;
    /// the identity cannot change afterwards.
    pub fn set_fluid(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BindingError::Empty.into());
        }
        match &self.fluid {
            Some(bound) if bound == name => Ok(()),
            Some(bound) => Err(BindingError::AlreadyBound {
                bound: bound.clone(),
                requested: name.to_string(),
            }
            .into()),
            None => {
                if !self.core.oracle.is_known_fluid(name) {
                    return Err(ResolutionError::UnknownFluid(name.to_string()).into());
                }
                debug!(fluid = name, "fluid bound");
                self.fluid = Some(name.to_string());
                self.core.registry.touch();
                Ok(())
            }
        }
    }

    pub fn fluid(&self) -> Option<&str> {
        self.fluid.as_deref()
    }

    fn bound(&self, what: &'static str) -> Result<&str> {
        self.fluid.as_deref().ok_or_else(|| BindingError::Unbound(what).into())
    }

    fn resolver<'a>(&'a self, fluid: &'a str) -> FluidResolver<'a> {
        FluidResolver::new(self.core.oracle.as_ref(), fluid, self.core.registry.constraints())
    }

    // ================================================================
    //  Generic access
    // ================================================================

    /// Value of `code` in SI units.
    ///
    /// Quality outside the two-phase region is an error here; use
    /// [`quality`](Self::quality) to get `None` instead. The phase reads
    /// back as its engine index.
    pub fn get(&self, code: FluidProp) -> Result<f64> {
        let fluid = self.bound(code.name())?;
        match code {
            FluidProp::Quality => match self.quality()? {
                Some(q) => Ok(q),
                None => Err(ResolutionError::Inadmissible {
                    inputs: self.core.registry.codes().map(|c| c.name()).collect(),
                    requested: code.name(),
                    reason: format!("quality is undefined in the {} region", self.phase()?),
                }
                .into()),
            },
            FluidProp::Phase => self.phase().map(|p| p.index() as f64),
            _ => self.core.cached(code, || self.resolver(fluid).resolve(code)),
        }
    }

    /// Make `code` a defining property with `value` (SI units).
    pub fn set(&mut self, code: FluidProp, value: f64) -> Result<()> {
        self.bound(code.name())?;
        self.core.registry.set(code, value)
    }

    pub fn get_many(&self, codes: &[FluidProp]) -> Result<Vec<f64>> {
        codes.iter().map(|&c| self.get(c)).collect()
    }

    /// Read by attribute name or engine token (`"dens"`, `"Dmass"`).
    pub fn get_by_name(&self, name: &str) -> Result<f64> {
        self.get(name.parse()?)
    }

    pub fn set_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        self.set(name.parse()?, value)
    }

    /// Overwrite an already-defining property.
    pub fn reset(&mut self, code: FluidProp, value: f64) -> Result<()> {
        self.bound(code.name())?;
        self.core.registry.reset(code, value)
    }

    /// Swap defining property `old` for `new` in one step.
    pub fn replace(&mut self, old: FluidProp, new: FluidProp, value: f64) -> Result<()> {
        self.bound(new.name())?;
        self.core.registry.replace(old, new, value)
    }

    // ── Phase and quality ───────────────────────────────────────────

    /// Phase region as classified by the engine.
    pub fn phase(&self) -> Result<Phase> {
        let fluid = self.bound(FluidProp::Phase.name())?;
        let raw = self.core.cached(FluidProp::Phase, || {
            self.resolver(fluid).phase().map(|p| p.index() as f64)
        })?;
        Phase::from_index(raw).ok_or_else(|| {
            ResolutionError::OutOfRange { code: FluidProp::Phase.name(), value: raw }.into()
        })
    }

    /// Vapor quality, `None` outside the two-phase region. A quality
    /// constraint reads back exactly as set.
    pub fn quality(&self) -> Result<Option<f64>> {
        let fluid = self.bound(FluidProp::Quality.name())?;
        if let Some(q) = self.core.registry.value(FluidProp::Quality) {
            return Ok(Some(q));
        }
        let phase = self.phase()?;
        if !phase.is_two_phase() {
            return Ok(None);
        }
        self.core
            .cached(FluidProp::Quality, || self.resolver(fluid).resolve(FluidProp::Quality))
            .map(Some)
    }

    pub fn set_quality(&mut self, value: f64) -> Result<()> {
        self.set(FluidProp::Quality, value)
    }

    // ── Boundary units ──────────────────────────────────────────────

    /// Value of `code` in the converter's units.
    pub fn get_in(&self, code: FluidProp, conv: &Converter) -> Result<f64> {
        Ok(conv.from_si(code.quantity(), self.get(code)?))
    }

    pub fn set_in(&mut self, code: FluidProp, value: f64, conv: &Converter) -> Result<()> {
        self.set(code, conv.to_si(code.quantity(), value))
    }

    pub fn celsius(&self) -> Result<f64> {
        self.get_in(FluidProp::Temperature, &celsius_converter())
    }

    pub fn set_celsius(&mut self, value: f64) -> Result<()> {
        self.set_in(FluidProp::Temperature, value, &celsius_converter())
    }

    // ── Introspection ───────────────────────────────────────────────

    pub fn constraints(&self) -> FluidConstraints {
        FluidConstraints {
            properties: self.core.registry.constraints().to_vec(),
            fluid: self.fluid.clone(),
            is_complete: self.is_complete(),
            status: if self.is_complete() { self.phase().ok() } else { None },
            edition: self.core.oracle.version(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.fluid.is_some() && self.core.registry.is_complete()
    }

    /// Registry generation, bumped by every successful write.
    pub fn generation(&self) -> u64 {
        self.core.registry.generation()
    }

    /// Derived values currently valid in the cache.
    pub fn cached_len(&self) -> usize {
        self.core.cache.live(self.generation())
    }
}

named_accessors! {
    FluidState, FluidProp;
    /// Temperature (K).
    temperature / set_temperature => Temperature,
    /// Pressure (Pa).
    pressure / set_pressure => Pressure,
    /// Mass density (kg/m³).
    density / set_density => Density,
    enthalpy / set_enthalpy => Enthalpy,
    entropy / set_entropy => Entropy,
    internal_energy / set_internal_energy => InternalEnergy,
    cp => Cp,
    cv => Cv,
    speed_of_sound => SpeedOfSound,
    viscosity => Viscosity,
    conductivity => Conductivity,
}

impl fmt::Display for FluidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = &self.core.registry;
        let name = self.fluid.as_deref().unwrap_or("<unbound>");
        writeln!(f, "{name} ({} of {} constraints)", registry.len(), registry.arity())?;
        for &code in FluidProp::ALL {
            let pinned = registry.contains(code);
            match code {
                FluidProp::Phase if self.is_complete() => match self.phase() {
                    Ok(p) => writeln!(f, "  {:<10} = {p}", code.name())?,
                    Err(e) => writeln!(f, "  {:<10} = n/a ({e})", code.name())?,
                },
                FluidProp::Quality if !pinned && self.is_complete() => match self.quality() {
                    Ok(Some(q)) => write_row(f, code, false, &Ok(q))?,
                    Ok(None) => writeln!(f, "  {:<10} = - (single phase)", code.name())?,
                    Err(e) => write_row(f, code, false, &Err(e))?,
                },
                FluidProp::Phase | FluidProp::Quality if !self.is_complete() && !pinned => {}
                _ if pinned || self.is_complete() => write_row(f, code, pinned, &self.get(code))?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FluidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluidState")
            .field("fluid", &self.fluid)
            .field("constraints", &self.core.registry.constraints())
            .field("generation", &self.generation())
            .finish()
    }
}
