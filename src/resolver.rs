//! Turns a constraint snapshot plus a requested code into a value.
//!
//! Resolution never mutates anything: for a fixed snapshot the result
//! depends only on the requested code, which is what makes the
//! generation-tagged cache sound.

use tracing::debug;

use crate::error::{ArityError, ResolutionError, Result};
use crate::oracle::{Input, OracleError, PropertyOracle};
use crate::properties::{FluidProp, HumidAirProp, Phase, PropertyCode};
use crate::validate::check_output;

/// A constraint's own value, or the inverse of its reciprocal's.
fn pinned<C: PropertyCode>(constraints: &[(C, f64)], code: C) -> Option<f64> {
    let value = |code: C| constraints.iter().find(|(c, _)| *c == code).map(|(_, v)| *v);
    value(code).or_else(|| code.reciprocal().and_then(value).map(|v| 1.0 / v))
}

fn translate(
    err: OracleError,
    inputs: Vec<&'static str>,
    requested: &'static str,
) -> ResolutionError {
    match err {
        OracleError::UnknownFluid(name) => ResolutionError::UnknownFluid(name),
        OracleError::Inadmissible(reason) | OracleError::OutOfRange(reason) => {
            ResolutionError::Inadmissible { inputs, requested, reason }
        }
    }
}

// ── Humid air ───────────────────────────────────────────────────────

/// Resolver for humid-air states (three engine inputs, one of them
/// pressure).
pub struct HumidAirResolver<'a> {
    oracle: &'a dyn PropertyOracle,
    constraints: &'a [(HumidAirProp, f64)],
    /// Pressure held outside the constraint set, when configured.
    reference_pressure: Option<f64>,
}

impl<'a> HumidAirResolver<'a> {
    pub fn new(
        oracle: &'a dyn PropertyOracle,
        constraints: &'a [(HumidAirProp, f64)],
        reference_pressure: Option<f64>,
    ) -> Self {
        Self { oracle, constraints, reference_pressure }
    }

    pub fn resolve(&self, code: HumidAirProp) -> Result<f64> {
        if let Some(v) = pinned(self.constraints, code) {
            return Ok(v);
        }
        if let (HumidAirProp::Pressure, Some(p)) = (code, self.reference_pressure) {
            return Ok(p);
        }

        let inputs = self.encode()?;
        let names = || inputs.iter().map(|(c, _)| c.name()).collect::<Vec<_>>();
        let [a, b, c] = [inputs[0].1, inputs[1].1, inputs[2].1];

        debug!(requested = %code, inputs = ?names(), "resolving humid-air property");
        let raw = self
            .oracle
            .ha_props_si(code.token(), a, b, c)
            .map_err(|e| translate(e, names(), code.name()))?;

        let value = match code {
            // The engine has no density output; invert specific volume.
            HumidAirProp::Density => {
                let v = check_output(HumidAirProp::SpecificVolume, raw)?;
                1.0 / v
            }
            _ => raw,
        };
        Ok(check_output(code, value)?)
    }

    /// Engine inputs: every constraint in insertion order, then the
    /// reference pressure. A density constraint travels as specific
    /// volume.
    fn encode(&self) -> Result<Vec<(HumidAirProp, Input<'static>)>> {
        let mut inputs: Vec<(HumidAirProp, Input<'static>)> = self
            .constraints
            .iter()
            .map(|&(code, v)| match code {
                HumidAirProp::Density => (code, (HumidAirProp::SpecificVolume.token(), 1.0 / v)),
                _ => (code, (code.token(), v)),
            })
            .collect();
        if let Some(p) = self.reference_pressure {
            inputs.push((HumidAirProp::Pressure, (HumidAirProp::Pressure.token(), p)));
        }
        if inputs.len() != 3 {
            return Err(ArityError::Underconstrained { have: inputs.len(), need: 3 }.into());
        }
        Ok(inputs)
    }
}

// ── Pure fluid ──────────────────────────────────────────────────────

/// Resolver for pure and pseudo-pure fluid states (two engine inputs
/// plus the fluid identity).
pub struct FluidResolver<'a> {
    oracle: &'a dyn PropertyOracle,
    fluid: &'a str,
    constraints: &'a [(FluidProp, f64)],
}

impl<'a> FluidResolver<'a> {
    pub fn new(
        oracle: &'a dyn PropertyOracle,
        fluid: &'a str,
        constraints: &'a [(FluidProp, f64)],
    ) -> Self {
        Self { oracle, fluid, constraints }
    }

    /// Any property by code. Quality is only meaningful once
    /// [`phase`](Self::phase) reports two-phase; the caller checks.
    pub fn resolve(&self, code: FluidProp) -> Result<f64> {
        if let Some(v) = pinned(self.constraints, code) {
            return Ok(v);
        }
        let [(c1, v1), (c2, v2)] = match self.constraints {
            [first, second] => [*first, *second],
            _ => {
                return Err(ArityError::Underconstrained {
                    have: self.constraints.len(),
                    need: 2,
                }
                .into());
            }
        };

        debug!(requested = %code, fluid = self.fluid, inputs = ?[c1, c2], "resolving fluid property");
        let raw = self
            .oracle
            .props_si(code.token(), (c1.token(), v1), (c2.token(), v2), self.fluid)
            .map_err(|e| translate(e, vec![c1.name(), c2.name()], code.name()))?;
        Ok(check_output(code, raw)?)
    }

    /// Phase region, decoded verbatim from the engine's phase index.
    pub fn phase(&self) -> Result<Phase> {
        let raw = self.resolve(FluidProp::Phase)?;
        Phase::from_index(raw).ok_or_else(|| {
            ResolutionError::OutOfRange { code: FluidProp::Phase.name(), value: raw }.into()
        })
    }
}
