//! The property-engine boundary.
//!
//! Everything the state objects know about thermodynamics comes through
//! [`PropertyOracle`]: a stateless, shareable service that maps named
//! inputs to a named output.  The production implementation is
//! [`CoolPropLibrary`](crate::backend::coolprop::CoolPropLibrary); tests
//! plug in a mock.

use thiserror::Error;

/// A failure reported by the property engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The inputs do not describe a reachable state.
    #[error("inadmissible state: {0}")]
    Inadmissible(String),

    /// The fluid string names nothing the engine knows.
    #[error("unknown fluid: {0}")]
    UnknownFluid(String),

    /// An input lies outside the engine's range of validity.
    #[error("out of range: {0}")]
    OutOfRange(String),
}

/// One named input to the engine, e.g. `("T", 293.15)`.
pub type Input<'a> = (&'a str, f64);

/// Stateless, read-only thermodynamic property engine.
///
/// Implementations must be safe to call from any thread; the state
/// objects share one instance behind an `Arc`.
pub trait PropertyOracle: Send + Sync {
    /// Pure-fluid property `output` at the state fixed by two inputs.
    fn props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        fluid: &str,
    ) -> Result<f64, OracleError>;

    /// Humid-air property `output` at the state fixed by three inputs.
    fn ha_props_si(
        &self,
        output: &str,
        in1: Input<'_>,
        in2: Input<'_>,
        in3: Input<'_>,
    ) -> Result<f64, OracleError>;

    /// Whether `fluid` may name a fluid or mixture the engine can load.
    /// `false` means the name is certainly refused; `true` may still be
    /// followed by `UnknownFluid` from the first property call.
    fn is_known_fluid(&self, fluid: &str) -> bool;

    /// Engine version string, if it reports one.
    fn version(&self) -> Option<String> {
        None
    }
}
