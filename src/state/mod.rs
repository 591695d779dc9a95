//! User-facing state objects.
//!
//! [`HumidAirState`] and [`FluidState`] share one design: a validated
//! [`ConstraintRegistry`] decides which properties define the state, a
//! resolver asks the property engine for everything else, and a
//! [`DerivedCache`] keyed on the registry generation keeps repeated
//! reads free.

use std::fmt;
use std::sync::Arc;

use converter::{Converter, TempUnit, UnitSystem};

use crate::cache::DerivedCache;
use crate::error::Result;
use crate::oracle::PropertyOracle;
use crate::properties::PropertyCode;
use crate::registry::ConstraintRegistry;

/// Named getter (and optional setter) pairs forwarding to `get`/`set`.
macro_rules! named_accessors {
    ($state:ty, $prop:ident; $( $(#[$doc:meta])* $get:ident $(/ $set:ident)? => $code:ident ),* $(,)?) => {
        impl $state {
            $(
                $(#[$doc])*
                pub fn $get(&self) -> $crate::error::Result<f64> {
                    self.get($prop::$code)
                }

                $(
                    pub fn $set(&mut self, value: f64) -> $crate::error::Result<()> {
                        self.set($prop::$code, value)
                    }
                )?
            )*
        }
    };
}

mod fluid;
mod humid_air;

pub use fluid::{FluidConstraints, FluidState};
pub use humid_air::{HumidAirConfig, HumidAirConstraints, HumidAirState};

// ── Shared plumbing ─────────────────────────────────────────────────

/// Oracle handle, registry and cache owned by one state object.
#[derive(Clone)]
struct StateCore<C: PropertyCode> {
    oracle: Arc<dyn PropertyOracle>,
    registry: ConstraintRegistry<C>,
    cache: DerivedCache<C, f64>,
}

impl<C: PropertyCode> StateCore<C> {
    fn new(oracle: Arc<dyn PropertyOracle>, registry: ConstraintRegistry<C>) -> Self {
        Self { oracle, registry, cache: DerivedCache::new() }
    }

    /// Memoised value for `code` at the current generation.
    fn cached(&self, code: C, compute: impl FnOnce() -> Result<f64>) -> Result<f64> {
        self.cache.get_or_compute(code, self.registry.generation(), compute)
    }
}

fn celsius_converter() -> Converter {
    Converter::new(UnitSystem::si().temperature(TempUnit::Celsius))
}

/// One printout row: `*` marks a defining property.
fn write_row<C: PropertyCode>(
    f: &mut fmt::Formatter<'_>,
    code: C,
    pinned: bool,
    value: &Result<f64>,
) -> fmt::Result {
    let mark = if pinned { '*' } else { ' ' };
    match value {
        Ok(v) => writeln!(f, "{mark} {:<10} = {v:.6} {}", code.name(), code.unit()),
        Err(e) => writeln!(f, "{mark} {:<10} = n/a ({e})", code.name()),
    }
}
