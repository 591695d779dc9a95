//! # coolprop-state
//!
//! Thermodynamic state objects on top of
//! [CoolProp](http://www.coolprop.org): set any valid combination of
//! properties, read any other.
//!
//! ## Highlights
//!
//! * **Humid air**: `HumidAirState`, defined by three properties (one of
//!   them pressure) or two at a fixed reference pressure
//! * **Pure fluids**: `FluidState`, defined by a fluid name plus any two
//!   independent properties
//! * **Lazy and cached**: derived values are computed on first read and
//!   reused until a defining property changes
//! * **Validated**: impossible inputs are rejected before they reach the
//!   engine; engine output is range-checked on the way back
//! * **Pluggable engine**: everything goes through [`PropertyOracle`], so
//!   tests can run without the CoolProp shared library
//!
//! ## Quick example
//!
//! ```no_run
//! use coolprop_state::{HumidAirState, FluidState};
//!
//! let mut air = HumidAirState::coolprop()?;
//! air.set_celsius(20.0)?;
//! air.set_pressure(101_325.0)?;
//! air.set_relative_humidity(0.5)?;
//! println!("dew point = {:.2} K", air.dew_point()?);
//!
//! let mut water = FluidState::coolprop_fluid("Water")?;
//! water.set_temperature(373.15)?;
//! water.set_pressure(101_325.0)?;
//! println!("{water}");
//! # Ok::<(), coolprop_state::StateError>(())
//! ```
//!
//! ## Units
//!
//! The core is strictly SI.  [`get_in`](HumidAirState::get_in) and
//! [`set_in`](HumidAirState::set_in) convert at the boundary through a
//! [`Converter`]:
//!
//! ```no_run
//! use coolprop_state::{Converter, HumidAirState, HumidAirProp, UnitSystem};
//!
//! let air = HumidAirState::coolprop()?;
//! let hvac = Converter::new(UnitSystem::hvac());
//! let rh_percent = air.get_in(HumidAirProp::RelativeHumidity, &hvac)?;
//! # Ok::<(), coolprop_state::StateError>(())
//! ```
//!
//! ## Locating CoolProp
//!
//! The shared library is looked up through `COOLPROP_PATH` (a `.env`
//! file is honoured), then the platform's standard install locations,
//! then the system loader search path.

// ── Internal modules ─────────────────────────────────────────────────
pub mod backend;
pub mod cache;
pub mod error;
pub mod oracle;
pub mod properties;
pub mod registry;
pub mod resolver;
pub mod state;
pub mod sys;
pub mod validate;

// ── Public re-exports ────────────────────────────────────────────────
pub use backend::coolprop::{COOLPROP_PATH_VAR, CoolPropLibrary};
pub use error::{
    ArityError, BindingError, ResolutionError, Result, StateError, ValidationError,
};
pub use oracle::{OracleError, PropertyOracle};
pub use properties::{FluidProp, HumidAirProp, Phase, PropertyCode};
pub use registry::OverflowPolicy;
pub use state::{
    FluidConstraints, FluidState, HumidAirConfig, HumidAirConstraints, HumidAirState,
};

pub use converter::{
    Converter, UnitSystem,
    TempUnit, PressUnit, FractionUnit, EnergyUnit, EntropyUnit, Quantity,
};
