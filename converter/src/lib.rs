//! Boundary unit conversion for thermodynamic state values.
//!
//! State objects store and resolve everything in **SI**: K, Pa, kg/m³,
//! J/kg, J/(kg·K) and plain ratios.  This crate converts between those
//! canonical values and whatever units a caller wants to display or
//! type in (°C, bar, %, kJ/kg, …).  Nothing here ever reaches the
//! property engine.
//!
//! # Presets
//!
//! | Preset          | T   | P   | fraction | H      | S          |
//! |-----------------|-----|-----|----------|--------|------------|
//! | `si()`          | K   | Pa  | ratio    | J/kg   | J/(kg·K)   |
//! | `engineering()` | °C  | kPa | %        | kJ/kg  | kJ/(kg·K)  |
//! | `hvac()`        | °C  | bar | %        | kJ/kg  | kJ/(kg·K)  |
//!
//! # Builder
//!
//! ```
//! use converter::{UnitSystem, TempUnit, PressUnit};
//!
//! let units = UnitSystem::new()
//!     .temperature(TempUnit::Celsius)
//!     .pressure(PressUnit::Bar);
//! ```

// ────────────────────────────────────────────────────────────────────
//  Physical quantity tags
// ────────────────────────────────────────────────────────────────────

/// The kind of physical quantity a property carries.  Each property
/// code maps to exactly one of these, which selects the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Absolute temperature (K)
    Temperature,
    /// Absolute pressure (Pa)
    Pressure,
    /// Dimensionless fraction in [0, 1] (relative humidity, quality)
    Fraction,
    /// Specific energy: enthalpy, internal energy (J/kg)
    SpecificEnergy,
    /// Specific entropy or heat capacity (J/(kg·K))
    SpecificEntropy,
    /// Anything passed through unchanged (density, volume, ratios, …)
    Other,
}

// ────────────────────────────────────────────────────────────────────
//  Unit enums
// ────────────────────────────────────────────────────────────────────

/// Temperature unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    /// Kelvin (SI)
    Kelvin,
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
}

/// Pressure unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressUnit {
    /// Pascal (SI)
    Pa,
    /// Kilopascal
    KPa,
    /// Bar (1 bar = 100 kPa)
    Bar,
    /// Megapascal
    MPa,
    /// Standard atmosphere (101 325 Pa)
    Atm,
    /// Pounds per square inch
    Psi,
}

/// Unit for dimensionless fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionUnit {
    /// Plain ratio, 0–1 (SI)
    Ratio,
    /// Percent, 0–100
    Percent,
}

/// Specific energy unit (enthalpy, internal energy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyUnit {
    /// J/kg (SI)
    JPerKg,
    /// kJ/kg
    KJPerKg,
}

/// Specific entropy / heat-capacity unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyUnit {
    /// J/(kg·K) (SI)
    JPerKgK,
    /// kJ/(kg·K)
    KJPerKgK,
}

// ────────────────────────────────────────────────────────────────────
//  UnitSystem — user configuration
// ────────────────────────────────────────────────────────────────────

/// Describes the set of units the user wants to work in.
///
/// Create one with a preset (`si()`, `engineering()`, `hvac()`) or
/// customise individual quantities with the builder methods.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSystem {
    pub temperature: TempUnit,
    pub pressure:    PressUnit,
    pub fraction:    FractionUnit,
    pub energy:      EnergyUnit,
    pub entropy:     EntropyUnit,
}

impl UnitSystem {
    /// Start from SI units.  Use the builder methods to change
    /// individual quantities.
    pub fn new() -> Self { Self::si() }

    // ── Presets ──────────────────────────────────────────────────────

    /// Strict SI: K, Pa, ratio, J/kg, J/(kg·K).
    pub fn si() -> Self {
        Self {
            temperature: TempUnit::Kelvin,
            pressure:    PressUnit::Pa,
            fraction:    FractionUnit::Ratio,
            energy:      EnergyUnit::JPerKg,
            entropy:     EntropyUnit::JPerKgK,
        }
    }

    /// Engineering: °C, kPa, %, kJ/kg, kJ/(kg·K).
    pub fn engineering() -> Self {
        Self {
            temperature: TempUnit::Celsius,
            pressure:    PressUnit::KPa,
            fraction:    FractionUnit::Percent,
            energy:      EnergyUnit::KJPerKg,
            entropy:     EntropyUnit::KJPerKgK,
        }
    }

    /// HVAC / refrigeration: °C, bar, %, kJ/kg, kJ/(kg·K).
    pub fn hvac() -> Self {
        Self {
            pressure: PressUnit::Bar,
            ..Self::engineering()
        }
    }

    // ── Builder methods ─────────────────────────────────────────────

    pub fn temperature(mut self, u: TempUnit) -> Self { self.temperature = u; self }
    pub fn pressure(mut self, u: PressUnit) -> Self { self.pressure = u; self }
    pub fn fraction(mut self, u: FractionUnit) -> Self { self.fraction = u; self }
    pub fn energy(mut self, u: EnergyUnit) -> Self { self.energy = u; self }
    pub fn entropy(mut self, u: EntropyUnit) -> Self { self.entropy = u; self }
}

impl Default for UnitSystem {
    fn default() -> Self { Self::si() }
}

// ────────────────────────────────────────────────────────────────────
//  Converter
// ────────────────────────────────────────────────────────────────────

/// Performs conversions between user units and SI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Converter {
    pub units: UnitSystem,
}

impl Converter {
    pub fn new(units: UnitSystem) -> Self {
        Self { units }
    }

    /// Identity converter — SI in, SI out.
    pub fn identity() -> Self {
        Self { units: UnitSystem::si() }
    }

    // ── Temperature ─────────────────────────────────────────────────

    /// User → SI (K)
    pub fn t_to_si(&self, t: f64) -> f64 {
        match self.units.temperature {
            TempUnit::Kelvin     => t,
            TempUnit::Celsius    => t + 273.15,
            TempUnit::Fahrenheit => (t - 32.0) * 5.0 / 9.0 + 273.15,
        }
    }

    /// SI (K) → User
    pub fn t_from_si(&self, t: f64) -> f64 {
        match self.units.temperature {
            TempUnit::Kelvin     => t,
            TempUnit::Celsius    => t - 273.15,
            TempUnit::Fahrenheit => (t - 273.15) * 9.0 / 5.0 + 32.0,
        }
    }

    // ── Pressure ────────────────────────────────────────────────────

    fn pa_per_unit(&self) -> f64 {
        match self.units.pressure {
            PressUnit::Pa  => 1.0,
            PressUnit::KPa => 1_000.0,
            PressUnit::Bar => 100_000.0,
            PressUnit::MPa => 1_000_000.0,
            PressUnit::Atm => 101_325.0,
            PressUnit::Psi => 6_894.757,
        }
    }

    /// User → SI (Pa)
    pub fn p_to_si(&self, p: f64) -> f64 {
        p * self.pa_per_unit()
    }

    /// SI (Pa) → User
    pub fn p_from_si(&self, p: f64) -> f64 {
        p / self.pa_per_unit()
    }

    // ── Fractions ───────────────────────────────────────────────────

    /// User → SI (ratio)
    pub fn frac_to_si(&self, x: f64) -> f64 {
        match self.units.fraction {
            FractionUnit::Ratio   => x,
            FractionUnit::Percent => x / 100.0,
        }
    }

    /// SI (ratio) → User
    pub fn frac_from_si(&self, x: f64) -> f64 {
        match self.units.fraction {
            FractionUnit::Ratio   => x,
            FractionUnit::Percent => x * 100.0,
        }
    }

    // ── Specific energy ─────────────────────────────────────────────

    /// User → SI (J/kg)
    pub fn h_to_si(&self, h: f64) -> f64 {
        match self.units.energy {
            EnergyUnit::JPerKg  => h,
            EnergyUnit::KJPerKg => h * 1000.0,
        }
    }

    /// SI (J/kg) → User
    pub fn h_from_si(&self, h: f64) -> f64 {
        match self.units.energy {
            EnergyUnit::JPerKg  => h,
            EnergyUnit::KJPerKg => h / 1000.0,
        }
    }

    // ── Specific entropy / heat capacity ────────────────────────────

    /// User → SI (J/(kg·K))
    pub fn s_to_si(&self, s: f64) -> f64 {
        match self.units.entropy {
            EntropyUnit::JPerKgK  => s,
            EntropyUnit::KJPerKgK => s * 1000.0,
        }
    }

    /// SI (J/(kg·K)) → User
    pub fn s_from_si(&self, s: f64) -> f64 {
        match self.units.entropy {
            EntropyUnit::JPerKgK  => s,
            EntropyUnit::KJPerKgK => s / 1000.0,
        }
    }

    // ── Quantity‑based conversion ───────────────────────────────────

    /// Convert a user-provided value of the given quantity to SI.
    pub fn to_si(&self, quantity: Quantity, val: f64) -> f64 {
        match quantity {
            Quantity::Temperature     => self.t_to_si(val),
            Quantity::Pressure        => self.p_to_si(val),
            Quantity::Fraction        => self.frac_to_si(val),
            Quantity::SpecificEnergy  => self.h_to_si(val),
            Quantity::SpecificEntropy => self.s_to_si(val),
            Quantity::Other           => val,
        }
    }

    /// Convert an SI value of the given quantity to user units.
    pub fn from_si(&self, quantity: Quantity, val: f64) -> f64 {
        match quantity {
            Quantity::Temperature     => self.t_from_si(val),
            Quantity::Pressure        => self.p_from_si(val),
            Quantity::Fraction        => self.frac_from_si(val),
            Quantity::SpecificEnergy  => self.h_from_si(val),
            Quantity::SpecificEntropy => self.s_from_si(val),
            Quantity::Other           => val,
        }
    }

    /// Short unit label for a quantity in the configured system.
    pub fn label(&self, quantity: Quantity) -> &'static str {
        match quantity {
            Quantity::Temperature => match self.units.temperature {
                TempUnit::Kelvin     => "K",
                TempUnit::Celsius    => "°C",
                TempUnit::Fahrenheit => "°F",
            },
            Quantity::Pressure => match self.units.pressure {
                PressUnit::Pa  => "Pa",
                PressUnit::KPa => "kPa",
                PressUnit::Bar => "bar",
                PressUnit::MPa => "MPa",
                PressUnit::Atm => "atm",
                PressUnit::Psi => "psi",
            },
            Quantity::Fraction => match self.units.fraction {
                FractionUnit::Ratio   => "-",
                FractionUnit::Percent => "%",
            },
            Quantity::SpecificEnergy => match self.units.energy {
                EnergyUnit::JPerKg  => "J/kg",
                EnergyUnit::KJPerKg => "kJ/kg",
            },
            Quantity::SpecificEntropy => match self.units.entropy {
                EntropyUnit::JPerKgK  => "J/(kg·K)",
                EntropyUnit::KJPerKgK => "kJ/(kg·K)",
            },
            Quantity::Other => "",
        }
    }
}
