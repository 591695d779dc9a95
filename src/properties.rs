//! Property codes for humid-air and pure-fluid states.
//!
//! Each code carries everything the rest of the crate needs to know
//! about it: the attribute name users type, the token the property
//! engine understands, its SI unit, the validation rules for values
//! and whether the engine accepts it as an input.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use converter::Quantity;
use serde::Serialize;

use crate::error::ValidationError;

// ── Validity rules ──────────────────────────────────────────────────

/// One side of a validity interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    /// value > x
    Above(f64),
    /// value ≥ x
    AtLeast(f64),
    /// value ≤ x
    AtMost(f64),
}

impl Limit {
    pub fn admits(self, value: f64) -> bool {
        match self {
            Limit::Above(x) => value > x,
            Limit::AtLeast(x) => value >= x,
            Limit::AtMost(x) => value <= x,
        }
    }

    /// The nearest admissible value, used when clamping engine output.
    pub fn boundary(self) -> f64 {
        match self {
            Limit::Above(x) | Limit::AtLeast(x) | Limit::AtMost(x) => x,
        }
    }
}

/// A single validation rule for a property value.
///
/// `physical` rules are hard bounds that also apply to values coming
/// back from the engine; the others describe the engineering envelope
/// accepted for inputs only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub limit: Limit,
    pub reason: &'static str,
    pub physical: bool,
}

impl Rule {
    pub const fn physical(limit: Limit, reason: &'static str) -> Self {
        Self { limit, reason, physical: true }
    }

    pub const fn reasonable(limit: Limit, reason: &'static str) -> Self {
        Self { limit, reason, physical: false }
    }
}

/// What the resolver does with engine output that breaks a physical
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePolicy {
    /// Report `ResolutionError::OutOfRange`.
    Flag,
    /// Snap to the violated bound when within round-off, flag otherwise.
    Clamp,
}

const ABOVE_ZERO_K: Rule = Rule::physical(Limit::Above(0.0), "must be above absolute zero");
const POSITIVE: Rule = Rule::physical(Limit::Above(0.0), "must be positive");
const NON_NEGATIVE: Rule = Rule::physical(Limit::AtLeast(0.0), "cannot be negative");
const FRACTION_LOW: Rule = Rule::physical(Limit::AtLeast(0.0), "must be between 0 and 1");
const FRACTION_HIGH: Rule = Rule::physical(Limit::AtMost(1.0), "must be between 0 and 1");

const HA_TEMPERATURE: &[Rule] = &[
    ABOVE_ZERO_K,
    Rule::reasonable(Limit::AtMost(473.15), "exceeding reasonable range"),
];
const HA_PRESSURE: &[Rule] = &[
    POSITIVE,
    Rule::reasonable(Limit::AtLeast(1_000.0), "below reasonable range"),
    Rule::reasonable(Limit::AtMost(1.0e7), "exceeding reasonable range"),
];
const HA_RELHUM: &[Rule] = &[
    NON_NEGATIVE,
    Rule::physical(Limit::AtMost(1.0), "cannot exceed 1"),
];
const HA_HUMRAT: &[Rule] = &[
    NON_NEGATIVE,
    Rule::reasonable(Limit::AtMost(1.0), "exceeding reasonable range"),
];

const FL_TEMPERATURE: &[Rule] = &[
    ABOVE_ZERO_K,
    Rule::reasonable(Limit::AtMost(2_000.0), "exceeding reasonable range"),
];
const FL_PRESSURE: &[Rule] = &[
    POSITIVE,
    Rule::reasonable(Limit::AtMost(1.0e9), "exceeding reasonable range"),
];
const FL_DENSITY: &[Rule] = &[
    POSITIVE,
    Rule::reasonable(Limit::AtMost(1.0e5), "exceeding reasonable range"),
];
const FL_QUALITY: &[Rule] = &[FRACTION_LOW, FRACTION_HIGH];

const STRICTLY_POSITIVE: &[Rule] = &[POSITIVE];
const UNBOUNDED: &[Rule] = &[];

// ── PropertyCode ────────────────────────────────────────────────────

/// Behaviour shared by the humid-air and pure-fluid code enums.
pub trait PropertyCode:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + 'static
{
    /// Every code of this state kind, in display order.
    const ALL: &'static [Self];

    /// Short attribute name (`"tempk"`, `"humrat"`, …).
    fn name(self) -> &'static str;

    /// Human-readable label.
    fn label(self) -> &'static str;

    /// Token passed to the property engine.
    fn token(self) -> &'static str;

    /// SI unit.
    fn unit(self) -> &'static str;

    /// Quantity kind, for boundary unit conversion.
    fn quantity(self) -> Quantity;

    /// Validation rules, checked in order.
    fn rules(self) -> &'static [Rule];

    /// Whether the engine accepts this code as a defining input.
    fn is_input(self) -> bool;

    fn range_policy(self) -> RangePolicy {
        RangePolicy::Flag
    }

    /// Other engine spellings accepted by [`lookup`](Self::lookup).
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// The code whose value is the reciprocal of this one. Both reach
    /// the engine through the same input, so at most one of them may
    /// define a state.
    fn reciprocal(self) -> Option<Self> {
        None
    }

    /// Look a code up by attribute name, label, engine token or alias
    /// (case-insensitive).
    fn lookup(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|c| {
            c.name().eq_ignore_ascii_case(s)
                || c.token().eq_ignore_ascii_case(s)
                || c.label().eq_ignore_ascii_case(s)
                || c.aliases().iter().any(|a| a.eq_ignore_ascii_case(s))
        })
    }
}

macro_rules! property_display_and_parse {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as PropertyCode>::lookup(s)
                    .ok_or_else(|| ValidationError::UnknownProperty(s.to_string()))
            }
        }
    };
}

// ── Humid air ───────────────────────────────────────────────────────

/// Properties of a humid-air state. Extensive values are per kg of
/// dry air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HumidAirProp {
    Temperature,
    Pressure,
    RelativeHumidity,
    HumidityRatio,
    WetBulb,
    DewPoint,
    Enthalpy,
    Entropy,
    SpecificVolume,
    Density,
    Cp,
    Viscosity,
    Conductivity,
}

impl PropertyCode for HumidAirProp {
    const ALL: &'static [Self] = &[
        Self::Temperature,
        Self::Pressure,
        Self::RelativeHumidity,
        Self::HumidityRatio,
        Self::WetBulb,
        Self::DewPoint,
        Self::Enthalpy,
        Self::Entropy,
        Self::SpecificVolume,
        Self::Density,
        Self::Cp,
        Self::Viscosity,
        Self::Conductivity,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Temperature => "tempk",
            Self::Pressure => "press",
            Self::RelativeHumidity => "relhum",
            Self::HumidityRatio => "humrat",
            Self::WetBulb => "wetbulb",
            Self::DewPoint => "dewpoint",
            Self::Enthalpy => "enthalpy",
            Self::Entropy => "entropy",
            Self::SpecificVolume => "vol",
            Self::Density => "density",
            Self::Cp => "cp",
            Self::Viscosity => "visc",
            Self::Conductivity => "cond",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::RelativeHumidity => "relative humidity",
            Self::HumidityRatio => "humidity ratio",
            Self::WetBulb => "wet-bulb temperature",
            Self::DewPoint => "dew-point temperature",
            Self::Enthalpy => "specific enthalpy",
            Self::Entropy => "specific entropy",
            Self::SpecificVolume => "specific volume",
            Self::Density => "density",
            Self::Cp => "specific heat",
            Self::Viscosity => "viscosity",
            Self::Conductivity => "thermal conductivity",
        }
    }

    /// HAPropsSI vocabulary. Density has no token of its own; the
    /// resolver goes through specific volume.
    fn token(self) -> &'static str {
        match self {
            Self::Temperature => "T",
            Self::Pressure => "P",
            Self::RelativeHumidity => "R",
            Self::HumidityRatio => "W",
            Self::WetBulb => "B",
            Self::DewPoint => "D",
            Self::Enthalpy => "H",
            Self::Entropy => "S",
            Self::SpecificVolume | Self::Density => "V",
            Self::Cp => "C",
            Self::Viscosity => "M",
            Self::Conductivity => "K",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Self::Temperature | Self::WetBulb | Self::DewPoint => "K",
            Self::Pressure => "Pa",
            Self::RelativeHumidity => "-",
            Self::HumidityRatio => "kg/kg",
            Self::Enthalpy => "J/kg",
            Self::Entropy | Self::Cp => "J/(kg·K)",
            Self::SpecificVolume => "m³/kg",
            Self::Density => "kg/m³",
            Self::Viscosity => "Pa·s",
            Self::Conductivity => "W/(m·K)",
        }
    }

    fn quantity(self) -> Quantity {
        match self {
            Self::Temperature | Self::WetBulb | Self::DewPoint => Quantity::Temperature,
            Self::Pressure => Quantity::Pressure,
            Self::RelativeHumidity => Quantity::Fraction,
            Self::Enthalpy => Quantity::SpecificEnergy,
            Self::Entropy | Self::Cp => Quantity::SpecificEntropy,
            Self::HumidityRatio
            | Self::SpecificVolume
            | Self::Density
            | Self::Viscosity
            | Self::Conductivity => Quantity::Other,
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Temperature | Self::WetBulb | Self::DewPoint => HA_TEMPERATURE,
            Self::Pressure => HA_PRESSURE,
            Self::RelativeHumidity => HA_RELHUM,
            Self::HumidityRatio => HA_HUMRAT,
            Self::SpecificVolume
            | Self::Density
            | Self::Cp
            | Self::Viscosity
            | Self::Conductivity => STRICTLY_POSITIVE,
            Self::Enthalpy | Self::Entropy => UNBOUNDED,
        }
    }

    fn is_input(self) -> bool {
        !matches!(self, Self::Cp | Self::Viscosity | Self::Conductivity)
    }

    fn range_policy(self) -> RangePolicy {
        match self {
            Self::RelativeHumidity | Self::HumidityRatio => RangePolicy::Clamp,
            _ => RangePolicy::Flag,
        }
    }

    /// Long-form HAPropsSI names.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Temperature => &["Tdb", "T_db"],
            Self::RelativeHumidity => &["RH", "RelHum"],
            Self::HumidityRatio => &["Omega", "HumRat"],
            Self::WetBulb => &["Twb", "T_wb"],
            Self::DewPoint => &["Tdp", "T_dp", "DewPoint"],
            Self::Enthalpy => &["Hda"],
            Self::Entropy => &["Sda"],
            Self::SpecificVolume => &["Vda"],
            Self::Cp => &["Cda"],
            Self::Viscosity => &["mu"],
            Self::Conductivity => &["k"],
            Self::Pressure | Self::Density => &[],
        }
    }

    fn reciprocal(self) -> Option<Self> {
        match self {
            Self::Density => Some(Self::SpecificVolume),
            Self::SpecificVolume => Some(Self::Density),
            _ => None,
        }
    }
}

property_display_and_parse!(HumidAirProp);

// ── Pure fluid ──────────────────────────────────────────────────────

/// Properties of a pure or pseudo-pure fluid state, mass based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidProp {
    Temperature,
    Pressure,
    Density,
    Enthalpy,
    Entropy,
    InternalEnergy,
    Quality,
    Cp,
    Cv,
    SpeedOfSound,
    Viscosity,
    Conductivity,
    /// Engine phase index, decoded through [`Phase`].
    Phase,
}

impl PropertyCode for FluidProp {
    const ALL: &'static [Self] = &[
        Self::Temperature,
        Self::Pressure,
        Self::Density,
        Self::Enthalpy,
        Self::Entropy,
        Self::InternalEnergy,
        Self::Quality,
        Self::Cp,
        Self::Cv,
        Self::SpeedOfSound,
        Self::Viscosity,
        Self::Conductivity,
        Self::Phase,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Temperature => "tempk",
            Self::Pressure => "press",
            Self::Density => "dens",
            Self::Enthalpy => "enthalpy",
            Self::Entropy => "entropy",
            Self::InternalEnergy => "intenergy",
            Self::Quality => "quality",
            Self::Cp => "cp",
            Self::Cv => "cv",
            Self::SpeedOfSound => "sound",
            Self::Viscosity => "visc",
            Self::Conductivity => "cond",
            Self::Phase => "phase",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Density => "density",
            Self::Enthalpy => "specific enthalpy",
            Self::Entropy => "specific entropy",
            Self::InternalEnergy => "specific internal energy",
            Self::Quality => "vapor quality",
            Self::Cp => "isobaric specific heat",
            Self::Cv => "isochoric specific heat",
            Self::SpeedOfSound => "speed of sound",
            Self::Viscosity => "viscosity",
            Self::Conductivity => "thermal conductivity",
            Self::Phase => "phase index",
        }
    }

    /// PropsSI vocabulary.
    fn token(self) -> &'static str {
        match self {
            Self::Temperature => "T",
            Self::Pressure => "P",
            Self::Density => "Dmass",
            Self::Enthalpy => "Hmass",
            Self::Entropy => "Smass",
            Self::InternalEnergy => "Umass",
            Self::Quality => "Q",
            Self::Cp => "Cpmass",
            Self::Cv => "Cvmass",
            Self::SpeedOfSound => "A",
            Self::Viscosity => "V",
            Self::Conductivity => "L",
            Self::Phase => "Phase",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "K",
            Self::Pressure => "Pa",
            Self::Density => "kg/m³",
            Self::Enthalpy | Self::InternalEnergy => "J/kg",
            Self::Entropy | Self::Cp | Self::Cv => "J/(kg·K)",
            Self::Quality | Self::Phase => "-",
            Self::SpeedOfSound => "m/s",
            Self::Viscosity => "Pa·s",
            Self::Conductivity => "W/(m·K)",
        }
    }

    fn quantity(self) -> Quantity {
        match self {
            Self::Temperature => Quantity::Temperature,
            Self::Pressure => Quantity::Pressure,
            Self::Quality => Quantity::Fraction,
            Self::Enthalpy | Self::InternalEnergy => Quantity::SpecificEnergy,
            Self::Entropy | Self::Cp | Self::Cv => Quantity::SpecificEntropy,
            Self::Density
            | Self::SpeedOfSound
            | Self::Viscosity
            | Self::Conductivity
            | Self::Phase => Quantity::Other,
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Temperature => FL_TEMPERATURE,
            Self::Pressure => FL_PRESSURE,
            Self::Density => FL_DENSITY,
            Self::Quality => FL_QUALITY,
            Self::Cp | Self::Cv | Self::SpeedOfSound | Self::Viscosity | Self::Conductivity => {
                STRICTLY_POSITIVE
            }
            Self::Enthalpy | Self::Entropy | Self::InternalEnergy | Self::Phase => UNBOUNDED,
        }
    }

    fn is_input(self) -> bool {
        matches!(
            self,
            Self::Temperature
                | Self::Pressure
                | Self::Density
                | Self::Enthalpy
                | Self::Entropy
                | Self::InternalEnergy
                | Self::Quality
        )
    }

    fn range_policy(self) -> RangePolicy {
        match self {
            Self::Quality => RangePolicy::Clamp,
            _ => RangePolicy::Flag,
        }
    }

    /// PropsSI short and molar-free spellings.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Density => &["D", "rhomass"],
            Self::Enthalpy => &["H"],
            Self::Entropy => &["S"],
            Self::InternalEnergy => &["U"],
            Self::Cp => &["C"],
            Self::Cv => &["O"],
            Self::SpeedOfSound => &["speed_of_sound"],
            Self::Viscosity => &["viscosity"],
            Self::Conductivity => &["conductivity"],
            Self::Temperature | Self::Pressure | Self::Quality | Self::Phase => &[],
        }
    }
}

property_display_and_parse!(FluidProp);

// ── Phase classification ────────────────────────────────────────────

/// Phase region as reported by the property engine.
///
/// Decoded verbatim from the engine's phase index; the crate never
/// re-derives it, so a state sitting exactly on the saturation curve
/// is whatever the engine says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Liquid,
    Supercritical,
    SupercriticalGas,
    SupercriticalLiquid,
    CriticalPoint,
    Gas,
    TwoPhase,
    Unknown,
    NotImposed,
}

impl Phase {
    const BY_INDEX: [Phase; 9] = [
        Phase::Liquid,
        Phase::Supercritical,
        Phase::SupercriticalGas,
        Phase::SupercriticalLiquid,
        Phase::CriticalPoint,
        Phase::Gas,
        Phase::TwoPhase,
        Phase::Unknown,
        Phase::NotImposed,
    ];

    /// Decode the engine's numeric phase output.
    pub fn from_index(raw: f64) -> Option<Phase> {
        if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 {
            return None;
        }
        Self::BY_INDEX.get(raw as usize).copied()
    }

    pub fn index(self) -> usize {
        Self::BY_INDEX.iter().position(|&p| p == self).unwrap_or(7)
    }

    /// The engine's own name for the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Liquid => "liquid",
            Phase::Supercritical => "supercritical",
            Phase::SupercriticalGas => "supercritical_gas",
            Phase::SupercriticalLiquid => "supercritical_liquid",
            Phase::CriticalPoint => "critical_point",
            Phase::Gas => "gas",
            Phase::TwoPhase => "twophase",
            Phase::Unknown => "unknown",
            Phase::NotImposed => "not_imposed",
        }
    }

    pub fn is_two_phase(self) -> bool {
        self == Phase::TwoPhase
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_accepts_names_tokens_and_labels() {
        assert_eq!("humrat".parse::<HumidAirProp>(), Ok(HumidAirProp::HumidityRatio));
        assert_eq!("W".parse::<HumidAirProp>(), Ok(HumidAirProp::HumidityRatio));
        assert_eq!("Relative Humidity".parse::<HumidAirProp>(), Ok(HumidAirProp::RelativeHumidity));
        assert_eq!("Dmass".parse::<FluidProp>(), Ok(FluidProp::Density));
        assert_eq!("dens".parse::<FluidProp>(), Ok(FluidProp::Density));
        assert!("bogus".parse::<FluidProp>().is_err());
    }

    #[test]
    fn fluid_lookup_accepts_short_engine_tokens() {
        let expected = [
            ("D", FluidProp::Density),
            ("H", FluidProp::Enthalpy),
            ("S", FluidProp::Entropy),
            ("C", FluidProp::Cp),
            ("O", FluidProp::Cv),
            ("U", FluidProp::InternalEnergy),
        ];
        for (token, code) in expected {
            assert_eq!(token.parse::<FluidProp>(), Ok(code), "token {token}");
        }
        assert_eq!("Cvmass".parse::<FluidProp>(), Ok(FluidProp::Cv));
    }

    #[test]
    fn humid_air_lookup_accepts_long_names() {
        assert_eq!("Tdb".parse::<HumidAirProp>(), Ok(HumidAirProp::Temperature));
        assert_eq!("Twb".parse::<HumidAirProp>(), Ok(HumidAirProp::WetBulb));
        assert_eq!("Omega".parse::<HumidAirProp>(), Ok(HumidAirProp::HumidityRatio));
        assert_eq!("RH".parse::<HumidAirProp>(), Ok(HumidAirProp::RelativeHumidity));
    }

    #[test]
    fn aliases_never_collide() {
        fn check<C: PropertyCode>() {
            for &a in C::ALL {
                for alias in a.aliases() {
                    assert_eq!(C::lookup(alias), Some(a), "alias {alias} of {a}");
                }
            }
        }
        check::<HumidAirProp>();
        check::<FluidProp>();
    }

    #[test]
    fn density_and_volume_share_an_input() {
        assert_eq!(HumidAirProp::Density.reciprocal(), Some(HumidAirProp::SpecificVolume));
        assert_eq!(HumidAirProp::SpecificVolume.reciprocal(), Some(HumidAirProp::Density));
        assert_eq!(HumidAirProp::Enthalpy.reciprocal(), None);
        assert_eq!(FluidProp::Density.reciprocal(), None);
    }

    #[test]
    fn token_d_means_dew_point_for_humid_air() {
        // `D` is density for fluids but dew point for humid air.
        assert_eq!(HumidAirProp::lookup("D"), Some(HumidAirProp::DewPoint));
    }

    #[test]
    fn output_only_codes_are_not_inputs() {
        assert!(!HumidAirProp::Cp.is_input());
        assert!(HumidAirProp::Density.is_input());
        assert!(!FluidProp::Phase.is_input());
        assert!(FluidProp::Quality.is_input());
    }

    #[test]
    fn phase_index_round_trip() {
        for (i, p) in Phase::BY_INDEX.iter().enumerate() {
            assert_eq!(Phase::from_index(i as f64), Some(*p));
            assert_eq!(p.index(), i);
        }
        assert_eq!(Phase::from_index(6.0), Some(Phase::TwoPhase));
        assert_eq!(Phase::from_index(9.0), None);
        assert_eq!(Phase::from_index(2.5), None);
        assert_eq!(Phase::from_index(f64::NAN), None);
    }

    #[test]
    fn phase_names_match_engine() {
        assert_eq!(Phase::TwoPhase.to_string(), "twophase");
        assert_eq!(Phase::SupercriticalGas.as_str(), "supercritical_gas");
    }
}
