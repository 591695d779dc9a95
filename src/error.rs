use thiserror::Error;

/// A value rejected before it ever reaches the property engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The value lies outside the property's physical or engineering
    /// domain.
    #[error("invalid {code} = {value}: {reason}")]
    OutOfDomain {
        code: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// The property is an output only and cannot define a state.
    #[error("{code} cannot be set directly")]
    ReadOnly { code: &'static str },

    /// An attribute or token name that matches no property code.
    #[error("unknown property \"{0}\"")]
    UnknownProperty(String),
}

/// The property engine could not produce a value for the current
/// constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// The constraint combination is thermodynamically inconsistent.
    #[error("cannot resolve {requested} from ({}): {reason}", inputs.join(", "))]
    Inadmissible {
        inputs: Vec<&'static str>,
        requested: &'static str,
        reason: String,
    },

    /// The fluid identity is not known to the property engine.
    #[error("unknown fluid \"{0}\"")]
    UnknownFluid(String),

    /// The engine returned a value outside the property's domain.
    #[error("{code} resolved to {value}, outside its valid range")]
    OutOfRange { code: &'static str, value: f64 },
}

/// Fluid identity problems (pure-fluid states only).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// A property was read or written before the fluid was set.
    #[error("no fluid bound; set the fluid before using {0}")]
    Unbound(&'static str),

    /// The fluid identity is immutable once set.
    #[error("fluid already bound to \"{bound}\", cannot rebind to \"{requested}\"")]
    AlreadyBound { bound: String, requested: String },

    /// An empty fluid name.
    #[error("fluid name must not be empty")]
    Empty,
}

/// An operation would leave the constraint set with an invalid shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArityError {
    #[error("cannot set {code} - system is already fully constrained with {max} properties")]
    Full { code: &'static str, max: usize },

    #[error("{0} is not an active constraint")]
    NotActive(&'static str),

    #[error("{0} is already an active constraint")]
    AlreadyActive(&'static str),

    /// `code` reaches the engine through the same input as `active`.
    #[error("cannot set {code} - {active} already defines the same input")]
    SharedInput { code: &'static str, active: &'static str },

    #[error("{required} must be one of the defining properties")]
    MissingRequired { required: &'static str },

    #[error("state is underconstrained: {have} of {need} defining properties set")]
    Underconstrained { have: usize, need: usize },
}

/// Every failure a state object can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Arity(#[from] ArityError),

    /// The CoolProp shared library could not be located or loaded.
    #[error("CoolProp library not found: {0}")]
    LibraryNotFound(String),
}

pub type Result<T> = std::result::Result<T, StateError>;
