//! Physical plausibility checks for property values.

use tracing::warn;

use crate::error::{ResolutionError, ValidationError};
use crate::properties::{PropertyCode, RangePolicy};

/// Absolute tolerance within which out-of-range engine output is
/// treated as round-off and clamped.
pub const CLAMP_TOLERANCE: f64 = 1e-6;

/// Check a user-supplied value against every rule of `code`.
///
/// A non-finite value is rejected first; after that the rules fire in
/// declaration order and the first violation is reported.
pub fn validate<C: PropertyCode>(code: C, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::OutOfDomain {
            code: code.name(),
            value,
            reason: "must be a finite number",
        });
    }
    match code.rules().iter().find(|r| !r.limit.admits(value)) {
        Some(rule) => Err(ValidationError::OutOfDomain {
            code: code.name(),
            value,
            reason: rule.reason,
        }),
        None => Ok(()),
    }
}

/// Like [`validate`], but also refuses codes that cannot define a
/// state.
pub fn validate_input<C: PropertyCode>(code: C, value: f64) -> Result<(), ValidationError> {
    if !code.is_input() {
        return Err(ValidationError::ReadOnly { code: code.name() });
    }
    validate(code, value)
}

/// Apply the post-engine range policy to a resolved value.
///
/// Only physical rules are consulted: an engine result is allowed to
/// leave the engineering envelope used for inputs.
pub fn check_output<C: PropertyCode>(code: C, value: f64) -> Result<f64, ResolutionError> {
    let out_of_range = || ResolutionError::OutOfRange { code: code.name(), value };

    if !value.is_finite() {
        return Err(out_of_range());
    }

    let mut checked = value;
    for rule in code.rules().iter().filter(|r| r.physical) {
        if rule.limit.admits(checked) {
            continue;
        }
        let bound = rule.limit.boundary();
        match code.range_policy() {
            RangePolicy::Clamp if (checked - bound).abs() <= CLAMP_TOLERANCE => {
                warn!(%code, value, clamped = bound, "clamping engine output to physical bound");
                checked = bound;
            }
            _ => return Err(out_of_range()),
        }
    }
    Ok(checked)
}
