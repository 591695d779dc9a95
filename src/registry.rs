//! The set of properties currently defining a state.

use tracing::debug;

use crate::error::{ArityError, Result};
use crate::properties::PropertyCode;
use crate::validate::validate_input;

/// What happens when a new code is set on a full registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with [`ArityError::Full`]; use `replace` to swap codes.
    #[default]
    Reject,
    /// Drop the oldest constraint to make room (rolling window).
    EvictOldest,
}

/// Ordered, validated constraint set with a generation counter.
///
/// The generation is bumped on every successful mutation, including
/// writes that store the value already present, and is what the
/// derived-value cache compares against.
#[derive(Debug, Clone)]
pub struct ConstraintRegistry<C: PropertyCode> {
    entries: Vec<(C, f64)>,
    arity: usize,
    required: Option<C>,
    policy: OverflowPolicy,
    generation: u64,
}

impl<C: PropertyCode> ConstraintRegistry<C> {
    pub fn new(arity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(arity),
            arity,
            required: None,
            policy: OverflowPolicy::default(),
            generation: 0,
        }
    }

    /// A full registry must contain `code`.
    pub fn require(mut self, code: C) -> Self {
        self.required = Some(code);
        self
    }

    pub fn with_policy(mut self, policy: OverflowPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Introspection ───────────────────────────────────────────────

    pub fn constraints(&self) -> &[(C, f64)] {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn value(&self, code: C) -> Option<f64> {
        self.entries.iter().find(|(c, _)| *c == code).map(|(_, v)| *v)
    }

    pub fn contains(&self, code: C) -> bool {
        self.position(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.arity
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Fail unless every defining property is present.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ArityError::Underconstrained {
                have: self.entries.len(),
                need: self.arity,
            }
            .into())
        }
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Validate and write a constraint.
    ///
    /// An active code is overwritten in place. A new code is appended;
    /// on a full registry the [`OverflowPolicy`] decides between
    /// failing and evicting the oldest evictable entry.
    pub fn set(&mut self, code: C, value: f64) -> Result<()> {
        validate_input(code, value)?;

        if let Some(i) = self.position(code) {
            self.entries[i].1 = value;
            self.bump("overwrite", code, value);
            return Ok(());
        }
        self.check_reciprocal(code, None)?;

        let mut next = self.entries.clone();
        if next.len() == self.arity {
            match self.policy {
                OverflowPolicy::Reject => {
                    return Err(ArityError::Full { code: code.name(), max: self.arity }.into());
                }
                OverflowPolicy::EvictOldest => {
                    let victim = next
                        .iter()
                        .position(|(c, _)| Some(*c) != self.required)
                        .ok_or(ArityError::Full { code: code.name(), max: self.arity })?;
                    let (evicted, _) = next.remove(victim);
                    debug!(%evicted, incoming = %code, "evicting oldest constraint");
                }
            }
        }
        next.push((code, value));
        self.check_required(&next)?;

        self.entries = next;
        self.bump("insert", code, value);
        Ok(())
    }

    /// Overwrite the value of an already-active constraint.
    pub fn reset(&mut self, code: C, value: f64) -> Result<()> {
        let i = self.position(code).ok_or(ArityError::NotActive(code.name()))?;
        validate_input(code, value)?;
        self.entries[i].1 = value;
        self.bump("reset", code, value);
        Ok(())
    }

    /// Swap `old` for `new` in one step. Nothing changes on failure.
    pub fn replace(&mut self, old: C, new: C, value: f64) -> Result<()> {
        let i = self.position(old).ok_or(ArityError::NotActive(old.name()))?;
        if self.contains(new) {
            return Err(ArityError::AlreadyActive(new.name()).into());
        }
        self.check_reciprocal(new, Some(old))?;
        validate_input(new, value)?;

        let mut next = self.entries.clone();
        next.remove(i);
        next.push((new, value));
        self.check_required(&next)?;

        self.entries = next;
        self.bump("replace", new, value);
        Ok(())
    }

    /// Invalidate derived values without touching the constraints,
    /// for state that lives outside the registry (reference pressure,
    /// fluid identity).
    pub fn touch(&mut self) {
        self.generation += 1;
    }

    fn position(&self, code: C) -> Option<usize> {
        self.entries.iter().position(|(c, _)| *c == code)
    }

    /// Refuse `code` while its reciprocal is active, unless that
    /// reciprocal is the entry about to be `leaving`.
    fn check_reciprocal(&self, code: C, leaving: Option<C>) -> Result<()> {
        match code.reciprocal() {
            Some(other) if Some(other) != leaving && self.contains(other) => {
                Err(ArityError::SharedInput { code: code.name(), active: other.name() }.into())
            }
            _ => Ok(()),
        }
    }

    fn check_required(&self, next: &[(C, f64)]) -> Result<()> {
        match self.required {
            Some(req) if next.len() == self.arity && !next.iter().any(|(c, _)| *c == req) => {
                Err(ArityError::MissingRequired { required: req.name() }.into())
            }
            _ => Ok(()),
        }
    }

    fn bump(&mut self, op: &'static str, code: C, value: f64) {
        self.generation += 1;
        debug!(op, %code, value, generation = self.generation, "constraint updated");
    }
}
