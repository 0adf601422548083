//! Rule dispatch: ordered pattern → action arms.
//!
//! A [`Rule`] is defined once from a block that registers arms on a
//! [`RuleBuilder`], and is immutable afterwards:
//!
//! ```text
//! Rule::new(&options, |r| {
//!     r.register(seq![1, capture(1)], |m, _| ...)?;   // arm 0
//!     r.register(seq![any(), rest()], |m, _| ...)?;   // arm 1
//!     r.set_default(|subject, _| ...);                // no arm matched
//!     Ok(())
//! })
//! ```
//!
//! `Rule::apply` tries arms strictly in registration order. The first arm whose
//! pattern matches runs its action and returns; later arms are never tried,
//! even when they would match too. If no arm matches, the default runs, or
//! `None` is returned when no default was set.
//!
//! One [`Match`] is allocated per `apply` call and shared by the arms tried
//! during that call, so an action may observe captures written by earlier arms
//! that failed. As everywhere else, failed branches are not rolled back.

use crate::api::Options;
use crate::capture::Match;
use crate::error::PatternError;
use crate::pattern::{Pattern, Plain, build};
use crate::value::Value;
use std::fmt;

/// Arm action: receives the captures and the caller's context.
pub type Action<R, C> = Box<dyn Fn(&Match, &C) -> R + Send + Sync>;

/// Default action: receives the unmatched subject and the caller's context.
pub type Fallback<R, C> = Box<dyn Fn(&Value, &C) -> R + Send + Sync>;

struct Arm<R, C> {
    pattern: Pattern,
    action: Action<R, C>,
}

/// An ordered list of pattern → action arms plus an optional default.
pub struct Rule<R, C = ()> {
    arms: Vec<Arm<R, C>>,
    fallback: Option<Fallback<R, C>>,
}

impl<R, C> Rule<R, C> {
    /// Build a rule by running `define` against a fresh [`RuleBuilder`].
    ///
    /// With `options.specialize` set, every registered pattern is specialized
    /// as it is registered.
    pub fn new<F>(options: &Options, define: F) -> Result<Self, PatternError>
    where
        F: FnOnce(&mut RuleBuilder<R, C>) -> Result<(), PatternError>,
    {
        let mut builder = RuleBuilder { specialize: options.specialize, arms: Vec::new(), fallback: None };
        define(&mut builder)?;

        tracing::debug!(
            arms = builder.arms.len(),
            has_default = builder.fallback.is_some(),
            specialize = options.specialize,
            "built rule"
        );
        Ok(Rule { arms: builder.arms, fallback: builder.fallback })
    }

    /// Dispatch `subject`: first matching arm wins, else the default.
    ///
    /// Returns `None` only when no arm matched and no default was set.
    pub fn apply(&self, subject: &Value, ctx: &C) -> Option<R> {
        let mut m = Match::new();
        for arm in &self.arms {
            if arm.pattern.execute(&mut m, subject) {
                return Some((arm.action)(&m, ctx));
            }
        }
        self.fallback.as_ref().map(|fallback| fallback(subject, ctx))
    }

    /// Patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.arms.iter().map(|arm| &arm.pattern)
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    pub fn has_default(&self) -> bool {
        self.fallback.is_some()
    }
}

impl<R, C> fmt::Debug for Rule<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("patterns", &self.arms.iter().map(|arm| arm.pattern.to_string()).collect::<Vec<_>>())
            .field("actions", &"<function>")
            .field("has_default", &self.fallback.is_some())
            .finish()
    }
}

// --- Builder -----------------------------------------------------------------

/// Collects arms while a [`Rule`] is being defined.
pub struct RuleBuilder<R, C = ()> {
    specialize: bool,
    arms: Vec<Arm<R, C>>,
    fallback: Option<Fallback<R, C>>,
}

impl<R, C> RuleBuilder<R, C> {
    /// Append an arm. The pattern is built from plain data (and specialized,
    /// if the rule was configured to) before it is stored.
    pub fn register<P, F>(&mut self, pattern: P, action: F) -> Result<&mut Self, PatternError>
    where
        P: Into<Plain>,
        F: Fn(&Match, &C) -> R + Send + Sync + 'static,
    {
        let pattern = build(pattern)?;
        let pattern = if self.specialize { pattern.specialize()? } else { pattern };
        self.arms.push(Arm { pattern, action: Box::new(action) });
        Ok(self)
    }

    /// Set the action run when no arm matches. A later call replaces it.
    pub fn set_default<F>(&mut self, action: F) -> &mut Self
    where
        F: Fn(&Value, &C) -> R + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(action));
        self
    }
}
