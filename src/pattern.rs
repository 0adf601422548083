//! Pattern model.
//!
//! A [`Pattern`] is an immutable tree describing shape and value constraints on
//! a subject, plus the captures to record while testing it. Trees are built
//! once (usually from plain data, see `build.rs`) and then either executed
//! directly by the interpreter (`engine/interp.rs`) or lowered once by the
//! specializer (`engine/specialize.rs`) into a [`Pattern::Compiled`].
//!
//! ```text
//! [0, 1, rest & NAMED(:xs), 9]
//!
//! Seq ─┬─ head: [Literal(0), Literal(1)]
//!      ├─ rest: And[Rest, Named(:xs)]
//!      └─ tail: [Literal(9)]
//! ```
//!
//! ## Invariants
//!
//! - A `Seq` has at most one rest slot, and only that slot may carry
//!   [`PatternFlags::REST`]. [`SeqPattern::new`] enforces this.
//! - `REST` and `OPT` propagate through `And`/`Or`, so `rest & NAMED(1)` is
//!   still a rest pattern and `?p | q` is still optional.
//! - [`MapPattern::non_opt_count`] is fixed at construction.
//! - Nothing here mutates a pattern after construction. Specializing returns a
//!   new node.

#[path = "pattern/build.rs"]
mod build;
#[path = "pattern/literal.rs"]
mod literal;

pub use build::{Plain, PlainKey, build};
pub use literal::{Literal, NumRange, Predicate};

use crate::engine::Compiled;
use crate::error::PatternError;
use crate::value::{Key, Value};
use std::fmt;
use std::ops::{BitAnd, BitOr};

bitflags::bitflags! {
    /// Structural properties of a pattern that its parents care about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PatternFlags: u8 {
        /// Matches a variable-length run inside a sequence.
        const REST = 1 << 0;
        /// May be absent when used as a map entry.
        const OPT  = 1 << 1;
    }
}

/// An immutable pattern tree.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Case-equality against a stored literal.
    Literal(Literal),
    /// Matches anything, binds nothing.
    Any,
    /// Binds the subject under a key; always succeeds.
    Named(Key),
    Seq(SeqPattern),
    /// Rest marker: zero or more sequence elements.
    Rest,
    Map(MapPattern),
    /// Marks a map entry as not required.
    Opt(Box<Pattern>),
    And(Vec<Pattern>),
    Or(Vec<Pattern>),
    /// Output of [`Pattern::specialize`].
    Compiled(Compiled),
}

impl Pattern {
    pub fn literal(lit: impl Into<Literal>) -> Self {
        Pattern::Literal(lit.into())
    }

    pub fn capture(key: impl Into<Key>) -> Self {
        Pattern::Named(key.into())
    }

    pub fn or(pats: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Or(pats.into_iter().collect())
    }

    pub fn and(pats: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::And(pats.into_iter().collect())
    }

    /// Wrap this pattern so a map entry using it may be absent.
    pub fn opt(self) -> Self {
        Pattern::Opt(Box::new(self))
    }

    /// `self & NAMED(key)`: match `self` and bind the same subject.
    pub fn named(self, key: impl Into<Key>) -> Self {
        self & Pattern::capture(key)
    }

    pub fn flags(&self) -> PatternFlags {
        match self {
            Pattern::Rest => PatternFlags::REST,
            Pattern::Opt(_) => PatternFlags::OPT,
            Pattern::And(pats) | Pattern::Or(pats) => pats.iter().fold(PatternFlags::empty(), |acc, p| acc | p.flags()),
            _ => PatternFlags::empty(),
        }
    }

    pub fn is_rest(&self) -> bool {
        self.flags().contains(PatternFlags::REST)
    }

    pub fn is_opt(&self) -> bool {
        self.flags().contains(PatternFlags::OPT)
    }

    pub fn is_compiled(&self) -> bool {
        matches!(self, Pattern::Compiled(_))
    }
}

impl BitAnd for Pattern {
    type Output = Pattern;

    fn bitand(self, rhs: Pattern) -> Pattern {
        Pattern::And(vec![self, rhs])
    }
}

impl BitOr for Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: Pattern) -> Pattern {
        Pattern::Or(vec![self, rhs])
    }
}

impl From<Literal> for Pattern {
    fn from(lit: Literal) -> Self {
        Pattern::Literal(lit)
    }
}

// --- Sequence ----------------------------------------------------------------

/// `head ++ rest? ++ tail`.
#[derive(Debug, Clone)]
pub struct SeqPattern {
    head: Vec<Pattern>,
    rest: Option<Box<Pattern>>,
    tail: Vec<Pattern>,
}

impl SeqPattern {
    /// A sequence with an optional rest slot.
    ///
    /// Fails with [`PatternError::MisplacedRest`] if `rest` is not
    /// rest-flagged or `head`/`tail` contain a rest-flagged pattern.
    pub fn new(head: Vec<Pattern>, rest: Option<Pattern>, tail: Vec<Pattern>) -> Result<Self, PatternError> {
        if rest.as_ref().is_some_and(|r| !r.is_rest()) || head.iter().chain(&tail).any(Pattern::is_rest) {
            return Err(PatternError::MisplacedRest);
        }
        if rest.is_none() && !tail.is_empty() {
            // Without a rest slot the split is meaningless; keep one flat list.
            let mut all = head;
            all.extend(tail);
            return Ok(SeqPattern { head: all, rest: None, tail: Vec::new() });
        }
        Ok(SeqPattern { head, rest: rest.map(Box::new), tail })
    }

    /// An exact-length sequence.
    pub fn exact(items: Vec<Pattern>) -> Result<Self, PatternError> {
        SeqPattern::new(items, None, Vec::new())
    }

    pub fn head(&self) -> &[Pattern] {
        &self.head
    }

    pub fn rest(&self) -> Option<&Pattern> {
        self.rest.as_deref()
    }

    pub fn tail(&self) -> &[Pattern] {
        &self.tail
    }

    /// Fewest elements a matching subject can have.
    pub fn size_min(&self) -> usize {
        self.head.len() + self.tail.len()
    }
}

// --- Map ---------------------------------------------------------------------

/// Key → pattern entries, in insertion order.
#[derive(Debug, Clone)]
pub struct MapPattern {
    entries: Vec<(Value, Pattern)>,
    exact: bool,
    non_opt_count: usize,
}

impl MapPattern {
    /// Later entries with an equal key replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = (Value, Pattern)>, exact: bool) -> Self {
        let mut deduped: Vec<(Value, Pattern)> = Vec::new();
        for (key, pat) in entries {
            match deduped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = pat,
                None => deduped.push((key, pat)),
            }
        }
        let non_opt_count = deduped.iter().filter(|(_, p)| !p.is_opt()).count();
        MapPattern { entries: deduped, exact, non_opt_count }
    }

    pub fn entries(&self) -> &[(Value, Pattern)] {
        &self.entries
    }

    /// Whether subject keys must be a subset of the pattern keys.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Number of entries a subject must provide.
    pub fn non_opt_count(&self) -> usize {
        self.non_opt_count
    }

    pub fn has_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }
}

// --- Display -----------------------------------------------------------------

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Pattern], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(lit) => write!(f, "OBJ({lit})"),
            Pattern::Any => f.write_str("ANY"),
            Pattern::Named(key) => write!(f, "NAMED({key})"),
            Pattern::Seq(seq) => {
                f.write_str("[")?;
                let mut items: Vec<&Pattern> = seq.head.iter().collect();
                items.extend(seq.rest.as_deref());
                items.extend(&seq.tail);
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Pattern::Rest => f.write_str("..."),
            Pattern::Map(map) => {
                f.write_str("{")?;
                for (i, (k, p)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} => {p}")?;
                }
                if map.exact {
                    f.write_str(if map.entries.is_empty() { "EXACT" } else { ", EXACT" })?;
                }
                f.write_str("}")
            }
            Pattern::Opt(inner) => write!(f, "?{inner}"),
            Pattern::And(pats) => {
                f.write_str("AND(")?;
                write_list(f, pats, ",")?;
                f.write_str(")")
            }
            Pattern::Or(pats) => {
                f.write_str("OR(")?;
                write_list(f, pats, ",")?;
                f.write_str(")")
            }
            Pattern::Compiled(compiled) => write!(f, "<compiled>{}", compiled.description()),
        }
    }
}

#[cfg(test)]
#[path = "pattern/tests.rs"]
mod tests;
