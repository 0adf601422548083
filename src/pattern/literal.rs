//! Literal patterns and case-equality.
//!
//! A literal pattern holds one stored value and a test deciding whether a
//! subject is "the same case". Equality is the common form, but a literal can
//! also be a type test, a numeric range, a regex or a host-provided predicate.
//! All of them go through [`Literal::accepts`].
//!
//! ## Numeric comparison
//!
//! `Literal::Value` compares numbers by value across `Int`/`Float`
//! (`1` accepts `1.0`), recursively through sequences and map values. Map keys
//! still use structural equality, matching [`ValueMap::get`].
//!
//! Numbers are never widened to `f64` for comparison: `Int` against `Int` is
//! exact over the whole `i64` range, and a `Float` equals an `Int` only when it
//! is integral with the same value. Ranges order their bounds the same way.

use crate::error::PatternError;
use crate::value::{Value, ValueKind, ValueMap};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A stored value plus its case-equality test.
#[derive(Clone)]
pub enum Literal {
    /// Equal to the stored value.
    Value(Value),
    /// Any value of the given kind.
    Kind(ValueKind),
    /// A number inside the range.
    Range(NumRange),
    /// A `Str` or `Sym` the regex finds a match in.
    Regex(Regex),
    /// A host-provided test.
    Predicate(Predicate),
}

impl Literal {
    /// Compile `pattern` into a regex literal.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        Ok(Literal::Regex(Regex::new(pattern)?))
    }

    pub fn predicate(label: impl AsRef<str>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Literal::Predicate(Predicate { label: Arc::from(label.as_ref()), test: Arc::new(test) })
    }

    /// The case-equality test.
    pub fn accepts(&self, subject: &Value) -> bool {
        match self {
            Literal::Value(stored) => loose_eq(stored, subject),
            Literal::Kind(kind) => subject.kind() == *kind,
            Literal::Range(range) => range.contains(subject),
            Literal::Regex(re) => match subject {
                Value::Str(s) => re.is_match(s),
                Value::Sym(s) => re.is_match(s),
                _ => false,
            },
            Literal::Predicate(pred) => (pred.test)(subject),
        }
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => num_cmp(a, b) == Some(Ordering::Equal),
        (Value::Seq(xs), Value::Seq(ys)) => xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| loose_eq(x, y)),
        (Value::Map(xs), Value::Map(ys)) => map_loose_eq(xs, ys),
        _ => a == b,
    }
}

/// Numeric ordering of two `Int`/`Float` values; `None` for NaN or
/// non-numbers.
fn num_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(i), Value::Float(x)) => int_float_cmp(*i, *x),
        (Value::Float(x), Value::Int(i)) => int_float_cmp(*i, *x).map(Ordering::reverse),
        _ => None,
    }
}

// 2^63, exactly representable.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn int_float_cmp(i: i64, x: f64) -> Option<Ordering> {
    if x.is_nan() {
        return None;
    }
    if x >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if x < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = x.trunc();
    let ord = i.cmp(&(whole as i64)).then_with(|| {
        if x > whole {
            Ordering::Less
        } else if x < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
    Some(ord)
}

fn map_loose_eq(a: &ValueMap, b: &ValueMap) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| loose_eq(v, w)))
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Value(v) => write!(f, "{v}"),
            Literal::Kind(kind) => write!(f, "{kind:?}"),
            Literal::Range(range) => write!(f, "{range}"),
            Literal::Regex(re) => write!(f, "/{}/", re.as_str()),
            Literal::Predicate(pred) => write!(f, "PRED({})", pred.label),
        }
    }
}

impl From<Value> for Literal {
    fn from(v: Value) -> Self {
        Literal::Value(v)
    }
}

impl From<ValueKind> for Literal {
    fn from(kind: ValueKind) -> Self {
        Literal::Kind(kind)
    }
}

impl From<Regex> for Literal {
    fn from(re: Regex) -> Self {
        Literal::Regex(re)
    }
}

impl From<NumRange> for Literal {
    fn from(range: NumRange) -> Self {
        Literal::Range(range)
    }
}

// --- Predicate ---------------------------------------------------------------

/// A labelled host test. The label is only used for display.
#[derive(Clone)]
pub struct Predicate {
    label: Arc<str>,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

// --- NumRange ----------------------------------------------------------------

/// A numeric range accepting both `Int` and `Float` subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct NumRange {
    start: Value,
    end: Value,
    exclusive: bool,
}

impl NumRange {
    pub fn contains(&self, subject: &Value) -> bool {
        let above = matches!(num_cmp(&self.start, subject), Some(Ordering::Less | Ordering::Equal));
        let below = match num_cmp(subject, &self.end) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => !self.exclusive,
            _ => false,
        };
        above && below
    }
}

impl fmt::Display for NumRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.exclusive { "..." } else { ".." };
        write!(f, "{}{op}{}", self.start, self.end)
    }
}

impl From<std::ops::RangeInclusive<i64>> for NumRange {
    fn from(r: std::ops::RangeInclusive<i64>) -> Self {
        let (start, end) = r.into_inner();
        NumRange { start: Value::Int(start), end: Value::Int(end), exclusive: false }
    }
}

impl From<std::ops::Range<i64>> for NumRange {
    fn from(r: std::ops::Range<i64>) -> Self {
        NumRange { start: Value::Int(r.start), end: Value::Int(r.end), exclusive: true }
    }
}

impl From<std::ops::RangeInclusive<f64>> for NumRange {
    fn from(r: std::ops::RangeInclusive<f64>) -> Self {
        let (start, end) = r.into_inner();
        NumRange { start: Value::Float(start), end: Value::Float(end), exclusive: false }
    }
}

impl From<std::ops::Range<f64>> for NumRange {
    fn from(r: std::ops::Range<f64>) -> Self {
        NumRange { start: Value::Float(r.start), end: Value::Float(r.end), exclusive: true }
    }
}
