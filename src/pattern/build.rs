//! Lifting plain data into pattern trees.
//!
//! [`build`] accepts a [`Plain`] tree: ordinary data, possibly with
//! already-built patterns mixed in, and turns it into a [`Pattern`]:
//!
//! ```text
//! Plain::Pattern(p)      -> p (unchanged)
//! Plain::Seq([..])       -> Pattern::Seq   (split around the rest element)
//! Plain::Map([..])       -> Pattern::Map   (`PlainKey::Exact` sets the exact flag)
//! Plain::Value(seq/map)  -> lifted structurally, like Seq/Map above
//! anything else          -> Pattern::Literal
//! ```
//!
//! Construction is pure. Malformed input fails here, never at match time.

use super::{Literal, MapPattern, NumRange, Pattern, SeqPattern};
use crate::error::PatternError;
use crate::value::{Value, ValueKind};
use regex::Regex;

/// Plain input to [`build`].
#[derive(Debug, Clone)]
pub enum Plain {
    Pattern(Pattern),
    Seq(Vec<Plain>),
    Map(Vec<(PlainKey, Plain)>),
    Value(Value),
    Literal(Literal),
}

/// A key in a plain map: an ordinary value or the reserved exact-match
/// sentinel, which is not itself an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainKey {
    Value(Value),
    Exact,
}

/// Build a pattern from plain data.
pub fn build(plain: impl Into<Plain>) -> Result<Pattern, PatternError> {
    build_plain(plain.into())
}

fn build_plain(plain: Plain) -> Result<Pattern, PatternError> {
    match plain {
        Plain::Pattern(pat) => Ok(pat),
        Plain::Seq(items) => build_seq(items),
        Plain::Map(entries) => build_map(entries),
        Plain::Value(Value::Seq(items)) => build_seq(items.into_iter().map(Plain::Value).collect()),
        Plain::Value(Value::Map(map)) => build_map(
            map.iter().map(|(k, v)| (PlainKey::Value(k.clone()), Plain::Value(v.clone()))).collect(),
        ),
        Plain::Value(v) => Ok(Pattern::Literal(Literal::Value(v))),
        Plain::Literal(lit) => Ok(Pattern::Literal(lit)),
    }
}

fn build_seq(items: Vec<Plain>) -> Result<Pattern, PatternError> {
    let mut pats = items.into_iter().map(build_plain).collect::<Result<Vec<_>, _>>()?;

    let rest_count = pats.iter().filter(|p| p.is_rest()).count();
    if rest_count > 1 {
        return Err(PatternError::MultipleRest { count: rest_count });
    }

    let seq = match pats.iter().position(Pattern::is_rest) {
        Some(idx) => {
            let tail = pats.split_off(idx + 1);
            let rest = pats.pop();
            SeqPattern::new(pats, rest, tail)?
        }
        None => SeqPattern::exact(pats)?,
    };
    Ok(Pattern::Seq(seq))
}

fn build_map(entries: Vec<(PlainKey, Plain)>) -> Result<Pattern, PatternError> {
    let mut exact = false;
    let mut pats = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match key {
            PlainKey::Exact => {
                exact = match &value {
                    Plain::Value(v) => v.is_truthy(),
                    _ => true,
                }
            }
            PlainKey::Value(k) => pats.push((k, build_plain(value)?)),
        }
    }
    Ok(Pattern::Map(MapPattern::new(pats, exact)))
}

// --- Conversions -------------------------------------------------------------

impl From<Pattern> for Plain {
    fn from(p: Pattern) -> Self {
        Plain::Pattern(p)
    }
}

impl From<Value> for Plain {
    fn from(v: Value) -> Self {
        Plain::Value(v)
    }
}

impl From<Literal> for Plain {
    fn from(lit: Literal) -> Self {
        Plain::Literal(lit)
    }
}

impl From<Regex> for Plain {
    fn from(re: Regex) -> Self {
        Plain::Literal(Literal::Regex(re))
    }
}

impl From<&'static Regex> for Plain {
    fn from(re: &'static Regex) -> Self {
        Plain::Literal(Literal::Regex(re.clone()))
    }
}

impl From<NumRange> for Plain {
    fn from(range: NumRange) -> Self {
        Plain::Literal(Literal::Range(range))
    }
}

impl From<ValueKind> for Plain {
    fn from(kind: ValueKind) -> Self {
        Plain::Literal(Literal::Kind(kind))
    }
}

impl<T: Into<Plain>> From<Vec<T>> for Plain {
    fn from(items: Vec<T>) -> Self {
        Plain::Seq(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! plain_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Plain {
                fn from(v: $ty) -> Self {
                    Plain::Value(Value::from(v))
                }
            }
        )*
    };
}

plain_from_scalar!(bool, i32, i64, f64, &str, String);

impl From<Value> for PlainKey {
    fn from(v: Value) -> Self {
        PlainKey::Value(v)
    }
}

impl From<&str> for PlainKey {
    fn from(s: &str) -> Self {
        PlainKey::Value(Value::from(s))
    }
}

impl From<i64> for PlainKey {
    fn from(i: i64) -> Self {
        PlainKey::Value(Value::Int(i))
    }
}

impl From<i32> for PlainKey {
    fn from(i: i32) -> Self {
        PlainKey::Value(Value::from(i))
    }
}
