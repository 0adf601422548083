//! Structural pattern matching over plain nested data.
//!
//! Patterns describe the shape of scalars, sequences and maps, bind parts of a
//! subject to capture keys, and combine with `And`/`Or`. They can be executed
//! directly or specialized once into a composed evaluator, and grouped into
//! first-match-wins [`Rule`]s cached by name in a [`RuleCache`].
//!
//! # Example
//! ```
//! use patm::{Value, build, capture, rest, seq, vals};
//!
//! let pat = build(seq![0, capture(1), rest().named("xs")]).unwrap();
//! let m = pat.matches(&vals![0, 9, 8, 7]).unwrap();
//! assert_eq!(m[1], Value::Int(9));
//! assert_eq!(m["xs"], vals![8, 7]);
//!
//! let fast = pat.specialize().unwrap();
//! assert_eq!(fast.matches(&vals![0, 9, 8, 7]), Some(m));
//! ```

#[macro_use]
mod macros;
mod api;
mod capture;
mod engine;
mod error;
mod pattern;
mod value;

pub use api::{Options, SPECIALIZE_ENV, and, any, capture, exact, or, rest};
pub use capture::Match;
pub use engine::{Action, Compiled, Fallback, Rule, RuleBuilder, RuleCache, Slot};
pub use error::PatternError;
pub use pattern::{Literal, MapPattern, NumRange, Pattern, PatternFlags, Plain, PlainKey, Predicate, SeqPattern, build};
pub use value::{Key, Value, ValueKind, ValueMap};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
    pub use regex::Regex;
}
