//! Tree-walk interpreter.
//!
//! Every call dispatches on the node kind and recurses into children. This is
//! the reference semantics; `specialize.rs` must agree with it exactly,
//! including the order in which captures are written:
//!
//! - `Seq`: head (left to right), then tail (left to right over the suffix),
//!   then the rest pattern against the middle slice.
//! - `Map`: size check, exact-key check, then entries in insertion order.
//! - `And`/`Or`: children in declared order, short-circuiting.

use crate::capture::Match;
use crate::pattern::{MapPattern, Pattern, SeqPattern};
use crate::value::Value;

impl Pattern {
    /// Test `subject`, writing captures into `m` as `Named` nodes are reached.
    ///
    /// Captures from branches that later fail stay in `m`; only the returned
    /// boolean says whether the pattern matched.
    pub fn execute(&self, m: &mut Match, subject: &Value) -> bool {
        match self {
            Pattern::Literal(lit) => lit.accepts(subject),
            Pattern::Any | Pattern::Rest => true,
            Pattern::Named(key) => {
                m.set(key.clone(), subject.clone());
                true
            }
            Pattern::Seq(seq) => execute_seq(seq, m, subject),
            Pattern::Map(map) => execute_map(map, m, subject),
            Pattern::Opt(inner) => inner.execute(m, subject),
            Pattern::And(pats) => pats.iter().all(|p| p.execute(m, subject)),
            Pattern::Or(pats) => pats.iter().any(|p| p.execute(m, subject)),
            Pattern::Compiled(compiled) => compiled.execute(m, subject),
        }
    }

    /// Run against a fresh [`Match`], returning it on success.
    pub fn matches(&self, subject: &Value) -> Option<Match> {
        let mut m = Match::new();
        self.execute(&mut m, subject).then_some(m)
    }
}

fn execute_seq(seq: &SeqPattern, m: &mut Match, subject: &Value) -> bool {
    let Some(items) = subject.as_seq() else {
        return false;
    };

    let size_min = seq.size_min();
    let size_ok = if seq.rest().is_some() { items.len() >= size_min } else { items.len() == size_min };
    if !size_ok {
        return false;
    }

    let tail_start = items.len() - seq.tail().len();
    seq.head().iter().zip(items).all(|(p, v)| p.execute(m, v))
        && seq.tail().iter().zip(&items[tail_start..]).all(|(p, v)| p.execute(m, v))
        && seq.rest().is_none_or(|rest| {
            // A bare marker never looks at the middle slice.
            matches!(rest, Pattern::Rest | Pattern::Any)
                || rest.execute(m, &Value::Seq(items[seq.head().len()..tail_start].to_vec()))
        })
}

fn execute_map(map: &MapPattern, m: &mut Match, subject: &Value) -> bool {
    let Some(obj) = subject.as_map() else {
        return false;
    };

    obj.len() >= map.non_opt_count()
        && (!map.is_exact() || obj.keys().all(|k| map.has_key(k)))
        && map.entries().iter().all(|(key, pat)| match obj.get(key) {
            Some(v) => pat.execute(m, v),
            None => pat.is_opt(),
        })
}
