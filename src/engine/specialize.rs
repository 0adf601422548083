//! Specialization: lowering a pattern tree into a composed evaluator.
//!
//! The interpreter re-dispatches on the node kind for every subject. Rules
//! usually test the same patterns against many subjects, so a pattern can be
//! lowered once into a tree of boxed closures where every kind decision has
//! already been made. Literal values are not captured by the closures; they are
//! collected into an ordered context table and referenced by slot index.
//!
//! ```text
//! [1, NAMED(:x), ...]
//!
//! context: [Literal(1)]
//! source:  (seq?(_obj)) &&
//!          (len(_obj) >= 2) &&
//!          ((_obj_elm = _obj[0]; _ctx[0] === _obj_elm)) &&
//!          ((_obj_elm = _obj[1]; _match[:x] = _obj_elm; true))
//! ```
//!
//! The `source` text is a listing of what the closures do, kept for
//! inspection; it is never parsed or evaluated.
//!
//! ## Elision
//!
//! A sub-pattern that always succeeds without side effects (`ANY`, the rest
//! marker, an `AND` of those) lowers to nothing. An `OR` stops lowering at its
//! first such alternative: once reached it is true, so later alternatives never
//! run in the interpreter either.
//!
//! ## Not lowered
//!
//! `Map` and `Opt` nodes are not lowered. They are stored whole in a
//! [`Slot::Fallback`] and executed by the interpreter when reached. This keeps
//! the result identical to the tree-walk at the cost of dispatch for those
//! nodes.
//!
//! ## Invariants
//!
//! - Slot indices are assigned in depth-first order during a single pass, and
//!   each lowered closure only reads its own slots.
//! - A [`Compiled`] node on a lowered path is rejected with
//!   [`PatternError::AlreadyCompiled`]: its closures index a different table.
//!   Alternatives of an `OR` after an elided one count as lowered paths.

use crate::capture::Match;
use crate::error::PatternError;
use crate::pattern::{Literal, Pattern, SeqPattern};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

type Eval = Box<dyn Fn(&[Slot], &mut Match, &Value) -> bool + Send + Sync>;

/// One entry of the literal-context table.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Value referenced by a lowered literal test.
    Literal(Literal),
    /// Sub-pattern executed by the interpreter.
    Fallback(Pattern),
}

impl Slot {
    #[inline]
    fn test(&self, m: &mut Match, subject: &Value) -> bool {
        match self {
            Slot::Literal(lit) => lit.accepts(subject),
            Slot::Fallback(pat) => pat.execute(m, subject),
        }
    }
}

/// A specialized pattern: evaluator, context table and source listing.
#[derive(Clone)]
pub struct Compiled {
    program: Arc<Program>,
}

struct Program {
    description: String,
    context: Vec<Slot>,
    /// `None` when the whole pattern always succeeds.
    eval: Option<Eval>,
    source: String,
}

impl Compiled {
    pub fn execute(&self, m: &mut Match, subject: &Value) -> bool {
        match &self.program.eval {
            Some(eval) => eval(&self.program.context, m, subject),
            None => true,
        }
    }

    /// Display form of the pattern this was lowered from.
    pub fn description(&self) -> &str {
        &self.program.description
    }

    pub fn context(&self) -> &[Slot] {
        &self.program.context
    }

    /// Listing of the lowered expression.
    pub fn source(&self) -> &str {
        &self.program.source
    }
}

impl fmt::Debug for Compiled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
            .field("description", &self.program.description)
            .field("context", &self.program.context)
            .field("source", &self.program.source)
            .finish()
    }
}

impl Pattern {
    /// Lower this pattern into a [`Pattern::Compiled`].
    ///
    /// The result behaves exactly like `self` under [`Pattern::execute`],
    /// captures included. Fails with [`PatternError::AlreadyCompiled`] when
    /// `self` is (or contains, on a lowered path) a compiled pattern.
    pub fn specialize(&self) -> Result<Pattern, PatternError> {
        let mut lowering = Lowering::default();
        let lowered = lowering.lower(self, "_obj")?;

        let fallbacks = lowering.slots.iter().filter(|s| matches!(s, Slot::Fallback(_))).count();
        tracing::trace!(pattern = %self, slots = lowering.slots.len(), fallbacks, "specialized pattern");

        let (eval, source) = match lowered {
            Some(l) => (Some(l.eval), l.src),
            None => (None, "true".to_string()),
        };
        let program = Program { description: self.to_string(), context: lowering.slots, eval, source };
        Ok(Pattern::Compiled(Compiled { program: Arc::new(program) }))
    }
}

// --- Lowering ----------------------------------------------------------------

/// Walks the paths `lower` would take, without lowering, for alternatives cut
/// off behind an always-true one.
fn reject_compiled(pat: &Pattern) -> Result<(), PatternError> {
    match pat {
        Pattern::Compiled(_) => Err(PatternError::AlreadyCompiled),
        Pattern::Seq(seq) => seq.head().iter().chain(seq.rest()).chain(seq.tail()).try_for_each(reject_compiled),
        Pattern::And(pats) | Pattern::Or(pats) => pats.iter().try_for_each(reject_compiled),
        _ => Ok(()),
    }
}

struct Lowered {
    eval: Eval,
    src: String,
}

#[derive(Default)]
struct Lowering {
    slots: Vec<Slot>,
}

fn join_src(parts: &[Lowered], op: &str) -> String {
    parts.iter().map(|l| format!("({})", l.src)).collect::<Vec<_>>().join(op)
}

impl Lowering {
    fn push(&mut self, slot: Slot) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    /// Lower `pat`, reading its subject from `target` in the listing.
    /// `None` means "always true, no side effects".
    fn lower(&mut self, pat: &Pattern, target: &str) -> Result<Option<Lowered>, PatternError> {
        let lowered = match pat {
            Pattern::Any | Pattern::Rest => return Ok(None),
            Pattern::Literal(lit) => {
                let slot = self.push(Slot::Literal(lit.clone()));
                let eval: Eval = Box::new(move |ctx, m, v| ctx[slot].test(m, v));
                Lowered { eval, src: format!("_ctx[{slot}] === {target}") }
            }
            Pattern::Named(key) => {
                let src = format!("_match[{key}] = {target}; true");
                let key = key.clone();
                let eval: Eval = Box::new(move |_, m, v| {
                    m.set(key.clone(), v.clone());
                    true
                });
                Lowered { eval, src }
            }
            Pattern::Seq(seq) => self.lower_seq(seq, target)?,
            Pattern::And(pats) => return self.lower_and(pats, target),
            Pattern::Or(pats) => return self.lower_or(pats, target),
            Pattern::Map(_) | Pattern::Opt(_) => {
                let slot = self.push(Slot::Fallback(pat.clone()));
                let eval: Eval = Box::new(move |ctx, m, v| ctx[slot].test(m, v));
                Lowered { eval, src: format!("_ctx[{slot}].execute(_match, {target})") }
            }
            Pattern::Compiled(_) => return Err(PatternError::AlreadyCompiled),
        };
        Ok(Some(lowered))
    }

    fn lower_seq(&mut self, seq: &SeqPattern, target: &str) -> Result<Lowered, PatternError> {
        let size_min = seq.size_min();
        let head_len = seq.head().len();
        let tail_len = seq.tail().len();
        let has_rest = seq.rest().is_some();

        let mut srcs = vec![format!("seq?({target})")];
        srcs.push(if has_rest { format!("len({target}) >= {size_min}") } else { format!("len({target}) == {size_min}") });

        let elm = format!("{target}_elm");
        let mut head: Vec<(usize, Eval)> = Vec::new();
        for (i, p) in seq.head().iter().enumerate() {
            if let Some(l) = self.lower(p, &elm)? {
                srcs.push(format!("({elm} = {target}[{i}]; {})", l.src));
                head.push((i, l.eval));
            }
        }

        let mut tail: Vec<(usize, Eval)> = Vec::new();
        for (i, p) in seq.tail().iter().enumerate() {
            if let Some(l) = self.lower(p, &elm)? {
                srcs.push(format!("({elm} = {target}[-{}]; {})", tail_len - i, l.src));
                tail.push((i, l.eval));
            }
        }

        let mut rest: Option<Eval> = None;
        if let Some(p) = seq.rest() {
            let sub = format!("{target}_r");
            if let Some(l) = self.lower(p, &sub)? {
                srcs.push(format!("({sub} = {target}[{head_len}..-{}]; {})", tail_len + 1, l.src));
                rest = Some(l.eval);
            }
        }

        let len_ok: fn(usize, usize) -> bool = if has_rest { |n, min| n >= min } else { |n, min| n == min };
        let eval: Eval = Box::new(move |ctx, m, v| {
            let Some(items) = v.as_seq() else {
                return false;
            };
            if !len_ok(items.len(), size_min) {
                return false;
            }
            let tail_start = items.len() - tail_len;
            head.iter().all(|(i, e)| e(ctx, m, &items[*i]))
                && tail.iter().all(|(i, e)| e(ctx, m, &items[tail_start + *i]))
                && rest.as_ref().is_none_or(|e| e(ctx, m, &Value::Seq(items[head_len..tail_start].to_vec())))
        });

        let src = srcs.into_iter().map(|s| format!("({s})")).collect::<Vec<_>>().join(" &&\n");
        Ok(Lowered { eval, src })
    }

    fn lower_and(&mut self, pats: &[Pattern], target: &str) -> Result<Option<Lowered>, PatternError> {
        let mut parts = Vec::new();
        for p in pats {
            parts.extend(self.lower(p, target)?);
        }
        if parts.len() <= 1 {
            return Ok(parts.pop());
        }

        let src = join_src(&parts, " &&\n");
        let evals: Vec<Eval> = parts.into_iter().map(|l| l.eval).collect();
        let eval: Eval = Box::new(move |ctx, m, v| evals.iter().all(|e| e(ctx, m, v)));
        Ok(Some(Lowered { eval, src }))
    }

    fn lower_or(&mut self, pats: &[Pattern], target: &str) -> Result<Option<Lowered>, PatternError> {
        let mut parts = Vec::new();
        let mut always = false;
        for (i, p) in pats.iter().enumerate() {
            match self.lower(p, target)? {
                Some(l) => parts.push(l),
                None => {
                    always = true;
                    pats[i + 1..].iter().try_for_each(reject_compiled)?;
                    break;
                }
            }
        }

        if parts.is_empty() {
            if always {
                return Ok(None);
            }
            let eval: Eval = Box::new(|_, _, _| false);
            return Ok(Some(Lowered { eval, src: "false".to_string() }));
        }
        if parts.len() == 1 && !always {
            return Ok(parts.pop());
        }

        let mut src = join_src(&parts, " ||\n");
        let evals: Vec<Eval> = parts.into_iter().map(|l| l.eval).collect();
        let eval: Eval = if always {
            src.push_str(" ||\ntrue");
            Box::new(move |ctx, m, v| {
                // Run alternatives until one matches for their captures; the
                // elided alternative makes the result true either way.
                let _ = evals.iter().any(|e| e(ctx, m, v));
                true
            })
        } else {
            Box::new(move |ctx, m, v| evals.iter().any(|e| e(ctx, m, v)))
        };
        Ok(Some(Lowered { eval, src }))
    }
}
