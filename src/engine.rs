//! Matching and dispatch engine.
//!
//! A pattern can be executed two ways, and rules are built on top of either:
//!
//! ```text
//! Pattern ──────────────────────────────┐
//!    │                                  │  Pattern::execute        (interp.rs)
//!    │ Pattern::specialize              │    - tree-walk, dispatch per node
//!    v   (specialize.rs)                │
//! Pattern::Compiled ────────────────────┤  Compiled::execute
//!    - composed closures                │    - no per-node dispatch
//!    - literal-context table            │
//!                                       v
//!                               bool + Match (captures)
//!                                       │
//!                      Rule::apply  (rule.rs)   first match wins
//!                                       │
//!                      RuleCache    (cache.rs)  one Rule per name
//! ```
//!
//! ## Responsibilities by module
//!
//! - `interp.rs`: direct recursive evaluation of every pattern variant.
//! - `specialize.rs`: the one-time lowering pass and the [`Compiled`] node.
//!   `Map`/`Opt` sub-patterns are not lowered and fall back to `interp.rs`.
//! - `rule.rs`: ordered pattern → action arms with a default.
//! - `cache.rs`: named, construct-once rule storage.
//!
//! ## Equivalence
//!
//! For every pattern `p` and subject `s`, `p.specialize()?.execute(m, s)`
//! returns the same boolean as `p.execute(m, s)` and leaves `m` with the same
//! captures. `tests/equivalence.rs` checks this with generated patterns.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events: rule construction and cache misses at
//! `debug`, specialization summaries and cache hits at `trace`.

#[path = "engine/cache.rs"]
mod cache;
#[path = "engine/interp.rs"]
mod interp;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/specialize.rs"]
mod specialize;

pub use cache::RuleCache;
pub use rule::{Action, Fallback, Rule, RuleBuilder};
pub use specialize::{Compiled, Slot};
