//! Named rule cache.
//!
//! [`RuleCache::apply`] builds the rule for a name the first time that name is
//! seen and reuses it on every later call. The `define` closure passed on later
//! calls is **ignored**, even when it differs from the first one: the cache is
//! keyed by name only (construct-once-per-name).
//!
//! ## Concurrency
//!
//! The name table sits behind a `parking_lot::Mutex`, but the lock is only held
//! long enough to fetch or insert the per-name `OnceCell`. Construction runs
//! inside `OnceCell::get_or_try_init`, so:
//!
//! - two threads hitting a new name at once run `define` at most once; the
//!   second blocks until the first finishes, then reuses its rule;
//! - no caller ever sees a partially built rule;
//! - building one rule never blocks lookups of other names.
//!
//! If `define` fails, the error is returned to that caller and nothing is
//! stored; the next call for the name will try again.
//!
//! For a process-wide cache, keep one in a static:
//!
//! ```
//! use once_cell::sync::Lazy;
//! use patm::{RuleCache, Value, capture, seq};
//!
//! static RULES: Lazy<RuleCache<i64>> = Lazy::new(RuleCache::new);
//!
//! let second = RULES
//!     .apply("second", &Value::from(vec![1, 2]), &(), |r| {
//!         r.register(seq![1, capture(1)], |m, _| match m[1] {
//!             Value::Int(i) => i,
//!             _ => -1,
//!         })?;
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(second, Some(2));
//! ```

use super::rule::{Rule, RuleBuilder};
use crate::api::Options;
use crate::error::PatternError;
use crate::value::Value;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type RuleCell<R, C> = Arc<OnceCell<Arc<Rule<R, C>>>>;

/// Name → [`Rule`], each built at most once.
pub struct RuleCache<R, C = ()> {
    options: Options,
    rules: Mutex<HashMap<String, RuleCell<R, C>>>,
}

impl<R, C> RuleCache<R, C> {
    /// A cache whose rules use [`Options::default`].
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        RuleCache { options, rules: Mutex::new(HashMap::new()) }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Dispatch `subject` through the rule named `name`, building it from
    /// `define` if this is the first call for that name.
    pub fn apply<F>(&self, name: &str, subject: &Value, ctx: &C, define: F) -> Result<Option<R>, PatternError>
    where
        F: FnOnce(&mut RuleBuilder<R, C>) -> Result<(), PatternError>,
    {
        let rule = self.rule(name, define)?;
        Ok(rule.apply(subject, ctx))
    }

    /// Fetch the rule named `name`, building it from `define` if absent.
    pub fn rule<F>(&self, name: &str, define: F) -> Result<Arc<Rule<R, C>>, PatternError>
    where
        F: FnOnce(&mut RuleBuilder<R, C>) -> Result<(), PatternError>,
    {
        let cell = {
            let mut rules = self.rules.lock();
            Arc::clone(rules.entry(name.to_string()).or_default())
        };

        let mut built = false;
        let rule = cell.get_or_try_init(|| {
            built = true;
            tracing::debug!(rule = name, "building rule");
            Rule::new(&self.options, define).map(Arc::new)
        })?;
        if !built {
            tracing::trace!(rule = name, "rule cache hit");
        }
        Ok(Arc::clone(rule))
    }

    /// The rule stored under `name`, if it has been built.
    pub fn get(&self, name: &str) -> Option<Arc<Rule<R, C>>> {
        let rules = self.rules.lock();
        rules.get(name).and_then(|cell| cell.get().cloned())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of rules built so far.
    pub fn len(&self) -> usize {
        self.rules.lock().values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R, C> Default for RuleCache<R, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, C> fmt::Debug for RuleCache<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.rules.lock().keys().cloned().collect();
        names.sort();
        f.debug_struct("RuleCache").field("options", &self.options).field("names", &names).finish()
    }
}
