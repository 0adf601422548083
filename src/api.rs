use crate::error::PatternError;
use crate::pattern::{Pattern, Plain, PlainKey, build};
use crate::value::Key;

/// Environment variable read by [`Options::from_env`].
pub const SPECIALIZE_ENV: &str = "PATM_SPECIALIZE";

/// Options for building rules.
#[derive(Debug, Clone)]
pub struct Options {
    /// Specialize every pattern as it is registered on a rule. Turning this off
    /// keeps the interpreted tree-walk, which is handy when inspecting patterns.
    pub specialize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { specialize: true }
    }
}

impl Options {
    /// Options that keep registered patterns interpreted.
    pub fn interpreted() -> Self {
        Self { specialize: false }
    }

    /// Defaults, with `PATM_SPECIALIZE=0|false|off|no` disabling
    /// specialization.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(value) = std::env::var(SPECIALIZE_ENV) {
            options.specialize = !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no");
        }
        options
    }
}

/// Matches anything without binding it.
pub fn any() -> Pattern {
    Pattern::Any
}

/// The rest marker for sequence patterns. Combine with a capture to bind the
/// remainder: `rest().named("xs")`.
pub fn rest() -> Pattern {
    Pattern::Rest
}

/// Binds the subject under `key`.
pub fn capture(key: impl Into<Key>) -> Pattern {
    Pattern::capture(key)
}

/// The map key that sets the exact flag of a map pattern instead of adding an
/// entry: `map!{ exact() => true, "a" => 1 }`.
pub fn exact() -> PlainKey {
    PlainKey::Exact
}

/// Builds each alternative and combines them with `Or`.
///
/// # Example
/// ```
/// use patm::{Value, or};
///
/// let one_or_two = or([1, 2]).unwrap();
/// assert!(one_or_two.matches(&Value::Int(2)).is_some());
/// assert!(one_or_two.matches(&Value::Int(3)).is_none());
/// ```
pub fn or<I>(alternatives: I) -> Result<Pattern, PatternError>
where
    I: IntoIterator,
    I::Item: Into<Plain>,
{
    let pats = alternatives.into_iter().map(build).collect::<Result<Vec<_>, _>>()?;
    Ok(Pattern::Or(pats))
}

/// Builds each pattern and combines them with `And`.
pub fn and<I>(patterns: I) -> Result<Pattern, PatternError>
where
    I: IntoIterator,
    I::Item: Into<Plain>,
{
    let pats = patterns.into_iter().map(build).collect::<Result<Vec<_>, _>>()?;
    Ok(Pattern::And(pats))
}

#[cfg(test)]
#[path = "api/tests.rs"]
mod tests;
