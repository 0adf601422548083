//! Construction and misuse errors.
//!
//! Every error here is raised synchronously at the call that caused it:
//! building a malformed pattern, or specializing one twice. A pattern failing
//! to match is never an error.

/// Errors raised while building, combining or specializing patterns.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// A sequence pattern named more than one rest element.
    #[error("sequence pattern has {count} rest elements; at most one is allowed")]
    MultipleRest { count: usize },

    /// A rest-flagged pattern in a head/tail slot, or a non-rest pattern in the
    /// rest slot.
    #[error("rest pattern used outside the rest position of a sequence")]
    MisplacedRest,

    /// A capture key that is neither an integer index nor a symbol.
    #[error("invalid capture key `{0}`: expected an integer index or a symbol")]
    InvalidCaptureKey(String),

    /// `specialize` called on a pattern that already contains compiled code.
    #[error("pattern is already compiled")]
    AlreadyCompiled,

    #[error("invalid regex literal: {0}")]
    InvalidRegex(#[from] regex::Error),
}
