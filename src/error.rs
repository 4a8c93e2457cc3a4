//! Error types for dispatch, application and rule registration.
//!
//! Every fallible operation in this crate returns [`Result`]. Errors raised
//! by handlers or wrapped functions pass through the dispatcher and the curry
//! engine unmodified.

use thiserror::Error;

use crate::value::TypeTag;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Raised by a [`Matcher`](crate::pattern::Matcher) when no rule matches the
/// supplied arguments.
///
/// # Examples
///
/// ```rust
/// use funkit::error::NoMatchError;
///
/// let error = NoMatchError { arguments: 1, rules: 3 };
/// assert_eq!(
///     format!("{error}"),
///     "non-exhaustive patterns: none of 3 rules matched 1 argument(s)"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("non-exhaustive patterns: none of {rules} rules matched {arguments} argument(s)")]
pub struct NoMatchError {
    /// Number of positional arguments in the rejected call.
    pub arguments: usize,
    /// Number of rules that were tried.
    pub rules: usize,
}

/// Errors produced while calling functions, dispatching or currying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No rule of a matcher matched the arguments.
    #[error(transparent)]
    NoMatch(#[from] NoMatchError),

    /// A function received more positional arguments than it declares.
    #[error("{function}() takes {expected} positional argument(s) but {found} were given")]
    Arity {
        /// Name of the called function.
        function: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied positional count.
        found: usize,
    },

    /// A declared parameter was bound neither positionally nor by keyword.
    #[error("{function}() missing required argument '{parameter}'")]
    MissingArgument {
        /// Name of the called function.
        function: String,
        /// Name of the unbound parameter.
        parameter: String,
    },

    /// A keyword did not name any declared parameter.
    #[error("{function}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword {
        /// Name of the called function.
        function: String,
        /// The offending keyword.
        keyword: String,
    },

    /// A parameter was bound both positionally and by keyword.
    #[error("{function}() got multiple values for argument '{parameter}'")]
    DuplicateArgument {
        /// Name of the called function.
        function: String,
        /// Name of the doubly bound parameter.
        parameter: String,
    },

    /// A value had the wrong runtime type for a conversion.
    #[error("expected a value of type {expected}, found {found}")]
    Type {
        /// The requested type.
        expected: TypeTag,
        /// The runtime type of the value.
        found: TypeTag,
    },

    /// A curry stage was completed without reaching its arity.
    #[error("curried function still needs {remaining} argument(s)")]
    Incomplete {
        /// Number of parameters still unsatisfied.
        remaining: usize,
    },

    /// A weak matcher handle outlived its matcher.
    #[error("matcher was dropped before the call")]
    Detached,

    /// A failure reported by user code.
    #[error("{0}")]
    Failed(String),
}

impl Error {
    /// Creates an [`Error::Failed`] from any displayable message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Returns `true` if this is a dispatcher [`NoMatchError`].
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch(_))
    }
}

/// Errors detected when a rule is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A catch-all marker appeared before the end of a sequence pattern while
    /// the matcher only accepts trailing markers.
    #[error(
        "catch-all marker at position {position} of a {length}-item sequence (nesting depth {depth}) must be the last item"
    )]
    MisplacedCatchAll {
        /// Nesting depth of the offending sequence, `0` for the top level.
        depth: usize,
        /// Index of the marker within its sequence.
        position: usize,
        /// Number of items in the sequence.
        length: usize,
    },
}
