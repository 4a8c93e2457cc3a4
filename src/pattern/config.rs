//! Matcher configuration.

use super::Pattern;
use crate::error::PatternError;

/// Where a catch-all marker may appear inside a sequence pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CatchAllPolicy {
    /// Only as the last item of a sequence; other positions are rejected
    /// when the rule is registered.
    #[default]
    Trailing,
    /// Anywhere; matching stops successfully at the first marker reached.
    Anywhere,
}

impl CatchAllPolicy {
    /// Validates `pattern` against this policy.
    ///
    /// # Errors
    ///
    /// [`PatternError::MisplacedCatchAll`] under [`CatchAllPolicy::Trailing`]
    /// when a marker is followed by further items, at any nesting depth.
    pub fn check(self, pattern: &Pattern) -> Result<(), PatternError> {
        match self {
            Self::Trailing => pattern.check_catch_all(0),
            Self::Anywhere => Ok(()),
        }
    }
}

/// Settings applied to every rule registered on a matcher.
///
/// # Examples
///
/// ```rust
/// use funkit::pattern::{CatchAllPolicy, MatcherConfig};
///
/// let config = MatcherConfig::new().with_catch_all(CatchAllPolicy::Anywhere);
/// assert_eq!(config.catch_all, CatchAllPolicy::Anywhere);
/// assert_eq!(MatcherConfig::default().catch_all, CatchAllPolicy::Trailing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatcherConfig {
    /// Catch-all marker placement rule.
    pub catch_all: CatchAllPolicy,
}

impl MatcherConfig {
    /// The default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            catch_all: CatchAllPolicy::Trailing,
        }
    }

    /// Sets the catch-all policy.
    #[must_use]
    pub const fn with_catch_all(mut self, policy: CatchAllPolicy) -> Self {
        self.catch_all = policy;
        self
    }
}
