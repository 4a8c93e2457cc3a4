//! Positional and keyword argument lists.

use std::collections::BTreeMap;
use std::sync::Arc;

use smallvec::SmallVec;

use super::Value;
use crate::error::{Error, Result};

/// Keyword arguments, ordered by name so iteration is deterministic.
pub type Keywords = BTreeMap<Arc<str>, Value>;

/// Inline capacity for positional arguments before spilling to the heap.
const INLINE_ARGUMENTS: usize = 4;

/// Positional storage for [`Arguments`].
type Positional = SmallVec<[Value; INLINE_ARGUMENTS]>;

/// The arguments of a single call: positional values plus keywords.
///
/// # Examples
///
/// ```rust
/// use funkit::value::{Arguments, Value};
///
/// let arguments = Arguments::from([Value::from(1), Value::from(2)]).with_keyword("scale", 10);
///
/// assert_eq!(arguments.values(), &[Value::from(1), Value::from(2)]);
/// assert_eq!(arguments.keyword("scale"), Some(&Value::from(10)));
/// assert_eq!(arguments.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Positional,
    keywords: Keywords,
    callee: Option<Arc<str>>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an argument list from positional values and keywords.
    pub fn from_parts(positional: impl IntoIterator<Item = Value>, keywords: Keywords) -> Self {
        Self {
            positional: positional.into_iter().collect(),
            keywords,
            callee: None,
        }
    }

    /// Adds (or replaces) a keyword argument.
    #[must_use]
    pub fn with_keyword(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    /// The positional values, in call order.
    pub fn values(&self) -> &[Value] {
        &self.positional
    }

    /// The keyword arguments.
    pub const fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    /// The positional value at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// The keyword value named `name`.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    /// Resolves a declared parameter: by position first, then by keyword.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] when the parameter is bound neither
    /// way.
    pub fn bind(&self, index: usize, name: &str) -> Result<&Value> {
        self.positional
            .get(index)
            .or_else(|| self.keywords.get(name))
            .ok_or_else(|| Error::MissingArgument {
                function: self.callee().to_owned(),
                parameter: name.to_owned(),
            })
    }

    /// Total number of supplied arguments, positional plus keyword.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    /// Returns `true` if no argument was supplied.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    /// Name of the function currently receiving these arguments.
    pub fn callee(&self) -> &str {
        self.callee.as_deref().unwrap_or("<anonymous>")
    }

    /// Returns a new list with `later` appended: positional values are
    /// concatenated and `later`'s keywords overwrite ours on collision.
    #[must_use]
    pub fn merged(&self, later: Self) -> Self {
        let mut positional = self.positional.clone();
        positional.extend(later.positional);
        let mut keywords = self.keywords.clone();
        keywords.extend(later.keywords);
        Self {
            positional,
            keywords,
            callee: None,
        }
    }

    /// Splits the list into its positional values and keywords.
    pub fn into_parts(self) -> (Vec<Value>, Keywords) {
        (self.positional.into_vec(), self.keywords)
    }

    pub(crate) fn with_callee(mut self, callee: Arc<str>) -> Self {
        self.callee = Some(callee);
        self
    }

    pub(crate) fn reversed(mut self) -> Self {
        self.positional.reverse();
        self
    }
}

impl<const N: usize> From<[Value; N]> for Arguments {
    fn from(values: [Value; N]) -> Self {
        Self::from_parts(values, Keywords::new())
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::from_parts(values, Keywords::new())
    }
}

impl From<&[Value]> for Arguments {
    fn from(values: &[Value]) -> Self {
        Self::from_parts(values.iter().cloned(), Keywords::new())
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_parts(iter, Keywords::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_bind_prefers_position_then_keyword() {
        let arguments = Arguments::from([Value::from(1)]).with_keyword("b", 2);

        assert_eq!(arguments.bind(0, "a").unwrap(), &Value::from(1));
        assert_eq!(arguments.bind(1, "b").unwrap(), &Value::from(2));
    }

    #[rstest]
    fn test_bind_missing_reports_callee() {
        let arguments = Arguments::new().with_callee(Arc::from("area"));
        let error = arguments.bind(0, "width").unwrap_err();

        assert_eq!(
            error,
            Error::MissingArgument {
                function: "area".to_owned(),
                parameter: "width".to_owned(),
            }
        );
    }

    #[rstest]
    fn test_merged_concatenates_and_later_keywords_win() {
        let first = Arguments::from([Value::from(1)]).with_keyword("k", "old");
        let second = Arguments::from([Value::from(2)]).with_keyword("k", "new");

        let merged = first.merged(second);

        assert_eq!(merged.values(), &[Value::from(1), Value::from(2)]);
        assert_eq!(merged.keyword("k"), Some(&Value::from("new")));
        assert_eq!(merged.len(), 3);
        assert_eq!(first.values(), &[Value::from(1)]);
    }

    #[rstest]
    fn test_reversed_keeps_keywords() {
        let arguments = Arguments::from([Value::from(1), Value::from(2)])
            .with_keyword("k", true)
            .reversed();

        assert_eq!(arguments.values(), &[Value::from(2), Value::from(1)]);
        assert_eq!(arguments.keyword("k"), Some(&Value::from(true)));
    }
}
