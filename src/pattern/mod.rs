//! Structural pattern matching and rule dispatch.
//!
//! A [`Matcher`] holds an ordered list of `(pattern, handler)` rules. A call
//! is resolved against the **first** rule whose pattern structurally matches
//! the argument tuple; there is no specificity-based reordering and no
//! backtracking.
//!
//! # Pattern semantics
//!
//! | Pattern              | Matches                                             |
//! |----------------------|-----------------------------------------------------|
//! | `Sequence(items)`    | a sequence of the same arrangement (see below)      |
//! | `Type(tag)`          | values whose type is-a `tag`                        |
//! | `Predicate(p)`       | values for which `p` returns `true`                 |
//! | `Wildcard`           | anything                                            |
//! | `Literal(v)`         | values equal to `v`                                 |
//!
//! Inside a sequence, `Wildcard` is the catch-all marker: it matches the rest
//! of the sequence (zero or more elements) and ends the comparison. Without a
//! marker, a sequence pattern only matches a sequence of exactly the same
//! length. To test a single element against "anything", use
//! [`TypeTag::Any`].
//!
//! # Examples
//!
//! ```rust
//! use funkit::pattern;
//! use funkit::pattern::Pattern;
//! use funkit::value::{TypeTag, Value};
//!
//! let pair_prefix = pattern![TypeTag::Int, TypeTag::Int, ..];
//!
//! assert!(pair_prefix.matches_arguments(&[Value::from(1), Value::from(2), Value::from(3)]));
//! assert!(!pair_prefix.matches_arguments(&[Value::from(1), Value::from("a")]));
//! ```

mod config;
mod matcher;

use std::fmt;
use std::ops::RangeFull;
use std::sync::Arc;

pub use config::{CatchAllPolicy, MatcherConfig};
pub use matcher::{Handler, Matcher, MatcherBuilder, MatcherRef, Rule};

use crate::error::PatternError;
use crate::value::{Function, TypeTag, Value};

type Test = dyn Fn(&Value) -> bool + Send + Sync;

/// A named boolean test over a single value.
///
/// Predicates are used as [`Pattern::Predicate`] rule tests and can be turned
/// into ordinary [`Function`]s.
///
/// # Examples
///
/// ```rust
/// use funkit::pattern::Predicate;
/// use funkit::value::Value;
///
/// let positive = Predicate::new("positive", |value| *value > Value::from(0));
/// assert!(positive.test(&Value::from(3)));
/// assert!(positive.negate().test(&Value::from(-3)));
/// ```
#[derive(Clone)]
pub struct Predicate {
    name: Arc<str>,
    test: Arc<Test>,
}

impl Predicate {
    /// Creates a predicate from a closure.
    pub fn new<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// The predicate's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }

    /// Returns the logical negation of this predicate.
    #[must_use]
    pub fn negate(self) -> Self {
        let name = format!("not {}", self.name);
        Self::new(name, move |value| !self.test(value))
    }

    /// Exposes the predicate as a one-parameter function returning a
    /// [`Value::Bool`].
    pub fn to_function(&self) -> Function {
        let predicate = self.clone();
        Function::with_parameters(Arc::clone(&self.name), ["value"], move |arguments| {
            Ok(Value::Bool(predicate.test(arguments.bind(0, "value")?)))
        })
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Predicate").field(&self.name).finish()
    }
}

/// A structural description tested against a call's arguments.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches anything; inside a sequence, matches the rest of it.
    Wildcard,
    /// Matches a sequence item by item.
    Sequence(Vec<Pattern>),
    /// Matches values whose runtime type is-a tag.
    Type(TypeTag),
    /// Matches values accepted by a predicate.
    Predicate(Predicate),
    /// Matches values equal to the literal.
    Literal(Value),
}

impl Pattern {
    /// Builds a sequence pattern.
    pub fn sequence<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Builds a literal pattern.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Builds a predicate pattern from a closure.
    pub fn predicate<F>(name: impl Into<Arc<str>>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(name, test))
    }

    /// Tests this pattern against a single value.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Sequence(items) => value
                .as_seq()
                .is_some_and(|values| matches_items(items, values)),
            Self::Type(tag) => value.is_instance_of(*tag),
            Self::Predicate(predicate) => predicate.test(value),
            Self::Wildcard => true,
            Self::Literal(expected) => expected == value,
        }
    }

    /// Tests this pattern against an argument tuple.
    ///
    /// The tuple is treated as a sequence value; sequence and wildcard
    /// patterns are checked without materializing it.
    pub fn matches_arguments(&self, arguments: &[Value]) -> bool {
        match self {
            Self::Sequence(items) => matches_items(items, arguments),
            Self::Wildcard => true,
            other => other.matches(&Value::seq(arguments.iter().cloned())),
        }
    }

    pub(crate) fn check_catch_all(&self, depth: usize) -> Result<(), PatternError> {
        let Self::Sequence(items) = self else {
            return Ok(());
        };
        for (position, item) in items.iter().enumerate() {
            if matches!(item, Self::Wildcard) && position + 1 != items.len() {
                return Err(PatternError::MisplacedCatchAll {
                    depth,
                    position,
                    length: items.len(),
                });
            }
            item.check_catch_all(depth + 1)?;
        }
        Ok(())
    }
}

fn matches_items(items: &[Pattern], values: &[Value]) -> bool {
    for (index, item) in items.iter().enumerate() {
        if matches!(item, Pattern::Wildcard) {
            return true;
        }
        match values.get(index) {
            Some(value) if item.matches(value) => {}
            _ => return false,
        }
    }
    items.len() == values.len()
}

// =============================================================================
// Conversions
// =============================================================================

impl From<RangeFull> for Pattern {
    fn from(_: RangeFull) -> Self {
        Self::Wildcard
    }
}

impl From<TypeTag> for Pattern {
    fn from(tag: TypeTag) -> Self {
        Self::Type(tag)
    }
}

impl From<Predicate> for Pattern {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Vec<Self>> for Pattern {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

macro_rules! literal_pattern_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Pattern {
                fn from(value: $source) -> Self {
                    Self::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_pattern_from!((), bool, i64, i32, u32, f64, &str, String);

/// Builds a [`Pattern::Sequence`] from items convertible into patterns.
///
/// A trailing `..` is the catch-all marker.
///
/// # Examples
///
/// ```rust
/// use funkit::pattern;
/// use funkit::value::{TypeTag, Value};
///
/// let starts_with_one = pattern![1, ..];
/// assert!(starts_with_one.matches_arguments(&[Value::from(1)]));
/// assert!(starts_with_one.matches_arguments(&[Value::from(1), Value::from(2)]));
///
/// let exactly_two_ints = pattern![TypeTag::Int, TypeTag::Int];
/// assert!(!exactly_two_ints.matches_arguments(&[Value::from(1)]));
/// ```
#[macro_export]
macro_rules! pattern {
    ($($item:expr),* $(,)?) => {
        $crate::pattern::Pattern::Sequence(::std::vec![$($crate::pattern::Pattern::from($item)),*])
    };
}
