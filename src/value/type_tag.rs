//! Runtime type tags with an is-a hierarchy.

use std::fmt;

/// The runtime type of a [`Value`](super::Value).
///
/// Tags form a small hierarchy: [`TypeTag::Any`] is the supertype of every
/// tag and [`TypeTag::Number`] is the supertype of [`TypeTag::Int`] and
/// [`TypeTag::Float`]. A `Type` pattern matches every value whose tag is a
/// subtype of the pattern's tag.
///
/// # Examples
///
/// ```rust
/// use funkit::value::TypeTag;
///
/// assert!(TypeTag::Int.is_subtype_of(TypeTag::Number));
/// assert!(TypeTag::Int.is_subtype_of(TypeTag::Any));
/// assert!(!TypeTag::Number.is_subtype_of(TypeTag::Int));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeTag {
    /// Supertype of all values.
    Any,
    /// The unit value.
    Unit,
    /// Booleans.
    Bool,
    /// Signed integers.
    Int,
    /// Floating-point numbers.
    Float,
    /// Supertype of `Int` and `Float`.
    Number,
    /// Strings.
    Str,
    /// Ordered sequences.
    Seq,
    /// Keyed mappings.
    Map,
    /// Invocable functions.
    Function,
}

impl TypeTag {
    /// Returns the direct supertype, or `None` for [`TypeTag::Any`].
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Any => None,
            Self::Int | Self::Float => Some(Self::Number),
            _ => Some(Self::Any),
        }
    }

    /// Returns `true` if `self` is `ancestor` or one of its descendants.
    #[must_use]
    pub fn is_subtype_of(self, ancestor: Self) -> bool {
        std::iter::successors(Some(self), |tag| tag.parent()).any(|tag| tag == ancestor)
    }

    /// Lower-case name of the tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unit => "unit",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Number => "number",
            Self::Str => "str",
            Self::Seq => "seq",
            Self::Map => "map",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
