//! The dynamic value model.
//!
//! Dispatch and currying work over a single closed [`Value`] enum so that
//! heterogeneous argument tuples can be matched structurally. Functions are
//! values too, which lets a matcher or a curry stage be stored as a handler
//! or returned from a call.
//!
//! # Equality and ordering
//!
//! - `Int` and `Float` compare exactly with each other: an integer equals a
//!   float only when the float is integral and holds the same value.
//! - Strings and sequences compare lexicographically.
//! - Functions are equal only to themselves (same allocation).
//! - Values of unrelated types are unequal and unordered.

mod arguments;
mod function;
mod type_tag;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use arguments::{Arguments, Keywords};
pub use function::{Function, Signature};
pub use type_tag::TypeTag;

use crate::error::{Error, Result};

/// A dynamically typed value.
///
/// # Examples
///
/// ```rust
/// use funkit::value::{TypeTag, Value};
///
/// let tuple = Value::seq([Value::from(1), Value::from("a")]);
/// assert_eq!(tuple.type_tag(), TypeTag::Seq);
/// assert!(Value::from(1).is_instance_of(TypeTag::Number));
/// assert_eq!(Value::from(2), Value::from(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The unit value.
    #[default]
    Unit,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(Arc<str>),
    /// An ordered sequence.
    Seq(Arc<[Value]>),
    /// A mapping from names to values.
    Map(Arc<BTreeMap<Arc<str>, Value>>),
    /// An invocable function.
    Function(Function),
}

impl Value {
    /// Builds a sequence value.
    pub fn seq(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    /// Builds a mapping value.
    pub fn map<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        ))
    }

    /// The most specific runtime type of this value.
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::Unit => TypeTag::Unit,
            Self::Bool(_) => TypeTag::Bool,
            Self::Int(_) => TypeTag::Int,
            Self::Float(_) => TypeTag::Float,
            Self::Str(_) => TypeTag::Str,
            Self::Seq(_) => TypeTag::Seq,
            Self::Map(_) => TypeTag::Map,
            Self::Function(_) => TypeTag::Function,
        }
    }

    /// Is-instance-of test honoring the [`TypeTag`] hierarchy.
    pub fn is_instance_of(&self, tag: TypeTag) -> bool {
        self.type_tag().is_subtype_of(tag)
    }

    /// The elements if this is a sequence.
    pub fn as_seq(&self) -> Option<&[Self]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The function if this is one.
    pub const fn as_function(&self) -> Option<&Function> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Calls this value if it is a function.
    ///
    /// # Errors
    ///
    /// [`Error::Type`] if the value is not a function, otherwise whatever the
    /// function returns.
    pub fn call(&self, arguments: Arguments) -> Result<Self> {
        match self {
            Self::Function(function) => function.call(arguments),
            other => Err(Error::Type {
                expected: TypeTag::Function,
                found: other.type_tag(),
            }),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// 2^63, the first float above the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The integer a float holds exactly, if any.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub(crate) fn integral_float(number: f64) -> Option<i64> {
    (number.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&number))
        .then_some(number as i64)
}

/// Orders an integer against a float without rounding either side.
#[allow(clippy::cast_possible_truncation)]
fn compare_int_float(integer: i64, number: f64) -> Option<Ordering> {
    if number.is_nan() {
        return None;
    }
    if number >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if number < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = number.trunc();
    // `whole` lies in [-2^63, 2^63) and converts exactly.
    match integer.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&number),
        ordering => Some(ordering),
    }
}

// =============================================================================
// Equality and Ordering
// =============================================================================

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Seq(left), Self::Seq(right)) => left == right,
            (Self::Map(left), Self::Map(right)) => left == right,
            (Self::Function(left), Self::Function(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => left == right,
            (Self::Int(left), Self::Float(right)) | (Self::Float(right), Self::Int(left)) => {
                integral_float(*right) == Some(*left)
            }
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(left), Self::Bool(right)) => left.partial_cmp(right),
            (Self::Int(left), Self::Int(right)) => left.partial_cmp(right),
            (Self::Str(left), Self::Str(right)) => left.partial_cmp(right),
            (Self::Seq(left), Self::Seq(right)) => left.iter().partial_cmp(right.iter()),
            (Self::Float(left), Self::Float(right)) => left.partial_cmp(right),
            (Self::Int(left), Self::Float(right)) => compare_int_float(*left, *right),
            (Self::Float(left), Self::Int(right)) => {
                compare_int_float(*right, *left).map(Ordering::reverse)
            }
            (left, right) if left == right => Some(Ordering::Equal),
            _ => None,
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Seq(Arc::from(items))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

/// Conversion out of a [`Value`], used by typed function bodies and the
/// `curry!` macro.
pub trait FromValue: Sized {
    /// Converts `value`, failing with [`Error::Type`] on a type mismatch.
    ///
    /// # Errors
    ///
    /// [`Error::Type`] when the value has the wrong runtime type.
    fn from_value(value: &Value) -> Result<Self>;
}

const fn mismatch(expected: TypeTag, value: &Value) -> Error {
    Error::Type {
        expected,
        found: value.type_tag(),
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Bool(flag) => Ok(*flag),
            other => Err(mismatch(TypeTag::Bool, other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int(number) => Ok(*number),
            other => Err(mismatch(TypeTag::Int, other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_number()
            .ok_or_else(|| mismatch(TypeTag::Number, value))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Str(text) => Ok(text.to_string()),
            other => Err(mismatch(TypeTag::Str, other)),
        }
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Str(text) => Ok(Arc::clone(text)),
            other => Err(mismatch(TypeTag::Str, other)),
        }
    }
}

impl FromValue for Vec<Value> {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_seq()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| mismatch(TypeTag::Seq, value))
    }
}

impl FromValue for Function {
    fn from_value(value: &Value) -> Result<Self> {
        value
            .as_function()
            .cloned()
            .ok_or_else(|| mismatch(TypeTag::Function, value))
    }
}

// =============================================================================
// Display
// =============================================================================

fn write_joined<'a, I>(formatter: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            formatter.write_str(", ")?;
        }
        write!(formatter, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => formatter.write_str("()"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Int(number) => write!(formatter, "{number}"),
            Self::Float(number) => write!(formatter, "{number:?}"),
            Self::Str(text) => write!(formatter, "{:?}", &**text),
            Self::Seq(items) => {
                formatter.write_str("(")?;
                write_joined(formatter, items.iter())?;
                formatter.write_str(")")
            }
            Self::Map(entries) => {
                formatter.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        formatter.write_str(", ")?;
                    }
                    write!(formatter, "{key}: {value}")?;
                }
                formatter.write_str("}")
            }
            Self::Function(function) => write!(formatter, "{function}"),
        }
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error as _, SerializeMap, SerializeSeq};
        match self {
            Self::Unit => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(number) => serializer.serialize_i64(*number),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::Str(text) => serializer.serialize_str(text),
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries.iter() {
                    map.serialize_entry(&**key, value)?;
                }
                map.end()
            }
            Self::Function(function) => Err(S::Error::custom(format!(
                "cannot serialize {function}"
            ))),
        }
    }
}

#[cfg(feature = "serde")]
struct ValueVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a unit, boolean, number, string, sequence or map")
    }

    fn visit_unit<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Unit)
    }

    fn visit_none<E>(self) -> std::result::Result<Value, E> {
        Ok(Value::Unit)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, flag: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(flag))
    }

    fn visit_i64<E>(self, number: i64) -> std::result::Result<Value, E> {
        Ok(Value::Int(number))
    }

    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E>(self, number: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(number).map_or(Value::Float(number as f64), Value::Int))
    }

    fn visit_f64<E>(self, number: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(number))
    }

    fn visit_str<E>(self, text: &str) -> std::result::Result<Value, E> {
        Ok(Value::from(text))
    }

    fn visit_string<E>(self, text: String) -> std::result::Result<Value, E> {
        Ok(Value::from(text))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = seq.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::from(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.insert(Arc::from(key), value);
        }
        Ok(Value::Map(Arc::new(entries)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// =============================================================================
// Tests
// =============================================================================
