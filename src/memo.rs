//! Memoization keyed by the positional argument tuple.
//!
//! Not every argument tuple can serve as a cache key: mappings, functions
//! and NaN floats cannot. [`CacheKey::derive`] makes that decision explicit;
//! when it fails, or when keyword arguments are supplied, the call goes
//! straight to the wrapped function and nothing is cached.
//!
//! # Examples
//!
//! ```rust
//! use funkit::memo::Memoized;
//! use funkit::value::{Arguments, Function, Value};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let square = Memoized::new(Function::new("square", move |arguments| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     match arguments.get(0) {
//!         Some(Value::Int(n)) => Ok(Value::from(n * n)),
//!         _ => Ok(Value::Unit),
//!     }
//! }));
//!
//! assert_eq!(square.call(Arguments::from([Value::from(4)]))?, Value::from(16));
//! assert_eq!(square.call(Arguments::from([Value::from(4)]))?, Value::from(16));
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! # Ok::<(), funkit::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::value::{Arguments, Function, Value, integral_float};

/// One hashable component of a [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Unit,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(Arc<str>),
    Seq(Box<[KeyPart]>),
}

impl KeyPart {
    fn derive(value: &Value) -> Option<Self> {
        match value {
            Value::Unit => Some(Self::Unit),
            Value::Bool(flag) => Some(Self::Bool(*flag)),
            Value::Int(number) => Some(Self::Int(*number)),
            Value::Float(number) if number.is_nan() => None,
            // Integral floats key as integers, matching `Value` equality.
            Value::Float(number) => Some(
                integral_float(*number).map_or(Self::Float(number.to_bits()), Self::Int),
            ),
            Value::Str(text) => Some(Self::Str(Arc::clone(text))),
            Value::Seq(items) => items
                .iter()
                .map(Self::derive)
                .collect::<Option<Box<[_]>>>()
                .map(Self::Seq),
            Value::Map(_) | Value::Function(_) => None,
        }
    }
}

/// A hashable snapshot of an argument tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Box<[KeyPart]>);

impl CacheKey {
    /// Attempts to derive a key from positional arguments.
    ///
    /// Returns `None` if any argument (at any depth) is a mapping, a function
    /// or a NaN float.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funkit::memo::CacheKey;
    /// use funkit::value::Value;
    ///
    /// assert!(CacheKey::derive(&[Value::from(1), Value::from("a")]).is_some());
    /// assert!(CacheKey::derive(&[Value::map([("k", Value::Unit)])]).is_none());
    /// assert_eq!(
    ///     CacheKey::derive(&[Value::from(2)]),
    ///     CacheKey::derive(&[Value::from(2.0)])
    /// );
    /// ```
    pub fn derive(values: &[Value]) -> Option<Self> {
        values
            .iter()
            .map(KeyPart::derive)
            .collect::<Option<Box<[_]>>>()
            .map(Self)
    }
}

struct MemoizedInner {
    function: Function,
    cache: Mutex<FxHashMap<CacheKey, Value>>,
}

/// A function wrapper with a result cache.
///
/// Clones share the cache. The cache lock is not held while the wrapped
/// function runs, so memoized functions may recurse into themselves; when
/// two calls race on the same key the first stored result is kept. Errors
/// are never cached.
#[derive(Clone)]
pub struct Memoized {
    inner: Arc<MemoizedInner>,
}

impl Memoized {
    /// Wraps `function` with an empty cache.
    pub fn new(function: Function) -> Self {
        Self {
            inner: Arc::new(MemoizedInner {
                function,
                cache: Mutex::new(FxHashMap::default()),
            }),
        }
    }

    /// Calls through the cache.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped function returns.
    pub fn call(&self, arguments: Arguments) -> Result<Value> {
        let function = &self.inner.function;
        if !arguments.keywords().is_empty() {
            tracing::trace!(function = %function.name(), "keywords supplied, bypassing cache");
            return function.call(arguments);
        }
        let Some(key) = CacheKey::derive(arguments.values()) else {
            tracing::trace!(function = %function.name(), "unkeyable arguments, bypassing cache");
            return function.call(arguments);
        };
        if let Some(cached) = self.inner.cache.lock().get(&key).cloned() {
            tracing::trace!(function = %function.name(), "cache hit");
            return Ok(cached);
        }
        let computed = function.call(arguments)?;
        Ok(self
            .inner
            .cache
            .lock()
            .entry(key)
            .or_insert(computed)
            .clone())
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.inner.cache.lock().clear();
    }

    /// Exposes the memoized function as a [`Function`] with the wrapped
    /// function's name and signature.
    pub fn to_function(&self) -> Function {
        let memoized = self.clone();
        let function = &self.inner.function;
        let body = move |arguments: Arguments| memoized.call(arguments);
        match function.signature() {
            Some(signature) => Function::with_signature(function.name(), signature.clone(), body),
            None => Function::new(function.name(), body),
        }
    }
}

impl fmt::Debug for Memoized {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Memoized")
            .field("function", &self.inner.function)
            .field("cached", &self.len())
            .finish()
    }
}

/// Wraps `function` in a fresh cache.
///
/// Shorthand for `Memoized::new(function).to_function()`.
pub fn memoize(function: Function) -> Function {
    Memoized::new(function).to_function()
}
