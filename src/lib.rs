//! # funkit
//!
//! Structural pattern dispatch, adaptive currying and small functional
//! combinators over a dynamically typed [`Value`](value::Value) model.
//!
//! ## Overview
//!
//! - **Pattern dispatch**: [`Matcher`](pattern::Matcher) holds an ordered list
//!   of `(pattern, handler)` rules and resolves a call against the first rule
//!   whose pattern structurally matches the arguments.
//! - **Currying**: [`Curried`](curry::Curried) accumulates positional and
//!   keyword arguments across calls until the wrapped function's arity is
//!   reached.
//! - **Memoization**: [`memoize`](memo::memoize) caches results keyed by the
//!   argument tuple.
//! - **Predicates and combinators**: `less_than`, `element_of`, `negate`,
//!   `compose`, `flip` and friends.
//!
//! ## Feature Flags
//!
//! - `derive`: re-exports the [`curry!`] procedural macro (default)
//! - `serde`: (de)serialization for values and matcher configuration
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use funkit::prelude::*;
//!
//! let fibonacci = Matcher::recursive(|this| {
//!     let this = this.clone();
//!     MatcherBuilder::new()
//!         .named("fibonacci")
//!         .rule(pattern![0], Handler::value(0))
//!         .rule(pattern![1], Handler::value(1))
//!         .rule(
//!             pattern![TypeTag::Int],
//!             Function::new("fibonacci", move |arguments| {
//!                 let n = i64::from_value(arguments.bind(0, "n")?)?;
//!                 let a = i64::from_value(&this.call(&[Value::from(n - 1)])?)?;
//!                 let b = i64::from_value(&this.call(&[Value::from(n - 2)])?)?;
//!                 Ok(Value::from(a + b))
//!             }),
//!         )
//! })
//! .unwrap();
//!
//! assert_eq!(fibonacci.call(&[Value::from(10)]).unwrap(), Value::from(55));
//! assert!(fibonacci.call(&[Value::from("x")]).unwrap_err().is_no_match());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use funkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::combinator::{compose, constant, flip, identity};
    pub use crate::curry::{Applied, Curried};
    pub use crate::error::{Error, NoMatchError, PatternError, Result};
    pub use crate::memo::{CacheKey, Memoized, memoize};
    pub use crate::pattern;
    pub use crate::pattern::{
        CatchAllPolicy, Handler, Matcher, MatcherBuilder, MatcherConfig, MatcherRef, Pattern,
        Predicate, Rule,
    };
    pub use crate::predicate::{
        element_of, equal_to, even, greater_or_equal, greater_than, less_or_equal, less_than,
        negate, odd,
    };
    pub use crate::value::{
        Arguments, FromValue, Function, Keywords, Signature, TypeTag, Value,
    };

    #[cfg(feature = "derive")]
    pub use crate::curry;
}

pub mod combinator;
pub mod curry;
pub mod error;
pub mod memo;
pub mod pattern;
pub mod predicate;
pub mod value;

pub use error::{Error, Result};

#[cfg(feature = "derive")]
pub use funkit_derive::curry;
