//! Procedural macros for funkit.
//!
//! # Available Function-like Macros
//!
//! - [`curry!`]: Builds a `funkit::curry::Curried` stage from a typed
//!   closure or from a function path plus an arity
//!
//! # Example
//!
//! ```rust,ignore
//! use funkit::curry;
//! use funkit::value::Value;
//!
//! let add = curry!(|a: i64, b: i64| a + b);
//! let add_five = add.call(&[Value::from(5)])?.into_stage().unwrap();
//! assert_eq!(add_five.complete(&[Value::from(3)])?, Value::from(8));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod curry;

use proc_macro::TokenStream;

/// Builds a curried stage from a closure or a function path.
///
/// The generated target is a `funkit::value::Function` whose signature is
/// taken from the closure parameters, so arguments may be supplied
/// positionally or by keyword, in any number of calls.
///
/// # Closure form
///
/// ```rust,ignore
/// use funkit::curry;
/// use funkit::value::Value;
///
/// let greet = curry!(|greeting: String, name: String| format!("{greeting}, {name}"));
/// let hello = greet.call(&[Value::from("Hello")])?.into_stage().unwrap();
///
/// assert_eq!(hello.complete(&[Value::from("Ada")])?, Value::from("Hello, Ada"));
/// assert_eq!(hello.complete(&[Value::from("Alan")])?, Value::from("Hello, Alan"));
/// ```
///
/// Typed parameters are converted with `funkit::value::FromValue`; untyped
/// parameters receive the raw `funkit::value::Value`. The body result is
/// converted with `Into<Value>`.
///
/// # Function path form
///
/// ```rust,ignore
/// use funkit::curry;
///
/// fn volume(width: f64, height: f64, depth: f64) -> f64 {
///     width * height * depth
/// }
///
/// let curried = curry!(volume, 3);
/// assert_eq!(curried.arity(), 3);
/// ```
///
/// Parameters are named `arg0`, `arg1`, ... for keyword binding, and each
/// argument type is inferred from the function.
///
/// # Errors
///
/// Compile errors are reported for closures without parameters, destructuring
/// parameter patterns, an arity below one, or an arity that is not an
/// integer literal.
#[proc_macro]
pub fn curry(input: TokenStream) -> TokenStream {
    curry::curry_impl(input.into()).into()
}
