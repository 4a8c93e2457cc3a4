//! Generic higher-order adapters over [`Function`] values.
//!
//! - [`compose`]: right-to-left composition
//! - [`flip`]: reverse the positional argument order
//! - [`identity`]: return the argument unchanged
//! - [`constant`]: ignore the arguments and return a fixed value
//!
//! # Laws
//!
//! - **Composition**: `compose([f, g, h])(x) == f(g(h(x)))`
//! - **Identity**: `compose([identity(), f]) == compose([f]) == f`
//! - **Double flip**: `flip(flip(f)) == f`

use std::sync::Arc;

use crate::value::{Arguments, Function, Value};

/// Composes functions right to left.
///
/// The last function receives the original arguments (keywords included);
/// each earlier function receives the previous result as its only
/// positional argument. Composing nothing yields [`identity`].
///
/// # Examples
///
/// ```rust
/// use funkit::combinator::compose;
/// use funkit::value::{FromValue, Function, Value};
///
/// let add_one = Function::new("add_one", |arguments| {
///     Ok(Value::from(i64::from_value(arguments.bind(0, "x")?)? + 1))
/// });
/// let double = Function::new("double", |arguments| {
///     Ok(Value::from(i64::from_value(arguments.bind(0, "x")?)? * 2))
/// });
///
/// let composed = compose([add_one, double]);
/// assert_eq!(composed.call_positional(&[Value::from(5)])?, Value::from(11));
/// # Ok::<(), funkit::Error>(())
/// ```
pub fn compose(functions: impl IntoIterator<Item = Function>) -> Function {
    let mut functions: Vec<Function> = functions.into_iter().collect();
    functions.reverse();
    let Some((innermost, outer)) = functions.split_first() else {
        return identity();
    };
    let name: Arc<str> = Arc::from(
        functions
            .iter()
            .rev()
            .map(Function::name)
            .collect::<Vec<_>>()
            .join(" . "),
    );
    let innermost = innermost.clone();
    let outer = outer.to_vec();
    Function::new(name, move |arguments| {
        outer.iter().try_fold(innermost.call(arguments)?, |value, function| {
            function.call(Arguments::from([value]))
        })
    })
}

/// Calls `function` with its positional arguments reversed.
///
/// Keywords are forwarded unchanged. The flipped function carries no
/// signature; wrap it with [`Curried::wrap`](crate::curry::Curried::wrap) to
/// curry it.
///
/// # Examples
///
/// ```rust
/// use funkit::combinator::flip;
/// use funkit::value::{Function, Value};
///
/// let list = Function::new("list", |arguments| Ok(Value::from(arguments.values().to_vec())));
/// let flipped = flip(list);
///
/// assert_eq!(
///     flipped.call_positional(&[Value::from(1), Value::from(2), Value::from(3)])?,
///     Value::seq([Value::from(3), Value::from(2), Value::from(1)])
/// );
/// # Ok::<(), funkit::Error>(())
/// ```
pub fn flip(function: Function) -> Function {
    let name = format!("flip({})", function.name());
    Function::new(name, move |arguments| function.call(arguments.reversed()))
}

/// Returns its single positional argument, or all positional arguments as a
/// sequence when there is not exactly one.
pub fn identity() -> Function {
    Function::new("identity", |arguments| match arguments.values() {
        [single] => Ok(single.clone()),
        values => Ok(Value::seq(values.iter().cloned())),
    })
}

/// Ignores its arguments and returns `value`.
pub fn constant(value: impl Into<Value>) -> Function {
    let value = value.into();
    Function::new("constant", move |_| Ok(value.clone()))
}
