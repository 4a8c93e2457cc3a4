//! Adaptive partial application.
//!
//! A [`Curried`] stage wraps a function of known arity and accumulates
//! positional and keyword arguments across calls. As soon as the number of
//! accumulated arguments reaches the arity, the function is invoked with all
//! of them; until then each call returns a new stage.
//!
//! # Design Decisions
//!
//! Stages are immutable values. Applying arguments copies the accumulated
//! state into a fresh stage and never touches the original; a partially
//! applied stage may be completed any number of times.
//!
//! Supplying more arguments than the arity is not rejected here: everything
//! accumulated is forwarded and the wrapped function's own signature check
//! decides.
//!
//! # Examples
//!
//! ```rust
//! use funkit::curry::{Applied, Curried};
//! use funkit::value::{FromValue, Function, Value};
//!
//! let add4 = Function::with_parameters("add4", ["a", "b", "c", "d"], |arguments| {
//!     let mut total = 0;
//!     for value in arguments.values() {
//!         total += i64::from_value(value)?;
//!     }
//!     for value in arguments.keywords().values() {
//!         total += i64::from_value(value)?;
//!     }
//!     Ok(Value::from(total))
//! });
//!
//! let add3 = Curried::new(add4).call(&[Value::from(0)])?.into_stage().unwrap();
//! let add2 = add3.call(&[Value::from(0)])?.into_stage().unwrap();
//! assert_eq!(add2.complete(&[Value::from(3), Value::from(1)])?, Value::from(4));
//! # Ok::<(), funkit::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::value::{Arguments, Function, Keywords, Value};

/// The outcome of applying arguments to a [`Curried`] stage.
#[derive(Debug, Clone)]
pub enum Applied {
    /// The arity was reached and the function returned this value.
    Complete(Value),
    /// More arguments are needed.
    Partial(Curried),
}

impl Applied {
    /// Returns `true` if the function was invoked.
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The result if the function was invoked.
    pub fn into_complete(self) -> Option<Value> {
        match self {
            Self::Complete(value) => Some(value),
            Self::Partial(_) => None,
        }
    }

    /// The next stage if more arguments are needed.
    pub fn into_stage(self) -> Option<Curried> {
        match self {
            Self::Complete(_) => None,
            Self::Partial(stage) => Some(stage),
        }
    }

    /// Flattens into a value; a partial stage becomes a function value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Complete(value) => value,
            Self::Partial(stage) => Value::Function(stage.to_function()),
        }
    }
}

/// An immutable partial-application stage.
#[derive(Debug, Clone)]
pub struct Curried {
    target: Function,
    arity: usize,
    accumulated: Arguments,
}

impl Curried {
    /// Wraps `target`, taking the arity from its declared signature.
    ///
    /// A function without a signature has arity zero and is invoked on the
    /// first application.
    pub fn new(target: Function) -> Self {
        let arity = target.required_arity().unwrap_or(0);
        Self::wrap(target, arity)
    }

    /// Wraps `target` with an explicit arity.
    pub fn wrap(target: Function, arity: usize) -> Self {
        Self {
            target,
            arity,
            accumulated: Arguments::new(),
        }
    }

    /// The wrapped function.
    pub const fn target(&self) -> &Function {
        &self.target
    }

    /// The fixed number of arguments required before invocation.
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// The arguments accumulated so far.
    pub const fn accumulated(&self) -> &Arguments {
        &self.accumulated
    }

    /// How many more arguments are needed.
    pub fn remaining(&self) -> usize {
        self.arity.saturating_sub(self.accumulated.len())
    }

    /// Applies new arguments on top of the accumulated ones.
    ///
    /// # Errors
    ///
    /// Whatever the wrapped function returns when it is invoked.
    pub fn apply(&self, arguments: Arguments) -> Result<Applied> {
        let merged = self.accumulated.merged(arguments);
        tracing::trace!(
            function = %self.target.name(),
            supplied = merged.len(),
            arity = self.arity,
            "curried application"
        );
        if merged.len() >= self.arity {
            return self.target.call(merged).map(Applied::Complete);
        }
        Ok(Applied::Partial(Self {
            target: self.target.clone(),
            arity: self.arity,
            accumulated: merged,
        }))
    }

    /// Applies positional values.
    ///
    /// # Errors
    ///
    /// Same as [`Curried::apply`].
    pub fn call(&self, values: &[Value]) -> Result<Applied> {
        self.apply(Arguments::from(values))
    }

    /// Applies positional values and keywords.
    ///
    /// # Errors
    ///
    /// Same as [`Curried::apply`].
    pub fn call_with(&self, values: &[Value], keywords: &Keywords) -> Result<Applied> {
        self.apply(Arguments::from_parts(values.iter().cloned(), keywords.clone()))
    }

    /// Applies positional values that must complete the stage.
    ///
    /// # Errors
    ///
    /// [`Error::Incomplete`] if the arity is still not reached, otherwise as
    /// [`Curried::apply`].
    pub fn complete(&self, values: &[Value]) -> Result<Value> {
        match self.call(values)? {
            Applied::Complete(value) => Ok(value),
            Applied::Partial(stage) => Err(Error::Incomplete {
                remaining: stage.remaining(),
            }),
        }
    }

    /// Exposes the stage as a [`Function`]; partial results come back as
    /// function values.
    pub fn to_function(&self) -> Function {
        let stage = self.clone();
        Function::new(self.target.name(), move |arguments| {
            stage.apply(arguments).map(Applied::into_value)
        })
    }
}

impl From<Curried> for Value {
    fn from(stage: Curried) -> Self {
        Self::Function(stage.to_function())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FromValue;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn concat3() -> Function {
        Function::with_parameters("concat3", ["a", "b", "c"], |arguments| {
            let parts = ["a", "b", "c"]
                .iter()
                .enumerate()
                .map(|(index, name)| String::from_value(arguments.bind(index, name)?))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::from(parts.concat()))
        })
    }

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().copied().map(Value::from).collect()
    }

    #[rstest]
    fn test_partial_then_complete(concat3: Function) {
        let stage = Curried::new(concat3).call(&strings(&["x"])).unwrap();
        let stage = stage.into_stage().unwrap();
        assert_eq!(stage.remaining(), 2);
        assert_eq!(stage.complete(&strings(&["y", "z"])).unwrap(), Value::from("xyz"));
    }

    #[rstest]
    fn test_stage_is_not_mutated_by_application(concat3: Function) {
        let root = Curried::new(concat3);
        let branch = root.call(&strings(&["a"])).unwrap().into_stage().unwrap();

        assert_eq!(branch.complete(&strings(&["b", "c"])).unwrap(), Value::from("abc"));
        assert_eq!(branch.complete(&strings(&["y", "z"])).unwrap(), Value::from("ayz"));
        assert!(root.accumulated().is_empty());
        assert_eq!(branch.accumulated().values(), strings(&["a"]).as_slice());
    }

    #[rstest]
    fn test_keywords_count_towards_arity(concat3: Function) {
        let mut keywords = Keywords::new();
        keywords.insert(Arc::from("c"), Value::from("!"));
        let stage = Curried::new(concat3)
            .call_with(&[], &keywords)
            .unwrap()
            .into_stage()
            .unwrap();
        assert_eq!(stage.remaining(), 2);
        assert_eq!(stage.complete(&strings(&["h", "i"])).unwrap(), Value::from("hi!"));
    }

    #[rstest]
    fn test_later_keyword_overrides_earlier(concat3: Function) {
        let stage = Curried::new(concat3)
            .apply(Arguments::new().with_keyword("c", "old"))
            .unwrap()
            .into_stage()
            .unwrap();
        let result = stage
            .apply(Arguments::from(strings(&["a"])).with_keyword("c", "new"))
            .unwrap()
            .into_stage()
            .unwrap()
            .complete(&strings(&["b"]))
            .unwrap();
        assert_eq!(result, Value::from("abnew"));
    }

    #[rstest]
    fn test_overshoot_is_forwarded_to_target(concat3: Function) {
        let error = Curried::new(concat3)
            .complete(&strings(&["a", "b", "c", "d"]))
            .unwrap_err();
        assert_eq!(
            error,
            Error::Arity {
                function: "concat3".into(),
                expected: 3,
                found: 4
            }
        );
    }

    #[rstest]
    fn test_complete_reports_remaining(concat3: Function) {
        let error = Curried::new(concat3).complete(&strings(&["a"])).unwrap_err();
        assert_eq!(error, Error::Incomplete { remaining: 2 });
    }

    #[rstest]
    fn test_explicit_arity_and_unsigned_function() {
        let count = Function::new("count", |arguments| {
            Ok(Value::from(i64::try_from(arguments.len()).unwrap_or(i64::MAX)))
        });
        assert!(Curried::new(count.clone()).call(&[]).unwrap().is_complete());

        let stage = Curried::wrap(count, 2);
        let partial = stage.call(&[Value::Unit]).unwrap();
        assert!(!partial.is_complete());
        assert_eq!(
            partial.into_stage().unwrap().complete(&[Value::Unit]).unwrap(),
            Value::from(2)
        );
    }

    #[rstest]
    fn test_stage_as_function_value(concat3: Function) {
        let function = Curried::new(concat3).to_function();
        let partial = function.call_positional(&strings(&["p"])).unwrap();
        let next = partial.call(Arguments::from(strings(&["q"]))).unwrap();
        assert_eq!(
            next.call(Arguments::from(strings(&["r"]))).unwrap(),
            Value::from("pqr")
        );
    }
}
