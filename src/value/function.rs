//! Shared invocable values and their declared signatures.

use std::fmt;
use std::sync::Arc;

use super::{Arguments, Value};
use crate::error::{Error, Result};

type Body = dyn Fn(Arguments) -> Result<Value> + Send + Sync;

/// The declared parameters of a [`Function`].
///
/// A signature lets the function check its own arity before the body runs,
/// and gives the curry engine the required parameter count.
///
/// # Examples
///
/// ```rust
/// use funkit::value::Signature;
///
/// let signature = Signature::new(["a", "b", "c"]);
/// assert_eq!(signature.required_arity(), 3);
/// assert!(!signature.is_variadic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    parameters: Vec<Arc<str>>,
    variadic: bool,
}

impl Signature {
    /// Creates a signature with the given required parameter names.
    pub fn new<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            variadic: false,
        }
    }

    /// Marks the signature as accepting extra positional and keyword
    /// arguments beyond the required parameters.
    #[must_use]
    pub const fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// The required parameter names, in declaration order.
    pub fn parameters(&self) -> &[Arc<str>] {
        &self.parameters
    }

    /// Number of required (non-variadic) parameters.
    pub const fn required_arity(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` if extra arguments are accepted.
    pub const fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Checks that `arguments` bind every required parameter exactly once.
    ///
    /// # Errors
    ///
    /// [`Error::Arity`] for surplus positional values,
    /// [`Error::UnexpectedKeyword`] for unknown keywords,
    /// [`Error::DuplicateArgument`] for a keyword naming a parameter already
    /// bound by position and [`Error::MissingArgument`] for unbound
    /// parameters.
    pub fn check(&self, function: &str, arguments: &Arguments) -> Result<()> {
        let positional = arguments.values().len();
        if !self.variadic && positional > self.parameters.len() {
            return Err(Error::Arity {
                function: function.to_owned(),
                expected: self.parameters.len(),
                found: positional,
            });
        }

        for keyword in arguments.keywords().keys() {
            match self.parameters.iter().position(|name| name == keyword) {
                Some(index) if index < positional => {
                    return Err(Error::DuplicateArgument {
                        function: function.to_owned(),
                        parameter: keyword.to_string(),
                    });
                }
                Some(_) => {}
                None if self.variadic => {}
                None => {
                    return Err(Error::UnexpectedKeyword {
                        function: function.to_owned(),
                        keyword: keyword.to_string(),
                    });
                }
            }
        }

        let unbound = self
            .parameters
            .iter()
            .skip(positional)
            .find(|name| arguments.keyword(name).is_none());
        match unbound {
            Some(name) => Err(Error::MissingArgument {
                function: function.to_owned(),
                parameter: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

struct FunctionInner {
    name: Arc<str>,
    signature: Option<Signature>,
    body: Box<Body>,
}

/// A named, shareable invocable.
///
/// Cloning a `Function` is cheap; clones share the same body and compare
/// equal to each other.
///
/// # Examples
///
/// ```rust
/// use funkit::value::{Arguments, FromValue, Function, Value};
///
/// let add = Function::with_parameters("add", ["a", "b"], |arguments| {
///     let a = i64::from_value(arguments.bind(0, "a")?)?;
///     let b = i64::from_value(arguments.bind(1, "b")?)?;
///     Ok(Value::from(a + b))
/// });
///
/// let arguments = Arguments::from([Value::from(1)]).with_keyword("b", 2);
/// assert_eq!(add.call(arguments).unwrap(), Value::from(3));
/// assert!(add.call_positional(&[Value::from(1)]).is_err());
/// ```
#[derive(Clone)]
pub struct Function {
    inner: Arc<FunctionInner>,
}

impl Function {
    /// Creates a function without a declared signature; the body receives
    /// whatever it is called with.
    pub fn new<F>(name: impl Into<Arc<str>>, body: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self::build(name.into(), None, Box::new(body))
    }

    /// Creates a function whose arguments are checked against `signature`
    /// before the body runs.
    pub fn with_signature<F>(name: impl Into<Arc<str>>, signature: Signature, body: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self::build(name.into(), Some(signature), Box::new(body))
    }

    /// Shorthand for [`Function::with_signature`] with required parameters.
    pub fn with_parameters<I, S, F>(name: impl Into<Arc<str>>, parameters: I, body: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
        F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_signature(name, Signature::new(parameters), body)
    }

    fn build(name: Arc<str>, signature: Option<Signature>, body: Box<Body>) -> Self {
        Self {
            inner: Arc::new(FunctionInner {
                name,
                signature,
                body,
            }),
        }
    }

    /// The function's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The declared signature, if any.
    pub fn signature(&self) -> Option<&Signature> {
        self.inner.signature.as_ref()
    }

    /// Number of required parameters, if a signature was declared.
    pub fn required_arity(&self) -> Option<usize> {
        self.signature().map(Signature::required_arity)
    }

    /// Invokes the function.
    ///
    /// # Errors
    ///
    /// Signature violations (see [`Signature::check`]) and any error raised
    /// by the body, unchanged.
    pub fn call(&self, arguments: Arguments) -> Result<Value> {
        if let Some(signature) = &self.inner.signature {
            signature.check(&self.inner.name, &arguments)?;
        }
        (self.inner.body)(arguments.with_callee(Arc::clone(&self.inner.name)))
    }

    /// Invokes the function with positional values only.
    ///
    /// # Errors
    ///
    /// Same as [`Function::call`].
    pub fn call_positional(&self, values: &[Value]) -> Result<Value> {
        self.call(Arguments::from(values))
    }

    /// Returns `true` if both handles share the same body.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Function")
            .field("name", &self.inner.name)
            .field("signature", &self.inner.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<function {}>", self.inner.name)
    }
}
