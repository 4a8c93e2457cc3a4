//! Ordered rule storage and first-match dispatch.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{MatcherConfig, Pattern};
use crate::curry::Curried;
use crate::error::{Error, NoMatchError, PatternError, Result};
use crate::value::{Arguments, Function, Keywords, Value};

const DEFAULT_NAME: &str = "matcher";

/// What a rule produces once its pattern matched.
///
/// Callability is explicit: a function stored as [`Handler::Value`] is
/// returned as-is, not called.
#[derive(Debug, Clone)]
pub enum Handler {
    /// Called with the full original arguments, keywords included.
    Invoke(Function),
    /// Returned verbatim; keywords are dropped.
    Value(Value),
}

impl Handler {
    /// A handler returning `value` without invoking anything.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// A handler calling `function`.
    pub const fn invoke(function: Function) -> Self {
        Self::Invoke(function)
    }

    fn resolve(&self, arguments: Arguments) -> Result<Value> {
        match self {
            Self::Invoke(function) => function.call(arguments),
            Self::Value(value) => Ok(value.clone()),
        }
    }
}

impl From<Function> for Handler {
    fn from(function: Function) -> Self {
        Self::Invoke(function)
    }
}

impl From<Curried> for Handler {
    fn from(stage: Curried) -> Self {
        Self::Invoke(stage.to_function())
    }
}

impl From<Matcher> for Handler {
    fn from(matcher: Matcher) -> Self {
        Self::Invoke(matcher.to_function())
    }
}

impl From<MatcherRef> for Handler {
    fn from(matcher: MatcherRef) -> Self {
        Self::Invoke(matcher.to_function())
    }
}

impl From<Value> for Handler {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! value_handler_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Handler {
                fn from(value: $source) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

value_handler_from!((), bool, i64, i32, u32, f64, &str, String);

/// A `(pattern, handler)` pair.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    handler: Handler,
}

impl Rule {
    /// Creates a rule.
    pub fn new(pattern: impl Into<Pattern>, handler: impl Into<Handler>) -> Self {
        Self {
            pattern: pattern.into(),
            handler: handler.into(),
        }
    }

    /// The rule's pattern.
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The rule's handler.
    pub const fn handler(&self) -> &Handler {
        &self.handler
    }
}

struct MatcherInner {
    name: Arc<str>,
    config: MatcherConfig,
    rules: RwLock<Arc<Vec<Rule>>>,
}

impl MatcherInner {
    fn snapshot(&self) -> Arc<Vec<Rule>> {
        Arc::clone(&self.rules.read())
    }

    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(matcher = %self.name, arguments = arguments.values().len())
    )]
    fn dispatch(&self, arguments: Arguments) -> Result<Value> {
        let rules = self.snapshot();
        let Some((index, rule)) = rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.pattern.matches_arguments(arguments.values()))
        else {
            tracing::debug!(rules = rules.len(), "no pattern matched");
            return Err(NoMatchError {
                arguments: arguments.values().len(),
                rules: rules.len(),
            }
            .into());
        };
        tracing::trace!(rule = index, "pattern matched");
        rule.handler.resolve(arguments)
    }

    fn register(&self, rules: Vec<Rule>) -> std::result::Result<(), PatternError> {
        for rule in &rules {
            self.config.catch_all.check(&rule.pattern)?;
        }
        let mut stored = self.rules.write();
        let stored = Arc::make_mut(&mut stored);
        stored.extend(rules);
        tracing::trace!(matcher = %self.name, rules = stored.len(), "rules registered");
        Ok(())
    }
}

/// A pattern-matching dispatcher.
///
/// `Matcher` is a cheap, cloneable handle; clones share the same rule list.
/// Rules are only ever appended.
///
/// # Thread safety
///
/// Dispatch takes a snapshot of the rule list and releases the lock before
/// matching, so handlers may recurse into (or register on) their own
/// matcher. Registering while other threads dispatch is memory-safe, but
/// which of the two rule lists a concurrent dispatch sees is unspecified:
/// finish registration before sharing a matcher if results must be
/// deterministic.
///
/// # Examples
///
/// ```rust
/// use funkit::pattern;
/// use funkit::pattern::{Handler, Matcher};
/// use funkit::value::{TypeTag, Value};
///
/// let describe = Matcher::new();
/// describe
///     .register(pattern![0], "zero")?
///     .register(pattern![TypeTag::Int], "integer")?
///     .register(pattern![..], "something else")?;
///
/// assert_eq!(describe.call(&[Value::from(0)])?, Value::from("zero"));
/// assert_eq!(describe.call(&[Value::from(7)])?, Value::from("integer"));
/// assert_eq!(describe.call(&[Value::from("x")])?, Value::from("something else"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct Matcher {
    inner: Arc<MatcherInner>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    /// Creates an empty matcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MatcherConfig::default())
    }

    /// Creates an empty matcher with `config`.
    #[must_use]
    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            inner: Arc::new(MatcherInner {
                name: Arc::from(DEFAULT_NAME),
                config,
                rules: RwLock::new(Arc::new(Vec::new())),
            }),
        }
    }

    /// Builds a matcher whose rules refer back to the matcher itself.
    ///
    /// The handle is allocated first and passed to `build` as a weak
    /// [`MatcherRef`]; rule bodies capture it, then the rules returned by the
    /// builder are installed. Calls through the handle made while `build`
    /// runs fail with [`Error::Detached`].
    ///
    /// # Errors
    ///
    /// The first [`PatternError`] among the builder's rules.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funkit::pattern;
    /// use funkit::pattern::{Matcher, MatcherBuilder};
    /// use funkit::value::{FromValue, Function, TypeTag, Value};
    ///
    /// let length = Matcher::recursive(|this| {
    ///     let this = this.clone();
    ///     MatcherBuilder::new()
    ///         .rule(pattern![Value::seq([])], 0)
    ///         .rule(
    ///             pattern![TypeTag::Seq],
    ///             Function::new("length", move |arguments| {
    ///                 let items = Vec::<Value>::from_value(arguments.bind(0, "items")?)?;
    ///                 let tail = Value::seq(items[1..].to_vec());
    ///                 let rest = i64::from_value(&this.call(&[tail])?)?;
    ///                 Ok(Value::from(rest + 1))
    ///             }),
    ///         )
    /// })?;
    ///
    /// let list = Value::seq([Value::from(1), Value::from(2), Value::from(3)]);
    /// assert_eq!(length.call(&[list])?, Value::from(3));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn recursive<F>(build: F) -> std::result::Result<Self, PatternError>
    where
        F: FnOnce(&MatcherRef) -> MatcherBuilder,
    {
        let mut outcome = Ok(());
        let inner = Arc::new_cyclic(|weak| {
            let builder = build(&MatcherRef {
                inner: Weak::clone(weak),
            });
            outcome = builder.validate();
            builder.into_inner()
        });
        outcome.map(|()| Self { inner })
    }

    /// The matcher's name, used in logs and as its function name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The configuration rules are validated against.
    pub fn config(&self) -> MatcherConfig {
        self.inner.config
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.inner.rules.read().len()
    }

    /// Returns `true` if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of the current rules, in priority order.
    pub fn rules(&self) -> Arc<Vec<Rule>> {
        self.inner.snapshot()
    }

    /// Appends a rule and returns the matcher for chaining.
    ///
    /// # Errors
    ///
    /// [`PatternError`] if the pattern violates the configured
    /// [`CatchAllPolicy`](super::CatchAllPolicy); the rule is not added.
    pub fn register(
        &self,
        pattern: impl Into<Pattern>,
        handler: impl Into<Handler>,
    ) -> std::result::Result<&Self, PatternError> {
        self.inner.register(vec![Rule::new(pattern, handler)])?;
        Ok(self)
    }

    /// Appends several rules; either all of them are added or none.
    ///
    /// # Errors
    ///
    /// The first [`PatternError`] among `rules`.
    pub fn extend(
        &self,
        rules: impl IntoIterator<Item = Rule>,
    ) -> std::result::Result<&Self, PatternError> {
        self.inner.register(rules.into_iter().collect())?;
        Ok(self)
    }

    /// Index of the rule that would handle `arguments`.
    pub fn find(&self, arguments: &[Value]) -> Option<usize> {
        self.inner
            .snapshot()
            .iter()
            .position(|rule| rule.pattern.matches_arguments(arguments))
    }

    /// Resolves a call with positional values and keywords.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatch`] when no rule matches; otherwise whatever the
    /// matched handler returns.
    pub fn dispatch(&self, arguments: &[Value], keywords: &Keywords) -> Result<Value> {
        self.inner.dispatch(Arguments::from_parts(
            arguments.iter().cloned(),
            keywords.clone(),
        ))
    }

    /// Resolves a call with positional values only.
    ///
    /// # Errors
    ///
    /// Same as [`Matcher::dispatch`].
    pub fn call(&self, arguments: &[Value]) -> Result<Value> {
        self.inner.dispatch(Arguments::from(arguments))
    }

    /// Resolves a call from an owned argument list.
    ///
    /// # Errors
    ///
    /// Same as [`Matcher::dispatch`].
    pub fn dispatch_arguments(&self, arguments: Arguments) -> Result<Value> {
        self.inner.dispatch(arguments)
    }

    /// A weak handle that does not keep the matcher alive.
    pub fn downgrade(&self) -> MatcherRef {
        MatcherRef {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Exposes the matcher as a [`Function`] holding a strong handle.
    ///
    /// Storing this function in one of the matcher's own rules creates a
    /// reference cycle; use [`MatcherRef::to_function`] for self-reference.
    pub fn to_function(&self) -> Function {
        let matcher = self.clone();
        Function::new(Arc::clone(&self.inner.name), move |arguments| {
            matcher.dispatch_arguments(arguments)
        })
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Matcher")
            .field("name", &self.inner.name)
            .field("config", &self.inner.config)
            .field("rules", &self.len())
            .finish()
    }
}

/// A weak handle to a [`Matcher`], for rule bodies that recurse into their
/// own matcher.
#[derive(Clone)]
pub struct MatcherRef {
    inner: Weak<MatcherInner>,
}

impl MatcherRef {
    /// Upgrades to a strong handle if the matcher is still alive.
    pub fn upgrade(&self) -> Option<Matcher> {
        self.inner.upgrade().map(|inner| Matcher { inner })
    }

    /// Resolves a call with positional values only.
    ///
    /// # Errors
    ///
    /// [`Error::Detached`] if the matcher is gone, otherwise as
    /// [`Matcher::dispatch`].
    pub fn call(&self, arguments: &[Value]) -> Result<Value> {
        self.dispatch_arguments(Arguments::from(arguments))
    }

    /// Resolves a call with positional values and keywords.
    ///
    /// # Errors
    ///
    /// Same as [`MatcherRef::call`].
    pub fn dispatch(&self, arguments: &[Value], keywords: &Keywords) -> Result<Value> {
        self.dispatch_arguments(Arguments::from_parts(
            arguments.iter().cloned(),
            keywords.clone(),
        ))
    }

    /// Resolves a call from an owned argument list.
    ///
    /// # Errors
    ///
    /// Same as [`MatcherRef::call`].
    pub fn dispatch_arguments(&self, arguments: Arguments) -> Result<Value> {
        self.inner
            .upgrade()
            .ok_or(Error::Detached)?
            .dispatch(arguments)
    }

    /// Exposes the matcher as a [`Function`] without keeping it alive.
    ///
    /// The name is read when this is called. Inside the builder passed to
    /// [`Matcher::recursive`] the matcher is not installed yet, so the
    /// function is named `"matcher"`; use [`MatcherRef::to_function_named`]
    /// there.
    pub fn to_function(&self) -> Function {
        let name = self
            .inner
            .upgrade()
            .map_or_else(|| Arc::from(DEFAULT_NAME), |inner| Arc::clone(&inner.name));
        self.to_function_named(name)
    }

    /// Exposes the matcher as a [`Function`] called `name`.
    pub fn to_function_named(&self, name: impl Into<Arc<str>>) -> Function {
        let matcher = self.clone();
        Function::new(name, move |arguments| matcher.dispatch_arguments(arguments))
    }
}

impl std::fmt::Debug for MatcherRef {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MatcherRef")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Collects rules before a [`Matcher`] is created.
///
/// # Examples
///
/// ```rust
/// use funkit::pattern;
/// use funkit::pattern::{CatchAllPolicy, MatcherBuilder, MatcherConfig};
/// use funkit::value::Value;
///
/// let matcher = MatcherBuilder::new()
///     .named("sign")
///     .config(MatcherConfig::new().with_catch_all(CatchAllPolicy::Anywhere))
///     .rule(pattern![0], "zero")
///     .rule(pattern![..], "non-zero")
///     .build()?;
///
/// assert_eq!(matcher.name(), "sign");
/// assert_eq!(matcher.call(&[Value::from(3)])?, Value::from("non-zero"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatcherBuilder {
    name: Option<Arc<str>>,
    config: MatcherConfig,
    rules: Vec<Rule>,
}

impl MatcherBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the matcher's name.
    #[must_use]
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the matcher's configuration.
    #[must_use]
    pub const fn config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn rule(mut self, pattern: impl Into<Pattern>, handler: impl Into<Handler>) -> Self {
        self.rules.push(Rule::new(pattern, handler));
        self
    }

    /// Validates the rules and creates the matcher.
    ///
    /// # Errors
    ///
    /// The first [`PatternError`] among the rules.
    pub fn build(self) -> std::result::Result<Matcher, PatternError> {
        self.validate()?;
        Ok(Matcher {
            inner: Arc::new(self.into_inner()),
        })
    }

    fn validate(&self) -> std::result::Result<(), PatternError> {
        self.rules
            .iter()
            .try_for_each(|rule| self.config.catch_all.check(&rule.pattern))
    }

    fn into_inner(self) -> MatcherInner {
        MatcherInner {
            name: self.name.unwrap_or_else(|| Arc::from(DEFAULT_NAME)),
            config: self.config,
            rules: RwLock::new(Arc::new(self.rules)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::CatchAllPolicy;
    use crate::value::TypeTag;
    use crate::{Error, pattern};
    use rstest::rstest;

    #[rstest]
    fn test_empty_matcher_fails_with_no_match() {
        let error = Matcher::new().call(&[Value::from(1)]).unwrap_err();
        assert_eq!(
            error,
            Error::NoMatch(NoMatchError {
                arguments: 1,
                rules: 0
            })
        );
    }

    #[rstest]
    fn test_first_matching_rule_wins() {
        let matcher = Matcher::new();
        matcher
            .register(pattern![TypeTag::Int], "first")
            .unwrap()
            .register(pattern![1], "second")
            .unwrap();
        assert_eq!(matcher.call(&[Value::from(1)]).unwrap(), Value::from("first"));
        assert_eq!(matcher.find(&[Value::from(1)]), Some(0));
        assert_eq!(matcher.find(&[Value::from("x")]), None);
    }

    #[rstest]
    fn test_value_handler_returns_function_uncalled() {
        let function = Function::new("boom", |_| Err(Error::failed("called")));
        let matcher = MatcherBuilder::new()
            .rule(pattern![..], Handler::value(function.clone()))
            .build()
            .unwrap();
        assert_eq!(matcher.call(&[]).unwrap(), Value::Function(function));
    }

    #[rstest]
    fn test_invoked_handler_receives_keywords() {
        let handler = Function::new("scale", |arguments| {
            let factor = arguments.keyword("factor").cloned().unwrap_or(Value::from(1));
            Ok(Value::seq([arguments.values()[0].clone(), factor]))
        });
        let matcher = MatcherBuilder::new()
            .rule(pattern![TypeTag::Int], handler)
            .build()
            .unwrap();
        let mut keywords = Keywords::new();
        keywords.insert(Arc::from("factor"), Value::from(3));

        let result = matcher.dispatch(&[Value::from(2)], &keywords).unwrap();

        assert_eq!(result, Value::seq([Value::from(2), Value::from(3)]));
    }

    #[rstest]
    fn test_handler_errors_propagate_unchanged() {
        let matcher = MatcherBuilder::new()
            .rule(
                pattern![..],
                Function::new("fails", |_| Err(Error::failed("inner"))),
            )
            .build()
            .unwrap();
        assert_eq!(matcher.call(&[]).unwrap_err(), Error::failed("inner"));
    }

    #[rstest]
    fn test_trailing_policy_rejects_misplaced_marker() {
        let matcher = Matcher::new();
        let error = matcher.register(pattern![.., 1], 0).unwrap_err();
        assert!(matches!(error, PatternError::MisplacedCatchAll { position: 0, .. }));
        assert!(matcher.is_empty());
    }

    #[rstest]
    fn test_anywhere_policy_accepts_misplaced_marker() {
        let matcher =
            Matcher::with_config(MatcherConfig::new().with_catch_all(CatchAllPolicy::Anywhere));
        matcher.register(pattern![1, .., 1], "hit").unwrap();
        assert_eq!(
            matcher.call(&[Value::from(1), Value::from(5)]).unwrap(),
            Value::from("hit")
        );
    }

    #[rstest]
    fn test_extend_is_all_or_nothing() {
        let matcher = Matcher::new();
        let result = matcher.extend([Rule::new(pattern![1], 1), Rule::new(pattern![.., 2], 2)]);
        assert!(result.is_err());
        assert_eq!(matcher.len(), 0);
    }

    #[rstest]
    fn test_recursive_matcher_does_not_leak() {
        let matcher = Matcher::recursive(|this| {
            let this = this.clone();
            MatcherBuilder::new()
                .named("countdown")
                .rule(pattern![0], "done")
                .rule(
                    pattern![TypeTag::Int],
                    Function::new("step", move |arguments| {
                        let Some(Value::Int(n)) = arguments.get(0) else {
                            return Err(Error::failed("expected an int"));
                        };
                        this.call(&[Value::from(n - 1)])
                    }),
                )
        })
        .unwrap();
        let weak = matcher.downgrade();

        assert_eq!(matcher.call(&[Value::from(3)]).unwrap(), Value::from("done"));
        assert_eq!(matcher.name(), "countdown");

        drop(matcher);
        assert!(weak.upgrade().is_none());
        assert_eq!(weak.call(&[Value::from(0)]).unwrap_err(), Error::Detached);
    }

    #[rstest]
    fn test_registration_from_inside_handler() {
        let matcher = Matcher::new();
        let handle = matcher.downgrade();
        matcher
            .register(
                pattern!["learn"],
                Function::new("learn", move |_| {
                    let matcher = handle.upgrade().ok_or(Error::Detached)?;
                    matcher
                        .register(pattern!["learned"], true)
                        .map_err(|error| Error::failed(error.to_string()))?;
                    Ok(Value::Unit)
                }),
            )
            .unwrap();

        matcher.call(&[Value::from("learn")]).unwrap();

        assert_eq!(
            matcher.call(&[Value::from("learned")]).unwrap(),
            Value::from(true)
        );
    }

    #[rstest]
    fn test_matcher_as_handler_of_another() {
        let inner = MatcherBuilder::new()
            .rule(pattern![TypeTag::Str], "inner string")
            .build()
            .unwrap();
        let outer = MatcherBuilder::new()
            .rule(pattern![TypeTag::Int], "outer int")
            .rule(pattern![..], inner)
            .build()
            .unwrap();
        assert_eq!(
            outer.call(&[Value::from("s")]).unwrap(),
            Value::from("inner string")
        );
        assert!(outer.call(&[Value::Unit]).unwrap_err().is_no_match());
    }

    #[rstest]
    fn test_calls_during_construction_are_detached() {
        let mut during = None;
        let matcher = Matcher::recursive(|this| {
            during = Some(this.call(&[Value::from(0)]));
            MatcherBuilder::new().rule(pattern![0], "zero")
        })
        .unwrap();

        assert_eq!(during, Some(Err(Error::Detached)));
        assert_eq!(matcher.call(&[Value::from(0)]).unwrap(), Value::from("zero"));
    }

    #[rstest]
    fn test_function_names_inside_recursive_builder() {
        let mut functions = Vec::new();
        let matcher = Matcher::recursive(|this| {
            functions.push(this.to_function());
            functions.push(this.to_function_named("walk"));
            MatcherBuilder::new().named("walk").rule(pattern![0], "done")
        })
        .unwrap();

        let names: Vec<_> = functions.iter().map(Function::name).collect();
        assert_eq!(names, ["matcher", "walk"]);
        assert_eq!(matcher.downgrade().to_function().name(), "walk");
        assert_eq!(
            functions[1].call_positional(&[Value::from(0)]).unwrap(),
            Value::from("done")
        );
    }
}
