// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Function adapter for dependent parameters and filters.
//!
//! A [`Function`] pairs a callable with the names of the parameters it reads.
//! When invoked against a larger [`Namespace`] it hands the callable a
//! namespace holding only those names, so the callable cannot observe
//! anything it did not declare.
//!
//! # Examples
//!
//! ```
//! use permspace::{Function, Namespace, Value};
//!
//! let double = Function::new(["a"], |args| args["a"].as_i64().unwrap_or(0) * 2);
//! let point = Namespace::from_iter([("a", 4), ("b", 9)]);
//! assert_eq!(double.invoke(&point).unwrap(), Value::from(8));
//!
//! let small = Function::predicate(["a"], |args| args["a"].as_i64() < Some(3));
//! assert!(!small.test(&point).unwrap());
//! ```

use crate::error::{BoxError, Result, SpaceError};
use crate::namespace::Namespace;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

type Callable = Arc<dyn Fn(&Namespace) -> std::result::Result<Value, BoxError> + Send + Sync>;

/// Error from a function nested in an implication. It already names the
/// inner function, so it is unwrapped rather than relabelled.
#[derive(Debug, Error)]
#[error(transparent)]
struct Nested(SpaceError);

/// A callable together with its declared argument names.
#[derive(Clone)]
pub struct Function {
    label: String,
    arguments: Vec<String>,
    callable: Callable,
}

impl Function {
    fn from_callable<I, S>(arguments: I, callable: Callable) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in arguments {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            label: String::from("function"),
            arguments: names,
            callable,
        }
    }

    /// Wrap an infallible computation.
    pub fn new<I, S, F, V>(arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::from_callable(arguments, Arc::new(move |args| Ok(f(args).into())))
    }

    /// Wrap a computation that may fail; its error propagates to the caller
    /// of the enumeration as [`SpaceError::Evaluation`].
    pub fn fallible<I, S, F, V, E>(arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> std::result::Result<V, E> + Send + Sync + 'static,
        V: Into<Value>,
        E: Into<BoxError>,
    {
        Self::from_callable(
            arguments,
            Arc::new(move |args| f(args).map(Into::into).map_err(Into::into)),
        )
    }

    /// Wrap a boolean predicate, for use as a filter.
    pub fn predicate<I, S, F>(arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> bool + Send + Sync + 'static,
    {
        Self::new(arguments, f)
    }

    pub fn fallible_predicate<I, S, F, E>(arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::fallible(arguments, f)
    }

    /// The implication `antecedent => consequent`, over the union of both
    /// argument lists. Each side still only sees its own arguments.
    pub fn implication(antecedent: Function, consequent: Function) -> Self {
        let arguments: Vec<String> = antecedent
            .arguments
            .iter()
            .chain(consequent.arguments.iter())
            .cloned()
            .collect();
        let callable: Callable = Arc::new(move |args| {
            if !antecedent.invoke(args).map_err(Nested)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(consequent.invoke(args).map_err(Nested)?.is_truthy()))
        });
        Self::from_callable(arguments, callable)
    }

    pub(crate) fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Name used in errors and logs: the dependent's name or `filter[i]`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Call the wrapped function with the declared arguments drawn from
    /// `namespace`. Extra keys are ignored.
    pub fn invoke(&self, namespace: &Namespace) -> Result<Value> {
        let args = self.select(namespace)?;
        (self.callable)(&args).map_err(|source| match source.downcast::<Nested>() {
            Ok(nested) => nested.0,
            Err(source) => SpaceError::Evaluation {
                function: self.label.clone(),
                source,
            },
        })
    }

    /// Invoke and take the truthiness of the result.
    pub fn test(&self, namespace: &Namespace) -> Result<bool> {
        Ok(self.invoke(namespace)?.is_truthy())
    }

    /// Argument values in declared order.
    pub(crate) fn argument_values(&self, namespace: &Namespace) -> Result<Vec<Value>> {
        self.arguments
            .iter()
            .map(|name| self.lookup(namespace, name).cloned())
            .collect()
    }

    fn select(&self, namespace: &Namespace) -> Result<Namespace> {
        let mut args = Namespace::with_capacity(self.arguments.len());
        for name in &self.arguments {
            args.set(name.as_str(), self.lookup(namespace, name)?.clone());
        }
        Ok(args)
    }

    fn lookup<'a>(&self, namespace: &'a Namespace, name: &str) -> Result<&'a Value> {
        namespace.get(name).map_err(|_| SpaceError::MissingArgument {
            function: self.label.clone(),
            argument: name.to_string(),
        })
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("label", &self.label)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
