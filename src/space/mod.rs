// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parameter space definition.
//!
//! A [`ParameterSpace`] is built once from an order and a set of
//! declarations and is then immutable, apart from registering filters.
//! Every enumeration creates its own [`Enumerator`] borrowing the space, so
//! several enumerations can run over one space at the same time.
//!
//! # Declarations
//!
//! - **Independent**: an ordered list of candidate values.
//! - **Dependent**: a [`Function`] of other parameters.
//! - **Constant**: a single fixed value.
//!
//! # Order
//!
//! The order ranks the independents by significance. The FIRST entry is the
//! most significant (outermost loop) and the LAST entry the least
//! significant (innermost loop):
//!
//! ```
//! use permspace::ParameterSpace;
//!
//! let space = ParameterSpace::builder(["a", "b"])
//!     .independent("a", [1, 2, 3])
//!     .independent("b", ["x", "y"])
//!     .build()
//!     .unwrap();
//! let rows: Vec<String> = space
//!     .iter()
//!     .map(|ns| ns.unwrap().to_delimited_row(["a", "b"]).unwrap())
//!     .collect();
//! assert_eq!(rows, ["1\tx", "1\ty", "2\tx", "2\ty", "3\tx", "3\ty"]);
//! ```

pub(crate) mod filter;
pub(crate) mod topology;

use crate::config::{OrderPolicy, SpaceConfig, SpaceDocument};
use crate::engine::{Bounds, Enumerator};
use crate::error::{sorted_names, BoxError, Result, SpaceError};
use crate::function::Function;
use crate::namespace::Namespace;
use crate::value::Value;
use filter::Filter;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// The role and definition of one declared parameter.
#[derive(Debug, Clone)]
pub enum Declaration {
    Independent(Vec<Value>),
    Dependent(Function),
    Constant(Value),
}

/// A dependent parameter in evaluation order.
#[derive(Debug)]
struct Dependent {
    name: String,
    function: Function,
    /// Results keyed by argument values, when memoization is enabled.
    cache: Option<Mutex<HashMap<Vec<Value>, Value>>>,
}

#[derive(Debug)]
pub struct ParameterSpace {
    config: SpaceConfig,
    independents: IndexMap<String, Vec<Value>>,
    constants: IndexMap<String, Value>,
    /// Topologically sorted.
    dependents: Vec<Dependent>,
    closures: IndexMap<String, IndexSet<String>>,
    /// Independents that vary, most significant first.
    order: Vec<String>,
    positions: HashMap<String, usize>,
    filters: Vec<Filter>,
}

impl ParameterSpace {
    pub fn builder<I, S>(order: I) -> SpaceBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SpaceBuilder::new(order)
    }

    /// Build a space from an order and named declarations.
    ///
    /// Validation happens in this sequence, failing on the first problem:
    /// declarations (duplicates, empty domains), dependent ordering
    /// (undefined arguments, cycles), and then the order itself according
    /// to the configured [`OrderPolicy`].
    pub fn new<I, S, D>(order: I, declarations: D, config: SpaceConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = (String, Declaration)>,
    {
        let order: Vec<String> = order.into_iter().map(Into::into).collect();

        let mut independents = IndexMap::new();
        let mut constants = IndexMap::new();
        let mut functions: IndexMap<String, Function> = IndexMap::new();
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for (name, declaration) in declarations {
            if !seen.insert(name.clone()) {
                duplicates.push(name);
                continue;
            }
            match declaration {
                Declaration::Independent(values) => {
                    if values.is_empty() {
                        return Err(SpaceError::EmptyDomain { name });
                    }
                    independents.insert(name, values);
                }
                Declaration::Dependent(function) => {
                    let function = function.labelled(name.as_str());
                    functions.insert(name, function);
                }
                Declaration::Constant(value) => {
                    constants.insert(name, value);
                }
            }
        }
        if !duplicates.is_empty() {
            return Err(SpaceError::DuplicateParameter {
                names: sorted_names(duplicates),
            });
        }

        let roots: IndexSet<&str> = independents
            .keys()
            .chain(constants.keys())
            .map(String::as_str)
            .collect();
        let sorted = topology::sort_dependents(&roots, &functions)?;
        let closures = topology::dependency_closures(&roots, &functions, &sorted);

        let order = Self::check_order(order, &independents, &closures, config.policy)?;
        let positions = order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let dependents = sorted
            .into_iter()
            .filter_map(|name| {
                let function = functions.swap_remove(&name)?;
                Some(Dependent {
                    name,
                    function,
                    cache: config.memoize.then(|| Mutex::new(HashMap::new())),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            independents = independents.len(),
            constants = constants.len(),
            dependents = dependents.len(),
            ?order,
            "parameter space built"
        );

        Ok(Self {
            config,
            independents,
            constants,
            dependents,
            closures,
            order,
            positions,
            filters: Vec::new(),
        })
    }

    /// Validate the order and reduce it to the independents that vary.
    fn check_order(
        order: Vec<String>,
        independents: &IndexMap<String, Vec<Value>>,
        closures: &IndexMap<String, IndexSet<String>>,
        policy: OrderPolicy,
    ) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let duplicates: Vec<&String> = order.iter().filter(|name| !seen.insert(*name)).collect();
        if !duplicates.is_empty() {
            return Err(SpaceError::DuplicateParameter {
                names: sorted_names(duplicates.into_iter().cloned()),
            });
        }

        let undefined: Vec<&String> = order.iter().filter(|name| !closures.contains_key(*name)).collect();
        if !undefined.is_empty() {
            return Err(SpaceError::UndefinedParameter {
                names: sorted_names(undefined.into_iter().cloned()),
            });
        }

        let missing: Vec<&String> = independents
            .iter()
            .filter(|(name, values)| {
                !order.contains(name) && (policy == OrderPolicy::Strict || values.len() > 1)
            })
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(SpaceError::MissingParameter {
                names: sorted_names(missing.into_iter().cloned()),
            });
        }

        if policy == OrderPolicy::Strict {
            let invalid: Vec<&String> = order
                .iter()
                .filter(|name| !independents.contains_key(*name))
                .collect();
            if !invalid.is_empty() {
                return Err(SpaceError::InvalidParameter {
                    names: sorted_names(invalid.into_iter().cloned()),
                });
            }
        }

        Ok(order
            .into_iter()
            .filter(|name| independents.contains_key(name))
            .collect())
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Varying independents, most significant first.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// All parameter names: independents, constants, then dependents in
    /// evaluation order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> + '_ {
        self.independents
            .keys()
            .chain(self.constants.keys())
            .chain(self.dependents.iter().map(|d| &d.name))
            .map(String::as_str)
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.closures.contains_key(name)
    }

    pub fn is_independent(&self, name: &str) -> bool {
        self.independents.contains_key(name)
    }

    /// Candidate values of an independent parameter.
    pub fn domain(&self, name: &str) -> Option<&[Value]> {
        self.independents.get(name).map(Vec::as_slice)
    }

    pub fn domain_size(&self, name: &str) -> Option<usize> {
        self.independents.get(name).map(Vec::len)
    }

    /// Domain sizes of the varying independents, in order.
    pub fn radixes(&self) -> Vec<usize> {
        self.order
            .iter()
            .filter_map(|name| self.domain_size(name))
            .collect()
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    /// Dependents in the order they are evaluated.
    pub fn evaluation_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.dependents.iter().map(|d| d.name.as_str())
    }

    /// The independents and constants `name` transitively depends on.
    pub fn dependency_closure(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        self.closures
            .get(name)
            .map(|closure| closure.iter().map(String::as_str))
    }

    /// Order position of a varying independent; 0 is most significant.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Number of combinations before filtering: the product of all domain
    /// sizes, saturating at `usize::MAX`.
    pub fn approximate_size(&self) -> usize {
        self.independents
            .values()
            .map(Vec::len)
            .fold(1, usize::saturating_mul)
    }

    /// Number of combinations that pass every filter.
    ///
    /// This runs a full enumeration, so it costs time proportional to the
    /// size of the space.
    pub fn len(&self) -> Result<usize> {
        let mut count = 0;
        for namespace in self.iter() {
            namespace?;
            count += 1;
        }
        Ok(count)
    }

    /// Whether no combination passes the filters. Stops at the first one.
    pub fn is_empty(&self) -> Result<bool> {
        match self.iter().next() {
            None => Ok(true),
            Some(namespace) => namespace.map(|_| false),
        }
    }

    /// Enumerate every combination that passes the filters.
    pub fn iter(&self) -> Enumerator<'_> {
        Enumerator::unbounded(self)
    }

    /// Enumerate with explicit bounds.
    pub fn enumerate_with(&self, bounds: Bounds) -> Result<Enumerator<'_>> {
        Enumerator::new(self, bounds)
    }

    /// Start at `start`, inclusive.
    pub fn iterate_from(&self, start: &Namespace) -> Result<Enumerator<'_>> {
        self.enumerate_with(Bounds::new().start(start.clone()))
    }

    /// Stop before `end`.
    pub fn iterate_until(&self, end: &Namespace) -> Result<Enumerator<'_>> {
        self.enumerate_with(Bounds::new().end(end.clone()))
    }

    /// From `start` inclusive to `end` exclusive, dropping the first `skip`
    /// accepted combinations.
    pub fn iterate_between(
        &self,
        start: &Namespace,
        end: &Namespace,
        skip: usize,
    ) -> Result<Enumerator<'_>> {
        self.enumerate_with(Bounds::new().start(start.clone()).end(end.clone()).skip(skip))
    }

    /// Only combinations where independent `key` equals `value`.
    pub fn iterate_only(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Enumerator<'_>> {
        self.enumerate_with(Bounds::new().only(key, value))
    }

    /// `name=value` pairs over the order, joined with commas.
    pub fn unique_key(&self, namespace: &Namespace) -> Result<String> {
        let pairs = self
            .order
            .iter()
            .map(|name| Ok(format!("{}={}", name, namespace.get(name)?)))
            .collect::<Result<Vec<String>>>()?;
        Ok(pairs.join(","))
    }

    /// Index of `value` in the domain of independent `name`.
    pub(crate) fn value_index(&self, name: &str, value: &Value) -> Result<usize> {
        let domain = self.independents.get(name).ok_or_else(|| SpaceError::InvalidValue {
            parameter: name.to_string(),
            reason: String::from("no such independent parameter"),
        })?;
        domain
            .iter()
            .position(|candidate| candidate == value)
            .ok_or_else(|| SpaceError::InvalidValue {
                parameter: name.to_string(),
                reason: format!("{} is not a valid value", value.repr()),
            })
    }

    /// Expand a counter state into a full namespace.
    pub(crate) fn namespace_at(&self, digits: &[usize]) -> Result<Namespace> {
        let mut namespace = Namespace::with_capacity(self.closures.len());
        for (name, &digit) in self.order.iter().zip(digits) {
            if let Some(value) = self.independents.get(name).and_then(|values| values.get(digit)) {
                namespace.set(name.as_str(), value.clone());
            }
        }
        for (name, values) in &self.independents {
            if !namespace.contains(name) {
                if let Some(value) = values.first() {
                    namespace.set(name.as_str(), value.clone());
                }
            }
        }
        for (name, value) in &self.constants {
            namespace.set(name.as_str(), value.clone());
        }
        for dependent in &self.dependents {
            let value = dependent.evaluate(&namespace)?;
            namespace.set(dependent.name.as_str(), value);
        }
        Ok(namespace)
    }
}

impl Dependent {
    fn evaluate(&self, namespace: &Namespace) -> Result<Value> {
        let Some(cache) = &self.cache else {
            return self.function.invoke(namespace);
        };
        let key = self.function.argument_values(namespace)?;
        if let Some(value) = cache.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(value.clone());
        }
        // The lock is not held while user code runs.
        let value = self.function.invoke(namespace)?;
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value.clone());
        Ok(value)
    }
}

impl<'a> IntoIterator for &'a ParameterSpace {
    type Item = Result<Namespace>;
    type IntoIter = Enumerator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for [`ParameterSpace`].
///
/// Declarations are collected in call order; filters are registered after
/// the space is built, in call order.
#[derive(Debug, Clone)]
pub struct SpaceBuilder {
    order: Vec<String>,
    declarations: Vec<(String, Declaration)>,
    filters: Vec<Function>,
    config: SpaceConfig,
}

impl SpaceBuilder {
    pub fn new<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into_iter().map(Into::into).collect(),
            declarations: Vec::new(),
            filters: Vec::new(),
            config: SpaceConfig::default(),
        }
    }

    pub fn from_document(document: SpaceDocument) -> Self {
        let mut builder = Self::new(document.order).config(document.config);
        for (name, values) in document.independents {
            builder = builder.declare(name, Declaration::Independent(values));
        }
        for (name, value) in document.constants {
            builder = builder.declare(name, Declaration::Constant(value));
        }
        builder
    }

    pub fn declare(mut self, name: impl Into<String>, declaration: Declaration) -> Self {
        self.declarations.push((name.into(), declaration));
        self
    }

    pub fn independent<I, V>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.declare(name, Declaration::Independent(values))
    }

    pub fn constant(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declare(name, Declaration::Constant(value.into()))
    }

    pub fn dependent<I, S, F, V>(self, name: impl Into<String>, arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.declare(name, Declaration::Dependent(Function::new(arguments, f)))
    }

    pub fn try_dependent<I, S, F, V, E>(self, name: impl Into<String>, arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> std::result::Result<V, E> + Send + Sync + 'static,
        V: Into<Value>,
        E: Into<BoxError>,
    {
        self.declare(name, Declaration::Dependent(Function::fallible(arguments, f)))
    }

    pub fn filter<I, S, F>(mut self, arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Function::predicate(arguments, f));
        self
    }

    pub fn try_filter<I, S, F, E>(mut self, arguments: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Namespace) -> std::result::Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.filters.push(Function::fallible_predicate(arguments, f));
        self
    }

    pub fn filter_if(mut self, antecedent: Function, consequent: Function) -> Self {
        self.filters.push(Function::implication(antecedent, consequent));
        self
    }

    pub fn policy(mut self, policy: OrderPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn memoize(mut self, memoize: bool) -> Self {
        self.config.memoize = memoize;
        self
    }

    pub fn config(mut self, config: SpaceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ParameterSpace> {
        let mut space = ParameterSpace::new(self.order, self.declarations, self.config)?;
        for function in self.filters {
            space.add_filter(function)?;
        }
        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> SpaceBuilder {
        ParameterSpace::builder(["a", "b"])
            .independent("a", [1, 2, 3])
            .independent("b", ["x", "y"])
    }

    #[test]
    fn test_accessors() {
        let space = abc()
            .constant("k", "fixed")
            .dependent("c", ["a"], |args| args["a"].as_i64().unwrap_or(0) * 10)
            .build()
            .unwrap();
        assert_eq!(space.order(), &["a".to_string(), "b".to_string()]);
        assert_eq!(space.parameters().collect::<Vec<_>>(), vec!["a", "b", "k", "c"]);
        assert_eq!(space.domain_size("a"), Some(3));
        assert_eq!(space.radixes(), vec![3, 2]);
        assert_eq!(space.constant("k"), Some(&Value::from("fixed")));
        assert_eq!(space.approximate_size(), 6);
        assert_eq!(space.position("b"), Some(1));
        assert_eq!(space.position("k"), None);
        assert_eq!(space.dependency_closure("c").unwrap().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_namespace_at_fills_every_role() {
        let space = abc()
            .constant("k", 7)
            .dependent("c", ["a", "k"], |args| {
                args["a"].as_i64().unwrap_or(0) + args["k"].as_i64().unwrap_or(0)
            })
            .build()
            .unwrap();
        let ns = space.namespace_at(&[2, 0]).unwrap();
        assert_eq!(
            ns,
            Namespace::from_iter([
                ("a", Value::from(3)),
                ("b", Value::from("x")),
                ("k", Value::from(7)),
                ("c", Value::from(10)),
            ])
        );
        assert_eq!(ns.keys().collect::<Vec<_>>(), vec!["a", "b", "k", "c"]);
    }

    #[test]
    fn test_value_index() {
        let space = abc().build().unwrap();
        assert_eq!(space.value_index("b", &Value::from("y")).unwrap(), 1);
        assert!(matches!(
            space.value_index("b", &Value::from("z")),
            Err(SpaceError::InvalidValue { .. })
        ));
        assert!(matches!(
            space.value_index("q", &Value::from(1)),
            Err(SpaceError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unique_key() {
        let space = abc().build().unwrap();
        let first = space.iter().next().unwrap().unwrap();
        assert_eq!(space.unique_key(&first).unwrap(), "a=1,b=x");
    }

    #[test]
    fn test_approximate_size_saturates() {
        let names: Vec<String> = (0..20).map(|i| format!("p{}", i)).collect();
        let mut builder = ParameterSpace::builder(names.clone());
        for name in &names {
            builder = builder.independent(name.as_str(), 0..100);
        }
        let space = builder.build().unwrap();
        assert_eq!(space.approximate_size(), usize::MAX);
        let first = space.iter().next().unwrap().unwrap();
        assert_eq!(first["p19"], Value::from(0));
    }

    #[test]
    fn test_empty_order_yields_one_combination() {
        let space = ParameterSpace::builder(Vec::<String>::new())
            .constant("k", 1)
            .build()
            .unwrap();
        assert_eq!(space.len().unwrap(), 1);
        assert_eq!(space.approximate_size(), 1);
    }
}
