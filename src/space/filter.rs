// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Filters and the conflict position used to skip rejected blocks.
//!
//! A filter only reads the independents in the closure of its arguments.
//! Let `p` be the largest order position among them. Every combination that
//! agrees with a rejected one on positions `0..=p` gives the filter the same
//! inputs, so it is rejected too. The enumerator can therefore reset all
//! positions after `p` and increment at `p` directly. When several filters
//! reject, the smallest such `p` skips the largest block that is still safe.

use super::ParameterSpace;
use crate::error::{sorted_names, Result, SpaceError};
use crate::function::Function;
use crate::namespace::Namespace;
use tracing::debug;

/// A registered filter.
#[derive(Debug)]
pub(crate) struct Filter {
    pub(crate) function: Function,
    /// Largest order position in the filter's closure, or `None` when the
    /// filter reads nothing that varies.
    pub(crate) position: Option<usize>,
}

/// Where enumeration has to resume after a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conflict {
    /// Increment from this order position.
    At(usize),
    /// A filter over fixed values rejected; nothing further can pass.
    Everywhere,
}

impl ParameterSpace {
    /// Register a filter. Only combinations for which it returns a truthy
    /// value are enumerated.
    ///
    /// Fails with `UndefinedParameter` if the filter reads an undeclared name.
    pub fn add_filter(&mut self, function: Function) -> Result<()> {
        let undefined: Vec<&String> = function
            .arguments()
            .iter()
            .filter(|arg| !self.is_parameter(arg))
            .collect();
        if !undefined.is_empty() {
            return Err(SpaceError::UndefinedParameter {
                names: sorted_names(undefined.into_iter().cloned()),
            });
        }

        let position = function
            .arguments()
            .iter()
            .filter_map(|arg| self.closures.get(arg))
            .flatten()
            .filter_map(|name| self.positions.get(name).copied())
            .max();

        let label = format!("filter[{}]", self.filters.len());
        debug!(filter = %label, arguments = ?function.arguments(), ?position, "filter registered");
        self.filters.push(Filter {
            function: function.labelled(label),
            position,
        });
        Ok(())
    }

    /// Chaining form of [`ParameterSpace::add_filter`].
    pub fn filter(mut self, function: Function) -> Result<Self> {
        self.add_filter(function)?;
        Ok(self)
    }

    /// Keep only combinations where `antecedent` implies `consequent`.
    pub fn filter_if(self, antecedent: Function, consequent: Function) -> Result<Self> {
        self.filter(Function::implication(antecedent, consequent))
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Run every filter against `namespace`.
    ///
    /// Returns `None` if all accept, otherwise the smallest conflict
    /// position over the rejecting filters. Every filter runs, so an error
    /// from any of them is reported even after another has rejected.
    pub(crate) fn conflict(&self, namespace: &Namespace) -> Result<Option<Conflict>> {
        let mut conflict = None;
        for filter in &self.filters {
            if filter.function.test(namespace)? {
                continue;
            }
            conflict = Some(match (conflict, filter.position) {
                (Some(Conflict::Everywhere), _) | (_, None) => Conflict::Everywhere,
                (Some(Conflict::At(q)), Some(p)) if q < p => Conflict::At(q),
                (_, Some(p)) => Conflict::At(p),
            });
        }
        Ok(conflict)
    }
}
