// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration bounds: start, end, skip count and pinned parameters.
//!
//! Start and end are partial assignments of independent parameters;
//! unnamed parameters default to their first value. The start is inclusive
//! and the end exclusive, both compared in enumeration order.
//!
//! ```
//! use permspace::{Bounds, Namespace, ParameterSpace, Value};
//!
//! let space = ParameterSpace::builder(["a", "b"])
//!     .independent("a", [1, 2, 3])
//!     .independent("b", ["x", "y"])
//!     .build()
//!     .unwrap();
//! let bounds = Bounds::new()
//!     .start(Namespace::from_iter([("a", 2)]))
//!     .end(Namespace::from_iter([("a", Value::from(3)), ("b", Value::from("y"))]))
//!     .skip(1);
//! let found: Vec<String> = space
//!     .enumerate_with(bounds)
//!     .unwrap()
//!     .map(|ns| space.unique_key(&ns.unwrap()).unwrap())
//!     .collect();
//! assert_eq!(found, ["a=2,b=y", "a=3,b=x"]);
//! ```

use crate::error::{Result, SpaceError};
use crate::namespace::Namespace;
use crate::space::ParameterSpace;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    start: Option<Namespace>,
    end: Option<Namespace>,
    skip: usize,
    only: Vec<(String, Value)>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// First combination to consider, inclusive.
    pub fn start(mut self, start: Namespace) -> Self {
        self.start = Some(start);
        self
    }

    /// Combination to stop before.
    pub fn end(mut self, end: Namespace) -> Self {
        self.end = Some(end);
        self
    }

    /// Drop this many accepted combinations before yielding.
    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    /// Hold independent `key` at `value`; the rest of the space still varies.
    pub fn only(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.only.push((key.into(), value.into()));
        self
    }

    pub(crate) fn resolve(&self, space: &ParameterSpace) -> Result<ResolvedBounds> {
        let start = match &self.start {
            Some(start) => digits_of(space, start)?,
            None => vec![0; space.order().len()],
        };
        let end = self
            .end
            .as_ref()
            .map(|end| digits_of(space, end))
            .transpose()?;
        let mut pins: Vec<(usize, usize)> = Vec::with_capacity(self.only.len());
        for (key, value) in &self.only {
            let index = space.value_index(key, value)?;
            if let Some(position) = space.position(key) {
                match pins.iter().find(|(p, _)| *p == position) {
                    Some(&(_, other)) if other != index => {
                        return Err(SpaceError::InvalidValue {
                            parameter: key.clone(),
                            reason: format!("{} conflicts with another pinned value", value.repr()),
                        });
                    }
                    Some(_) => {}
                    None => pins.push((position, index)),
                }
            }
        }
        let start = align_start(start, &space.radixes(), &pins);
        Ok(ResolvedBounds {
            start,
            end,
            pins,
            skip: self.skip,
        })
    }
}

/// Bounds translated to counter digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedBounds {
    /// `None` when no state at or after the start matches the pins.
    pub(crate) start: Option<Vec<usize>>,
    pub(crate) end: Option<Vec<usize>>,
    /// `(position, digit)` pairs.
    pub(crate) pins: Vec<(usize, usize)>,
    pub(crate) skip: usize,
}

impl ResolvedBounds {
    pub(crate) fn unbounded(space: &ParameterSpace) -> Self {
        Self {
            start: Some(vec![0; space.order().len()]),
            end: None,
            pins: Vec::new(),
            skip: 0,
        }
    }
}

/// The first state at or after `start` that holds every pinned digit.
fn align_start(
    mut start: Vec<usize>,
    radixes: &[usize],
    pins: &[(usize, usize)],
) -> Option<Vec<usize>> {
    let pinned = |i: usize| pins.iter().find(|(p, _)| *p == i).map(|&(_, d)| d);
    for i in 0..start.len() {
        let Some(digit) = pinned(i) else {
            continue;
        };
        if start[i] == digit {
            continue;
        }
        // Below the pin: the rest restarts from zero. Above it: carry into
        // the nearest free digit before `i`.
        let reset_from = if start[i] < digit {
            i
        } else {
            let carry = (0..i)
                .rev()
                .find(|&j| pinned(j).is_none() && start[j] + 1 < radixes[j])?;
            start[carry] += 1;
            carry
        };
        for (j, slot) in start.iter_mut().enumerate().skip(reset_from + 1) {
            *slot = pinned(j).unwrap_or(0);
        }
        start[reset_from] = pinned(reset_from).unwrap_or(start[reset_from]);
        return Some(start);
    }
    Some(start)
}

/// Counter digits for a partial assignment. Every key must be an
/// independent parameter and every value in its domain. Fixed independents
/// (left out of the order) can only name their single value, and take no
/// digit.
fn digits_of(space: &ParameterSpace, assignment: &Namespace) -> Result<Vec<usize>> {
    let mut digits = vec![0; space.order().len()];
    for (name, value) in assignment.items() {
        let index = space.value_index(name, value)?;
        if let Some(position) = space.position(name) {
            digits[position] = index;
        }
    }
    Ok(digits)
}
