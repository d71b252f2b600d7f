// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration engine.
//!
//! The [`Enumerator`] walks a [`MixedRadix`] counter over the order of a
//! [`ParameterSpace`], expands each counter state into a [`Namespace`], and
//! runs the filters. Production is lazy: nothing is computed until the next
//! value is requested.
//!
//! # Filter jumps
//!
//! When filters reject a namespace, the engine does not simply step to the
//! next state. Each filter knows the deepest order position it depends on;
//! the engine takes the smallest of these over the rejecting filters,
//! zeroes every digit after it and increments there. All states skipped this
//! way share the rejecting filter's inputs and would be rejected too.
//!
//! # Example
//!
//! ```
//! use permspace::engine::Counters;
//! use permspace::ParameterSpace;
//!
//! let space = ParameterSpace::builder(["a", "b"])
//!     .independent("a", [1, 2, 3])
//!     .independent("b", ["x", "y"])
//!     .filter(["a"], |args| args["a"].as_i64() < Some(3))
//!     .build()
//!     .unwrap();
//!
//! let mut enumerator = space.iter();
//! let accepted = enumerator.by_ref().count();
//! assert_eq!(accepted, 4);
//! // The a=3 block costs a single rejection.
//! assert_eq!(enumerator.statistics().get(Counters::Rejected), 1);
//! ```

pub mod bounds;
pub mod radix;
pub mod statistics;

pub use bounds::Bounds;
pub use radix::MixedRadix;
pub use statistics::{Counters, Statistics};

use crate::error::Result;
use crate::namespace::Namespace;
use crate::space::filter::Conflict;
use crate::space::ParameterSpace;
use bounds::ResolvedBounds;
use tracing::{debug, trace};

/// Lazy iterator over the accepted combinations of a space.
///
/// Yields `Err` if a dependent or filter fails, and nothing after that.
#[derive(Debug)]
pub struct Enumerator<'a> {
    space: &'a ParameterSpace,
    counter: MixedRadix,
    /// Exclusive end state, if bounded.
    end: Option<Vec<usize>>,
    /// Accepted combinations still to drop.
    skip: usize,
    statistics: Statistics,
    finished: bool,
}

impl<'a> Enumerator<'a> {
    /// Enumerator over `space` restricted by `bounds`.
    ///
    /// Fails with `InvalidValue` if a bound names something other than an
    /// independent parameter, or a value outside its domain.
    pub fn new(space: &'a ParameterSpace, bounds: Bounds) -> Result<Self> {
        let resolved = bounds.resolve(space)?;
        Ok(Self::from_resolved(space, resolved))
    }

    pub(crate) fn unbounded(space: &'a ParameterSpace) -> Self {
        Self::from_resolved(space, ResolvedBounds::unbounded(space))
    }

    fn from_resolved(space: &'a ParameterSpace, bounds: ResolvedBounds) -> Self {
        let mut counter = match bounds.start {
            Some(start) => MixedRadix::with_start(space.radixes(), start),
            None => {
                let mut counter = MixedRadix::new(space.radixes());
                counter.exhaust();
                counter
            }
        };
        for (position, digit) in bounds.pins {
            counter.pin(position, digit);
        }
        Self {
            space,
            counter,
            end: bounds.end,
            skip: bounds.skip,
            statistics: Statistics::new(),
            finished: false,
        }
    }

    pub fn space(&self) -> &'a ParameterSpace {
        self.space
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Produce the next namespace that passes every filter, ignoring the
    /// skip count. `Ok(None)` means the space is exhausted.
    fn produce_next(&mut self) -> Result<Option<Namespace>> {
        let mut position = self.counter.len().saturating_sub(1);
        loop {
            let Some(digits) = self.counter.advance_from(position) else {
                return Ok(None);
            };
            if let Some(end) = &self.end {
                if digits >= end.as_slice() {
                    self.counter.exhaust();
                    return Ok(None);
                }
            }
            let namespace = self.space.namespace_at(digits)?;
            self.statistics.increment_counter(Counters::Candidates);

            match self.space.conflict(&namespace)? {
                None => return Ok(Some(namespace)),
                Some(Conflict::At(jump)) => {
                    self.statistics.increment_counter(Counters::Rejected);
                    trace!(digits = ?self.counter.digits(), jump, "filter rejected");
                    position = jump;
                }
                Some(Conflict::Everywhere) => {
                    self.statistics.increment_counter(Counters::Rejected);
                    trace!(digits = ?self.counter.digits(), "filter over fixed values rejected");
                    self.counter.exhaust();
                    return Ok(None);
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        debug!(statistics = %self.statistics, "enumeration finished");
    }
}

impl Iterator for Enumerator<'_> {
    type Item = Result<Namespace>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.produce_next() {
                Ok(Some(namespace)) => {
                    if self.skip > 0 {
                        self.skip -= 1;
                        self.statistics.increment_counter(Counters::Skipped);
                        continue;
                    }
                    self.statistics.increment_counter(Counters::Accepted);
                    return Some(Ok(namespace));
                }
                Ok(None) => {
                    self.finish();
                    return None;
                }
                Err(err) => {
                    self.finish();
                    return Some(Err(err));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Enumerator<'_> {}
