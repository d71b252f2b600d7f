// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Each enumerator keeps its own counters, readable while it runs and after
//! it finishes.

use std::fmt;
use strum::EnumCount;
use strum_macros::{EnumCount as EnumCountMacro, IntoStaticStr};

#[derive(Debug, EnumCountMacro, IntoStaticStr, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    /// Namespaces built from a counter state.
    Candidates,
    /// Namespaces that passed every filter.
    Accepted,
    /// Filter rejections; each one is followed by a single jump.
    Rejected,
    /// Accepted namespaces dropped by the skip count.
    Skipped,
}

const COUNT: usize = Counters::COUNT;

const ALL: [Counters; COUNT] = [
    Counters::Candidates,
    Counters::Accepted,
    Counters::Rejected,
    Counters::Skipped,
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment_counter(&mut self, counter: Counters) {
        self.stats[counter as usize] += 1;
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, counter) in ALL.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let name: &'static str = (*counter).into();
            write!(f, "{}={}", name, self.get(*counter))?;
        }
        Ok(())
    }
}
