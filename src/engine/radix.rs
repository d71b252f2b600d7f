// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mixed-radix counter over the independent parameters.
//!
//! Digit `i` counts through the domain of the `i`-th parameter in the order.
//! Digit 0 is the most significant and the last digit the least significant,
//! so the last parameter varies fastest.
//!
//! # Example
//!
//! ```
//! use permspace::engine::MixedRadix;
//!
//! let mut counter = MixedRadix::new(vec![2, 3]);
//! assert_eq!(counter.advance(), Some(&[0, 0][..]));
//! assert_eq!(counter.advance(), Some(&[0, 1][..]));
//! // Jump: clear everything after digit 0 and increment digit 0.
//! assert_eq!(counter.advance_from(0), Some(&[1, 0][..]));
//! assert_eq!(counter.advance_from(0), None);
//! ```

/// Multi-digit counter with a capacity per digit.
///
/// The counter starts one step before its initial state: the first call to
/// [`MixedRadix::advance`] or [`MixedRadix::advance_from`] returns the
/// initial digits unchanged.
#[derive(Debug, Clone)]
pub struct MixedRadix {
    radixes: Vec<usize>,
    digits: Vec<usize>,
    /// Pinned digits are never reset or incremented.
    pinned: Vec<bool>,
    primed: bool,
    exhausted: bool,
}

impl MixedRadix {
    /// Counter starting at all zeros.
    ///
    /// # Panics
    ///
    /// Panics if any radix is zero.
    pub fn new(radixes: Vec<usize>) -> Self {
        let start = vec![0; radixes.len()];
        Self::with_start(radixes, start)
    }

    /// Counter whose first state is `start`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ, or a digit is not below its radix.
    pub fn with_start(radixes: Vec<usize>, start: Vec<usize>) -> Self {
        assert_eq!(radixes.len(), start.len(), "one start digit per radix");
        assert!(
            start.iter().zip(&radixes).all(|(digit, radix)| digit < radix),
            "start digits {:?} out of range for radixes {:?}",
            start,
            radixes
        );
        let pinned = vec![false; radixes.len()];
        Self {
            radixes,
            digits: start,
            pinned,
            primed: true,
            exhausted: false,
        }
    }

    /// Fix digit `position` at `digit` for the rest of the count.
    ///
    /// # Panics
    ///
    /// Panics if `position` or `digit` is out of range.
    pub fn pin(&mut self, position: usize, digit: usize) {
        assert!(digit < self.radixes[position], "pinned digit out of range");
        self.digits[position] = digit;
        self.pinned[position] = true;
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    pub fn radixes(&self) -> &[usize] {
        &self.radixes
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Stop counting; every later advance returns `None`.
    pub fn exhaust(&mut self) {
        self.exhausted = true;
    }

    /// Increment the least significant digit.
    pub fn advance(&mut self) -> Option<&[usize]> {
        let last = self.digits.len().saturating_sub(1);
        self.advance_from(last)
    }

    /// Zero every digit after `position`, then add one at `position`,
    /// carrying toward digit 0. Returns `None` once digit 0 overflows.
    pub fn advance_from(&mut self, position: usize) -> Option<&[usize]> {
        if self.exhausted {
            return None;
        }
        if self.primed {
            self.primed = false;
            return Some(&self.digits);
        }
        if self.digits.is_empty() {
            self.exhausted = true;
            return None;
        }
        let position = position.min(self.digits.len() - 1);
        for i in position + 1..self.digits.len() {
            if !self.pinned[i] {
                self.digits[i] = 0;
            }
        }
        for i in (0..=position).rev() {
            if self.pinned[i] {
                continue;
            }
            if self.digits[i] + 1 < self.radixes[i] {
                self.digits[i] += 1;
                return Some(&self.digits);
            }
            self.digits[i] = 0;
        }
        self.exhausted = true;
        None
    }
}
