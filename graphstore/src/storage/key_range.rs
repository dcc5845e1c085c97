// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Key ranges describing partition ownership
//!
//! A `KeyRange` is a value object: stores and the manager hand them out as
//! answers to topology queries, never as the source of truth for ownership.
//!
//! Both conventions treat `start` as inclusive and `end` as exclusive. They
//! differ in how a degenerate pair is read:
//!
//! - [`RangeConvention::Ordered`] is used by the local ordered drivers. An
//!   empty `end` means "unbounded above", so `([], [])` is the whole key-space
//!   while any other `start == end` is empty.
//! - [`RangeConvention::Ring`] is used by token-ring topologies. `start > end`
//!   wraps around the ring and `start == end` is the full ring.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// How the boundaries of a `KeyRange` are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RangeConvention {
    Ordered,
    Ring,
}

/// A contiguous interval of the key-space
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyRange {
    start: Vec<u8>,
    end: Vec<u8>,
    convention: RangeConvention,
}

impl KeyRange {
    /// `[start, end)` over an ordered key-space; empty `end` is unbounded
    pub fn ordered(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            convention: RangeConvention::Ordered,
        }
    }

    /// `[start, end)` on a token ring, wrapping when `start >= end`
    pub fn ring(start: impl Into<Vec<u8>>, end: impl Into<Vec<u8>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            convention: RangeConvention::Ring,
        }
    }

    /// The single range a local deployment owns
    pub fn whole_keyspace() -> Self {
        Self::ordered(Vec::new(), Vec::new())
    }

    pub fn start(&self) -> &[u8] {
        &self.start
    }

    pub fn end(&self) -> &[u8] {
        &self.end
    }

    pub fn convention(&self) -> RangeConvention {
        self.convention
    }

    /// Whether the range covers every possible key
    pub fn is_full(&self) -> bool {
        match self.convention {
            RangeConvention::Ordered => self.start.is_empty() && self.end.is_empty(),
            RangeConvention::Ring => self.start == self.end,
        }
    }

    /// Whether the range contains no key at all
    pub fn is_empty_range(&self) -> bool {
        match self.convention {
            RangeConvention::Ordered => !self.end.is_empty() && self.end <= self.start,
            RangeConvention::Ring => false,
        }
    }

    /// Whether the range wraps past the end of the ring
    pub fn wraps(&self) -> bool {
        self.convention == RangeConvention::Ring && self.start > self.end
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        match self.convention {
            RangeConvention::Ordered => {
                key >= self.start.as_slice() && (self.end.is_empty() || key < self.end.as_slice())
            }
            RangeConvention::Ring => match self.start.cmp(&self.end) {
                Ordering::Less => key >= self.start.as_slice() && key < self.end.as_slice(),
                Ordering::Equal => true,
                Ordering::Greater => {
                    key >= self.start.as_slice() || key < self.end.as_slice()
                }
            },
        }
    }
}

impl PartialOrd for KeyRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
            .then_with(|| self.convention.cmp(&other.convention))
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for b in &self.start {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ", ")?;
        for b in &self.end {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}
