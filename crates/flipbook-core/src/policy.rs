//! Which pages must stay materialized for a given position in the book.

use crate::types::*;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS: usize = 10;
pub const DEFAULT_CONSTRAINED_RADIUS: usize = 6;

/// Ascending set of 0-based page indices
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidentSet {
    indices: BTreeSet<usize>,
}

impl ResidentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_range(range: RangeInclusive<usize>) -> Self {
        range.collect()
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn extend_from(&mut self, other: &ResidentSet) {
        self.indices.extend(other.iter());
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl FromIterator<usize> for ResidentSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

/// Windowing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowStrategy {
    /// Generous neighborhood around the current page, for single-page modes
    FixedRadius {
        radius: usize,
        constrained_radius: usize,
    },
    /// Only the pages of the visible spread
    SpreadPair {
        /// Never evict the cover
        keep_cover: bool,
        /// Allow a deferred load of the spreads on either side
        preload_adjacent: bool,
    },
}

impl Default for WindowStrategy {
    fn default() -> Self {
        WindowStrategy::FixedRadius {
            radius: DEFAULT_RADIUS,
            constrained_radius: DEFAULT_CONSTRAINED_RADIUS,
        }
    }
}

/// Pure resident-set computation; holds nothing beyond its strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPolicy {
    strategy: WindowStrategy,
}

impl WindowPolicy {
    pub fn new(strategy: WindowStrategy) -> Self {
        Self { strategy }
    }

    pub fn fixed_radius(radius: usize, constrained_radius: usize) -> Self {
        Self::new(WindowStrategy::FixedRadius {
            radius,
            constrained_radius,
        })
    }

    pub fn spread_pair() -> Self {
        Self::new(WindowStrategy::SpreadPair {
            keep_cover: false,
            preload_adjacent: false,
        })
    }

    pub fn strategy(&self) -> WindowStrategy {
        self.strategy
    }

    /// Indices that must be loaded while `current_page` (1-based) is shown.
    /// Every returned index lies in `0..total_pages`.
    pub fn resident_set(
        &self,
        current_page: usize,
        total_pages: usize,
        device: DeviceClass,
    ) -> ResidentSet {
        if total_pages == 0 {
            return ResidentSet::new();
        }

        match self.strategy {
            WindowStrategy::FixedRadius {
                radius,
                constrained_radius,
            } => {
                let radius = match device {
                    DeviceClass::Constrained => constrained_radius,
                    DeviceClass::Standard => radius,
                };
                // Reaches one page further forward than backward
                let index = page_index(current_page);
                bounded(index - as_signed(radius), index + as_signed(radius) + 1, total_pages)
            }
            WindowStrategy::SpreadPair { keep_cover, .. } => {
                let (first, last) = visible_spread(current_page);
                let mut resident = bounded(first, last, total_pages);
                if keep_cover {
                    resident.insert(0);
                }
                resident
            }
        }
    }

    /// Indices on screen for `current_page`: the page itself, or its spread
    pub fn visible_pages(&self, current_page: usize, total_pages: usize) -> ResidentSet {
        match self.strategy {
            WindowStrategy::FixedRadius { .. } => {
                let index = page_index(current_page);
                bounded(index, index, total_pages)
            }
            WindowStrategy::SpreadPair { .. } => {
                let (first, last) = visible_spread(current_page);
                bounded(first, last, total_pages)
            }
        }
    }

    /// Page a forward flip lands on
    pub fn next_page(&self, current_page: usize) -> usize {
        match self.strategy {
            WindowStrategy::FixedRadius { .. } => current_page.saturating_add(1),
            WindowStrategy::SpreadPair { .. } if current_page <= 1 => 2,
            WindowStrategy::SpreadPair { .. } => current_page.saturating_add(2),
        }
    }

    /// Page a backward flip lands on, never below 1
    pub fn previous_page(&self, current_page: usize) -> usize {
        let step = match self.strategy {
            WindowStrategy::FixedRadius { .. } => 1,
            WindowStrategy::SpreadPair { .. } => 2,
        };
        current_page.saturating_sub(step).max(1)
    }

    /// Pages worth loading after the fact, once the visible spread is shown.
    /// Empty unless the spread strategy has adjacent preloading enabled.
    pub fn preload_set(&self, current_page: usize, total_pages: usize) -> ResidentSet {
        match self.strategy {
            WindowStrategy::SpreadPair {
                preload_adjacent: true,
                ..
            } if total_pages > 0 => {
                let (first, last) = visible_spread(current_page);
                let mut preload = bounded(first - 2, first - 1, total_pages);
                preload.extend_from(&bounded(last + 1, last + 2, total_pages));
                preload
            }
            _ => ResidentSet::new(),
        }
    }
}

fn as_signed(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX / 4)
}

fn page_index(current_page: usize) -> isize {
    as_signed(current_page) - 1
}

/// First and last index of the spread showing `current_page`.
/// The cover (page 1) is shown alone; page `p` otherwise faces page `p + 1`.
fn visible_spread(current_page: usize) -> (isize, isize) {
    let index = page_index(current_page);
    if current_page <= 1 {
        (index, index)
    } else {
        (index, index + 1)
    }
}

/// Indices of `first..=last` that exist; out-of-range indices are dropped
fn bounded(first: isize, last: isize, total_pages: usize) -> ResidentSet {
    let first = first.max(0);
    let last = last.min(as_signed(total_pages) - 1);
    if first > last {
        return ResidentSet::new();
    }
    ResidentSet::from_range(first as usize..=last as usize)
}
