use serde::Serialize;
use std::ops::Range;

/// Simulated day index used to timestamp allocations.
pub type Day = u64;

/// One contiguous reservation of address-space units.
///
/// Records are never removed from the allocator's history; a released record
/// keeps its range and gains a `released_at` stamp instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub start: usize,
    pub length: usize,
    pub owner: String,
    pub created_at: Day,
    pub released_at: Option<Day>,
}

impl Allocation {
    pub fn new(start: usize, length: usize, owner: &str, created_at: Day) -> Self {
        Allocation {
            start,
            length,
            owner: owner.to_string(),
            created_at,
            released_at: None,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    pub fn is_live(&self) -> bool {
        self.released_at.is_none()
    }

    /// Live at day `at`: created no later than `at` and not released by then.
    pub fn is_live_at(&self, at: Day) -> bool {
        self.created_at <= at && self.released_at.map_or(true, |r| r > at)
    }

    pub fn overlaps(&self, other: &Allocation) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// A live range as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub range: Range<usize>,
    pub owner: String,
}

impl From<&Allocation> for Occupancy {
    fn from(a: &Allocation) -> Self {
        Occupancy {
            range: a.range(),
            owner: a.owner.clone(),
        }
    }
}
