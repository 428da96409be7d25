use crate::space::{
    allocation::{Allocation, Day, Occupancy},
    error::{Denial, SpaceError},
};
use serde::Serialize;
use std::{collections::BTreeMap, ops::Range};
use tracing::{debug, info, warn};

/// Point-in-time accounting of the space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Usage {
    pub capacity: usize,
    pub used: usize,
    pub free: usize,
    pub largest_gap: usize,
    pub live_allocations: usize,
    /// `1 - largest_gap / free`; 0.0 when nothing is free.
    pub fragmentation: f64,
}

/// Fixed-size linear address space with first-fit placement.
///
/// Keeps every allocation ever made, in insertion order, and indexes the live
/// ones by start address so the first-fit scan walks them in address order.
/// Freed ranges are never merged with their neighbours; a later scan simply
/// finds them as gaps between live records.
#[derive(Debug)]
pub struct AddressSpaceAllocator {
    capacity: usize,
    records: Vec<Allocation>,
    /// start address -> index into `records`, live records only.
    live: BTreeMap<usize, usize>,
    now: Day,
}

impl AddressSpaceAllocator {
    pub fn new(capacity: usize) -> Result<Self, SpaceError> {
        if capacity == 0 {
            return Err(SpaceError::ZeroCapacity);
        }
        Ok(AddressSpaceAllocator {
            capacity,
            records: Vec::new(),
            live: BTreeMap::new(),
            now: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn now(&self) -> Day {
        self.now
    }

    /// Reserve `length` contiguous units for `owner` at the lowest address
    /// that fits, returning the start address.
    pub fn allocate(&mut self, length: usize, owner: &str) -> Result<usize, Denial> {
        if length == 0 {
            warn!(owner, "rejected zero-length request");
            return Err(Denial::Empty);
        }
        if length > self.capacity {
            warn!(
                owner,
                requested = length,
                capacity = self.capacity,
                "request larger than the whole space"
            );
            return Err(Denial::Oversized {
                requested: length,
                capacity: self.capacity,
            });
        }

        let Some(start) = self.first_fit(length) else {
            let usage = self.usage();
            warn!(
                owner,
                requested = length,
                free = usage.free,
                largest_gap = usage.largest_gap,
                "no contiguous run large enough"
            );
            return Err(Denial::Fragmented {
                requested: length,
                free: usage.free,
                largest_gap: usage.largest_gap,
            });
        };

        let idx = self.records.len();
        self.records
            .push(Allocation::new(start, length, owner, self.now));
        self.live.insert(start, idx);
        info!(owner, start, length, day = self.now, "allocated");
        Ok(start)
    }

    fn first_fit(&self, length: usize) -> Option<usize> {
        let mut cursor: usize = 0;
        for &idx in self.live.values() {
            let rec = &self.records[idx];
            if cursor.checked_add(length).is_some_and(|end| end <= rec.start) {
                debug!(cursor, before = rec.start, "gap fits");
                return Some(cursor);
            }
            cursor = rec.end();
        }
        // tail gap
        cursor
            .checked_add(length)
            .is_some_and(|end| end <= self.capacity)
            .then_some(cursor)
    }

    /// Release every live holding of `owner`, returning the freed ranges in
    /// record order. An empty result means the owner held nothing.
    pub fn release(&mut self, owner: &str) -> Vec<Range<usize>> {
        let now = self.now;
        let mut freed = Vec::new();
        for rec in self
            .records
            .iter_mut()
            .filter(|r| r.is_live() && r.owner == owner)
        {
            rec.released_at = Some(now);
            self.live.remove(&rec.start);
            info!(owner, start = rec.start, length = rec.length, day = now, "released");
            freed.push(rec.range());
        }
        if freed.is_empty() {
            info!(owner, "nothing to release");
        }
        freed
    }

    /// Every record live at day `at`, ordered by start address.
    pub fn snapshot(&self, at: Day) -> Vec<Occupancy> {
        let mut out: Vec<Occupancy> = self
            .records
            .iter()
            .filter(|r| r.is_live_at(at))
            .map(Occupancy::from)
            .collect();
        out.sort_by_key(|o| o.range.start);
        out
    }

    pub fn advance_day(&mut self) {
        self.now += 1;
    }

    /// All records ever created, live or released, in creation order.
    pub fn history(&self) -> &[Allocation] {
        &self.records
    }

    pub fn live(&self) -> impl Iterator<Item = &Allocation> + '_ {
        self.live.values().map(move |&idx| &self.records[idx])
    }

    /// Maximal free runs in address order.
    pub fn gaps(&self) -> Vec<Range<usize>> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for rec in self.live() {
            if rec.start > cursor {
                gaps.push(cursor..rec.start);
            }
            cursor = rec.end();
        }
        if cursor < self.capacity {
            gaps.push(cursor..self.capacity);
        }
        gaps
    }

    pub fn usage(&self) -> Usage {
        let used: usize = self.live().map(|r| r.length).sum();
        let free = self.capacity - used;
        let largest_gap = self.gaps().iter().map(|g| g.len()).max().unwrap_or(0);
        let fragmentation = if free == 0 {
            0.0
        } else {
            1.0 - largest_gap as f64 / free as f64
        };
        Usage {
            capacity: self.capacity,
            used,
            free,
            largest_gap,
            live_allocations: self.live.len(),
            fragmentation,
        }
    }
}
