use crate::space::{
    allocation::{Allocation, Day, Occupancy},
    allocator::{AddressSpaceAllocator, Usage},
    error::{Denial, SpaceError},
};
use parking_lot::Mutex;
use std::{ops::Range, sync::Arc};

/// Cloneable handle serializing access to one allocator.
///
/// The first-fit scan and the insert that follows it happen under a single
/// lock acquisition, so interleaved callers can never be handed overlapping
/// ranges. Reads take the same lock and return owned copies.
#[derive(Clone)]
pub struct SharedAllocator {
    inner: Arc<Mutex<AddressSpaceAllocator>>,
}

impl SharedAllocator {
    pub fn new(capacity: usize) -> Result<Self, SpaceError> {
        Ok(Self::from_allocator(AddressSpaceAllocator::new(capacity)?))
    }

    pub fn from_allocator(space: AddressSpaceAllocator) -> Self {
        SharedAllocator {
            inner: Arc::new(Mutex::new(space)),
        }
    }

    pub fn allocate(&self, length: usize, owner: &str) -> Result<usize, Denial> {
        self.inner.lock().allocate(length, owner)
    }

    pub fn release(&self, owner: &str) -> Vec<Range<usize>> {
        self.inner.lock().release(owner)
    }

    pub fn snapshot(&self, at: Day) -> Vec<Occupancy> {
        self.inner.lock().snapshot(at)
    }

    pub fn snapshot_now(&self) -> (Day, Vec<Occupancy>) {
        let space = self.inner.lock();
        (space.now(), space.snapshot(space.now()))
    }

    pub fn advance_day(&self) {
        self.inner.lock().advance_day();
    }

    pub fn now(&self) -> Day {
        self.inner.lock().now()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn usage(&self) -> Usage {
        self.inner.lock().usage()
    }

    pub fn history(&self) -> Vec<Allocation> {
        self.inner.lock().history().to_vec()
    }

    /// Run `f` with exclusive access to the allocator.
    pub fn with<R>(&self, f: impl FnOnce(&mut AddressSpaceAllocator) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
