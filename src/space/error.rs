//! Outcome types for address-space operations.
//!
//! Denials are ordinary results: the allocator stays usable after any number
//! of them. Only construction can fail hard.

use thiserror::Error;

/// Why an allocation request was not placed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Zero-length reservations are not representable.
    #[error("requested length must be at least 1")]
    Empty,

    /// The request exceeds the whole space and can never succeed.
    #[error("requested {requested} units but the space only has {capacity}")]
    Oversized { requested: usize, capacity: usize },

    /// Enough units may be free in total, but no single run is long enough.
    #[error(
        "no contiguous run of {requested} units (free {free}, largest gap {largest_gap})"
    )]
    Fragmented {
        requested: usize,
        free: usize,
        largest_gap: usize,
    },
}

/// Errors raised while constructing an allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    #[error("capacity must be a positive number of units")]
    ZeroCapacity,
}
