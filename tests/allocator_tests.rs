use addrspace::space::{
    allocator::AddressSpaceAllocator,
    error::{Denial, SpaceError},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn assert_no_overlap(space: &AddressSpaceAllocator) {
    let live: Vec<_> = space.live().collect();
    for (i, a) in live.iter().enumerate() {
        assert!(a.end() <= space.capacity());
        for b in &live[i + 1..] {
            assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
        }
    }
}

#[test]
fn test_zero_capacity_rejected() {
    assert_eq!(
        AddressSpaceAllocator::new(0).unwrap_err(),
        SpaceError::ZeroCapacity
    );
}

#[test]
fn test_exact_fit_then_full() {
    let mut space = AddressSpaceAllocator::new(10).unwrap();
    assert_eq!(space.allocate(10, "A"), Ok(0));
    assert_eq!(
        space.allocate(1, "B"),
        Err(Denial::Fragmented {
            requested: 1,
            free: 0,
            largest_gap: 0
        })
    );
}

#[test]
fn test_oversized_never_mutates() {
    let mut space = AddressSpaceAllocator::new(10).unwrap();
    space.allocate(3, "A").unwrap();
    let before = space.history().to_vec();
    assert_eq!(
        space.allocate(11, "B"),
        Err(Denial::Oversized {
            requested: 11,
            capacity: 10
        })
    );
    assert_eq!(space.history(), &before[..]);
}

#[test]
fn test_zero_length_denied() {
    let mut space = AddressSpaceAllocator::new(10).unwrap();
    assert_eq!(space.allocate(0, "A"), Err(Denial::Empty));
    assert!(space.history().is_empty());
}

#[test]
fn test_sequential_placement() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    assert_eq!(space.allocate(8, "A"), Ok(0));
    assert_eq!(space.allocate(8, "B"), Ok(8));
    assert_eq!(space.allocate(4, "C"), Ok(16));
}

#[test]
fn test_freed_gap_reused_first() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(8, "A").unwrap();
    space.allocate(8, "B").unwrap();
    assert_eq!(space.release("A"), vec![0..8]);
    assert_eq!(space.allocate(5, "C"), Ok(0));
}

#[test]
fn test_lowest_gap_wins_over_better_fit() {
    // gaps at [0,3) and [10,20)
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(3, "X").unwrap();
    space.allocate(7, "Y").unwrap();
    space.release("X");
    assert_eq!(space.gaps(), vec![0..3, 10..20]);
    assert_eq!(space.allocate(3, "Z"), Ok(0));
}

#[test]
fn test_small_gap_skipped_for_larger_one() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(3, "X").unwrap();
    space.allocate(7, "Y").unwrap();
    space.release("X");
    assert_eq!(space.allocate(4, "Z"), Ok(10));
}

#[test]
fn test_gap_too_small_is_denied() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(5, "A").unwrap();
    space.allocate(2, "tmp").unwrap();
    space.allocate(13, "B").unwrap();
    space.release("tmp");
    // live: [0,5) and [7,20)
    assert_eq!(
        space.allocate(3, "C"),
        Err(Denial::Fragmented {
            requested: 3,
            free: 2,
            largest_gap: 2
        })
    );
    assert_eq!(space.live().count(), 2);
}

#[test]
fn test_adjacent_freed_runs_form_one_gap() {
    let mut space = AddressSpaceAllocator::new(12).unwrap();
    space.allocate(4, "A").unwrap();
    space.allocate(4, "B").unwrap();
    space.allocate(4, "C").unwrap();
    space.release("A");
    space.release("B");
    assert_eq!(space.gaps(), vec![0..8]);
    assert_eq!(space.allocate(6, "D"), Ok(0));
    assert_eq!(space.history().len(), 4);
}

#[test]
fn test_release_all_holdings_of_owner() {
    let mut space = AddressSpaceAllocator::new(30).unwrap();
    space.allocate(5, "Baker").unwrap();
    space.allocate(5, "Taylor").unwrap();
    space.allocate(5, "Baker").unwrap();
    assert_eq!(space.release("Baker"), vec![0..5, 10..15]);
    let owners: Vec<_> = space.live().map(|r| r.owner.as_str()).collect();
    assert_eq!(owners, vec!["Taylor"]);
}

#[test]
fn test_second_release_is_noop() {
    let mut space = AddressSpaceAllocator::new(10).unwrap();
    space.allocate(5, "A").unwrap();
    assert!(!space.release("A").is_empty());
    assert!(space.release("A").is_empty());
    assert!(space.release("nobody").is_empty());
}

#[test]
fn test_released_range_absent_from_snapshot() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(2, "Miller").unwrap();
    let addr = space.allocate(5, "Baker").unwrap();
    space.advance_day();
    space.release("Baker");
    for at in [space.now(), space.now() + 3] {
        assert!(space.snapshot(at).iter().all(|o| o.range.start != addr));
    }
    // still visible before the release day
    assert!(space.snapshot(0).iter().any(|o| o.range.start == addr));
}

#[test]
fn test_timestamps_and_history() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(4, "A").unwrap();
    space.advance_day();
    space.advance_day();
    space.allocate(4, "B").unwrap();
    space.release("A");

    let hist = space.history();
    assert_eq!(hist[0].created_at, 0);
    assert_eq!(hist[0].released_at, Some(2));
    assert_eq!(hist[1].created_at, 2);
    assert_eq!(hist[1].released_at, None);

    // B did not exist yet on day 1; A did
    let day1: Vec<_> = space.snapshot(1).into_iter().map(|o| o.owner).collect();
    assert_eq!(day1, vec!["A".to_string()]);
}

#[test]
fn test_release_does_not_rewrite_released_at() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(4, "A").unwrap();
    space.release("A");
    space.advance_day();
    space.allocate(4, "A").unwrap();
    space.release("A");
    let stamps: Vec<_> = space.history().iter().map(|r| r.released_at).collect();
    assert_eq!(stamps, vec![Some(0), Some(1)]);
}

#[test]
fn test_usage_and_fragmentation() {
    let mut space = AddressSpaceAllocator::new(20).unwrap();
    space.allocate(5, "A").unwrap();
    space.allocate(5, "B").unwrap();
    space.allocate(5, "C").unwrap();
    space.release("B");
    let usage = space.usage();
    assert_eq!(usage.used, 10);
    assert_eq!(usage.free, 10);
    assert_eq!(usage.largest_gap, 5);
    assert_eq!(usage.live_allocations, 2);
    assert!((usage.fragmentation - 0.5).abs() < 1e-9);
}

#[test]
fn test_random_workload_never_overlaps() {
    let mut rng = StdRng::seed_from_u64(7);
    let owners = ["Baker", "Taylor", "Miller", "Weaver", "Fisher"];
    let mut space = AddressSpaceAllocator::new(64).unwrap();
    for _ in 0..2000 {
        let owner = owners[rng.gen_range(0..owners.len())];
        if rng.gen_bool(0.6) {
            let len = rng.gen_range(1..=20);
            if let Ok(start) = space.allocate(len, owner) {
                assert!(start + len <= space.capacity());
            }
        } else {
            space.release(owner);
        }
        if rng.gen_bool(0.2) {
            space.advance_day();
        }
        assert_no_overlap(&space);
    }
}

#[test]
fn test_placement_is_deterministic() {
    let run = || {
        let mut space = AddressSpaceAllocator::new(40).unwrap();
        let mut placed = Vec::new();
        for (i, len) in [7, 3, 9, 4, 6, 2].into_iter().enumerate() {
            placed.push(space.allocate(len, &format!("o{}", i % 3)));
        }
        space.release("o1");
        placed.push(space.allocate(3, "late"));
        placed
    };
    assert_eq!(run(), run());
}

#[test]
fn test_request_past_end_of_huge_space_is_denied() {
    let mut space = AddressSpaceAllocator::new(usize::MAX).unwrap();
    assert_eq!(space.allocate(usize::MAX - 1, "A"), Ok(0));
    assert_eq!(
        space.allocate(2, "B"),
        Err(Denial::Fragmented {
            requested: 2,
            free: 1,
            largest_gap: 1
        })
    );
    assert_eq!(space.allocate(1, "C"), Ok(usize::MAX - 1));
}

#[test]
fn test_gap_check_does_not_wrap_before_a_record() {
    let mut space = AddressSpaceAllocator::new(usize::MAX).unwrap();
    space.allocate(10, "low").unwrap();
    space.allocate(10, "mid").unwrap();
    space.release("low");
    // [0,10) free, [10,20) live; a huge request must skip the small gap
    assert_eq!(space.allocate(usize::MAX - 20, "big"), Ok(20));
    assert_eq!(
        space.allocate(usize::MAX - 5, "bigger"),
        Err(Denial::Fragmented {
            requested: usize::MAX - 5,
            free: 10,
            largest_gap: 10
        })
    );
}
