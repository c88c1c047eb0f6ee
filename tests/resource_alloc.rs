use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use salsa_walk::{BipartiteAdjacency, SalsaIterations, SalsaRequest};
use stats_alloc::{Region, StatsAlloc, INSTRUMENTED_SYSTEM};
use std::alloc::System;

#[global_allocator]
static GLOBAL: &StatsAlloc<System> = &INSTRUMENTED_SYSTEM;

#[test]
fn warmed_driver_reuses_its_tables() {
    // This is a "resource consumption" test:
    // - a cold driver grows its population maps, visit table and scratch buffer
    // - a warm driver serving the same request shape should find them already sized
    //
    // We count allocations, not RSS (portable across OSes/CI).

    // Every left node links to a band of 5 right nodes.
    let n_left = 500u64;
    let mut edges = Vec::new();
    for l in 0..n_left {
        for k in 0..5 {
            edges.push((l, 1_000_000 + (l * 3 + k) % 800));
        }
    }
    let g = BipartiteAdjacency::from_edges(&edges);

    // Capped social proof stays inline in the small vector, so dropping and rebuilding
    // visit records does not touch the heap.
    let req = SalsaRequest::new(0)
        .with_seeds((0..n_left).step_by(7).map(|l| (l, 1.0)))
        .with_num_random_walks(5_000)
        .with_max_random_walk_length(5)
        .with_max_social_proof_size(4);

    let mut driver = SalsaIterations::new(&g);

    let r_cold = Region::new(&GLOBAL);
    driver.run(&req, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let s_cold = r_cold.change();
    let reached = driver.stats().num_right_nodes_reached;
    assert!(reached > 100, "expected a wide walk, reached={reached}");

    let r_warm = Region::new(&GLOBAL);
    driver.run(&req, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let s_warm = r_warm.change();
    assert_eq!(driver.stats().num_right_nodes_reached, reached);

    let a_cold = s_cold.allocations + s_cold.reallocations;
    let a_warm = s_warm.allocations + s_warm.reallocations;

    // Intentionally coarse: exact counts vary by allocator/platform. What matters is
    // that a warm run does not regrow its tables.
    assert!(
        a_warm * 10 < a_cold,
        "expected warm allocations << cold allocations (cold={a_cold}, warm={a_warm})"
    );
}
