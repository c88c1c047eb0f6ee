//! Across-request parallelism.
//!
//! A single request always runs sequentially. Independent requests run on rayon
//! workers, each worker reusing one driver. Every request gets its own rng derived
//! from `(seed, request index)`, so the output is stable for a fixed `seed`
//! independent of thread count and scheduling.

use crate::driver::SalsaIterations;
use crate::graph::BipartiteGraph;
use crate::request::SalsaRequest;
use crate::state::VisitTable;
use crate::stats::SalsaStats;
use crate::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Owned snapshot of one finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct SalsaResult {
    pub visited_right_nodes: VisitTable,
    pub stats: SalsaStats,
}

fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}

/// Rng used for the request at `index` of a batch seeded with `seed`.
pub fn request_rng(seed: u64, index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(mix64(seed ^ (index as u64)))
}

/// Run every request against `graph`, returning results in request order.
///
/// The first failing request (by index) determines the returned error.
pub fn run_batch<G>(graph: &G, requests: &[SalsaRequest], seed: u64) -> Result<Vec<SalsaResult>>
where
    G: BipartiteGraph + Sync + ?Sized,
{
    requests
        .par_iter()
        .enumerate()
        .map_init(
            || SalsaIterations::new(graph),
            |driver, (i, request)| -> Result<SalsaResult> {
                let mut rng = request_rng(seed, i);
                driver.run(request, &mut rng)?;
                Ok(SalsaResult {
                    visited_right_nodes: driver.visited_right_nodes().clone(),
                    stats: *driver.stats(),
                })
            },
        )
        .collect()
}
