//! SALSA iteration driver.
//!
//! This is a Monte-Carlo rendition of SALSA: many independent walkers start on the
//! left side and all of them advance one half-step at a time, left to right, then
//! right to left, and so on. Visits to right nodes are counted on every
//! left-to-right half-step; the last left-to-right half-step additionally records
//! which left nodes sent each walker (social proof). Downstream selection reads the visit
//! table and stats from [`SalsaInternalState`].
//!
//! A driver is built once and reused: every run clears the internal state in place.
//! It is not meant to be shared between threads while a run is in progress; run
//! requests in parallel with one driver each.

use crate::graph::BipartiteGraph;
use crate::iteration::SalsaIteration;
use crate::request::SalsaRequest;
use crate::state::{SalsaInternalState, VisitTable};
use crate::stats::SalsaStats;
use crate::{NodeId, Result};
use rand::Rng;

/// What seeding produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// At least one left node received walkers.
    Seeded,
    /// No seed had positive weight and degree, and the query node has no neighbors.
    Degenerate,
}

/// The sequence of half-steps for a walk of `max_random_walk_length` half-steps.
///
/// Directions strictly alternate, starting left to right. Every left-to-right
/// half-step is [`SalsaIteration::Left`] except the last one, which is
/// [`SalsaIteration::FinalLeft`]. For odd lengths that is the very last half-step
/// (`Left, Right, ..., Right, FinalLeft`); for even lengths one right-to-left
/// half-step follows it (`Left, Right, ..., FinalLeft, Right`). That trailing
/// half-step only moves walkers back to the left side; it leaves the visit table
/// and social proof untouched, and exists so a run makes exactly
/// `max_random_walk_length` half-steps.
#[derive(Debug, Clone)]
pub struct IterationSchedule {
    max_random_walk_length: u32,
    index: u32,
}

impl IterationSchedule {
    pub fn new(max_random_walk_length: u32) -> Self {
        Self { max_random_walk_length, index: 0 }
    }

    /// Index of the half-step that records social proof, if the walk has one.
    pub fn final_left_index(&self) -> Option<u32> {
        match self.max_random_walk_length {
            0 => None,
            n if n % 2 == 1 => Some(n - 1),
            n => Some(n - 2),
        }
    }
}

impl Iterator for IterationSchedule {
    type Item = SalsaIteration;

    fn next(&mut self) -> Option<SalsaIteration> {
        if self.index >= self.max_random_walk_length {
            return None;
        }
        let i = self.index;
        self.index += 1;
        let iteration = if i % 2 == 1 {
            SalsaIteration::Right
        } else if Some(i) == self.final_left_index() {
            SalsaIteration::FinalLeft
        } else {
            SalsaIteration::Left
        };
        Some(iteration)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.max_random_walk_length - self.index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for IterationSchedule {}

pub struct SalsaIterations<'g, G: ?Sized> {
    graph: &'g G,
    state: SalsaInternalState,
}

impl<'g, G: BipartiteGraph + ?Sized> SalsaIterations<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph, state: SalsaInternalState::new() }
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn state(&self) -> &SalsaInternalState {
        &self.state
    }

    pub fn stats(&self) -> &SalsaStats {
        self.state.stats()
    }

    pub fn visited_right_nodes(&self) -> &VisitTable {
        self.state.visited_right_nodes()
    }

    /// Run one complete SALSA pass for `request`.
    ///
    /// On success the visit table and stats in [`Self::state`] describe this
    /// request. Degenerate seeds are not an error: the run finishes with empty
    /// tables. On error the state is unspecified until the next run.
    pub fn run<R: Rng + ?Sized>(&mut self, request: &SalsaRequest, rng: &mut R) -> Result<()> {
        request.validate()?;

        tracing::info!("SALSA: starting to reset internal state");
        self.reset(request);
        tracing::info!("SALSA: done resetting internal state");

        let outcome = self.seed_left_side_for_first_iteration(request);
        tracing::info!(
            seed_nodes = self.state.stats.num_seed_nodes,
            walkers = self.state.current_left_nodes.values().sum::<u64>(),
            "SALSA: done seeding"
        );
        if outcome == SeedOutcome::Degenerate {
            tracing::warn!(
                query_node = request.query_node,
                "SALSA: no seed node has positive weight and degree; nothing to walk"
            );
            return Ok(());
        }

        let schedule = IterationSchedule::new(request.config.max_random_walk_length);
        for (i, iteration) in schedule.enumerate() {
            tracing::debug!(
                step = i,
                ?iteration,
                left = self.state.current_left_nodes.len(),
                right = self.state.current_right_nodes.len(),
                "SALSA: half-step"
            );
            iteration.step(self.graph, &mut self.state, rng)?;
        }

        self.state.finalize_stats();
        tracing::info!(
            right_nodes_reached = self.state.stats.num_right_nodes_reached,
            rhs_visits = self.state.stats.num_rhs_visits,
            "SALSA: done walking"
        );
        Ok(())
    }

    /// Clear all per-request state and adopt `request`'s parameters.
    pub fn reset(&mut self, request: &SalsaRequest) {
        self.state.reset();
        self.state.max_social_proof_size = request.config.max_social_proof_size;
    }

    /// Distribute walkers over the left side in proportion to seed weight.
    ///
    /// Seeds with zero weight or zero degree are skipped. When the query node is not
    /// one of the request's seeds but has neighbors, it is added with a weight that
    /// makes it exactly `query_node_weight_fraction` of the total (or weight 1 when
    /// no other seed qualifies). A seed with weight `w` gets
    /// `ceil(w / total * num_random_walks)` walkers.
    ///
    /// Weights are divided by a power of two close to the largest one before summing,
    /// so huge finite weights cannot overflow the total and walker shares stay exact.
    /// A seed whose share underflows to zero gets no walkers and leaves the seed set.
    pub fn seed_left_side_for_first_iteration(&mut self, request: &SalsaRequest) -> SeedOutcome {
        let graph = self.graph;
        let state = &mut self.state;
        let query_node = request.query_node;
        let query_degree = graph.left_degree(query_node);
        state.stats.num_direct_neighbors = query_degree as u32;

        let qualifies = |node: NodeId, weight: f64| weight > 0.0 && graph.left_degree(node) > 0;
        let max_weight = request
            .left_seed_nodes_with_weight
            .iter()
            .filter(|&(&node, &weight)| qualifies(node, weight))
            .fold(0.0, |max: f64, (_, &weight)| max.max(weight));
        let scale = weight_scale(max_weight);
        state.weight_scale = scale;

        let mut total_weight = 0.0;
        for (&node, &weight) in &request.left_seed_nodes_with_weight {
            if qualifies(node, weight) {
                let scaled = weight / scale;
                total_weight += scaled;
                state.seed_weights.insert(node, scaled);
            }
        }

        // The request's own weight for the query node wins over injection.
        if !request.left_seed_nodes_with_weight.contains_key(&query_node) && query_degree > 0 {
            let f = request.config.query_node_weight_fraction;
            let query_weight = if total_weight > 0.0 {
                total_weight * f / (1.0 - f)
            } else {
                1.0 / scale
            };
            if query_weight > 0.0 {
                state.seed_weights.insert(query_node, query_weight);
            }
            state.injected_query_weight = Some(query_weight * scale);
            total_weight += query_weight;
        }
        state.total_seed_weight = total_weight;

        let num_walks = f64::from(request.config.num_random_walks);
        let left = &mut state.current_left_nodes;
        state.seed_weights.retain(|&node, &mut weight| {
            let walkers = (weight / total_weight * num_walks).ceil() as u64;
            if walkers > 0 {
                left.insert(node, walkers);
            }
            walkers > 0
        });
        state.stats.num_seed_nodes = state.current_left_nodes.len() as u32;

        if state.current_left_nodes.is_empty() {
            SeedOutcome::Degenerate
        } else {
            SeedOutcome::Seeded
        }
    }
}

/// Power of two within a factor of two of `max_weight` (1 when there is no positive weight).
///
/// Dividing by a power of two is exact, so ratios between weights are preserved.
fn weight_scale(max_weight: f64) -> f64 {
    if max_weight > 0.0 {
        let exp = (max_weight.log2().floor() as i32).clamp(-1022, 1023);
        2f64.powi(exp)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::BipartiteAdjacency;
    use crate::iteration::SalsaIteration::{FinalLeft, Left, Right};

    #[test]
    fn schedule_shapes() {
        let s = |n| IterationSchedule::new(n).collect::<Vec<_>>();
        assert_eq!(s(2), vec![FinalLeft, Right]);
        assert_eq!(s(3), vec![Left, Right, FinalLeft]);
        assert_eq!(s(4), vec![Left, Right, FinalLeft, Right]);
        assert_eq!(s(5), vec![Left, Right, Left, Right, FinalLeft]);
        assert_eq!(s(6), vec![Left, Right, Left, Right, FinalLeft, Right]);
        assert_eq!(IterationSchedule::new(7).len(), 7);
    }

    #[test]
    fn schedule_has_exactly_one_final_left_as_last_forward_step() {
        for n in 2..40u32 {
            let v: Vec<_> = IterationSchedule::new(n).collect();
            assert_eq!(v.len(), n as usize);
            assert_eq!(v.iter().filter(|&&it| it == FinalLeft).count(), 1);
            let fl = v.iter().position(|&it| it == FinalLeft).unwrap();
            assert_eq!(Some(fl as u32), IterationSchedule::new(n).final_left_index());
            assert!(v[fl + 1..].iter().all(|&it| it == Right));
            for (i, it) in v.iter().enumerate() {
                assert_eq!(*it == Right, i % 2 == 1, "n={n} i={i}");
            }
            if n % 2 == 1 {
                assert_eq!(v[v.len() - 2], Right);
            }
        }
    }

    #[test]
    fn zero_fraction_injection_seeds_nothing_extra() {
        // With f = 0 the query node is injected with weight 0 and gets no walkers.
        let g = BipartiteAdjacency::from_edges(&[(1, 10), (2, 10)]);
        let req = SalsaRequest::new(1)
            .with_seeds([(2, 1.0)])
            .with_query_node_weight_fraction(0.0)
            .with_num_random_walks(8);
        let mut d = SalsaIterations::new(&g);
        d.reset(&req);
        assert_eq!(d.seed_left_side_for_first_iteration(&req), SeedOutcome::Seeded);
        assert_eq!(d.state().injected_query_weight(), Some(0.0));
        assert_eq!(d.state().current_left_nodes().get(&1), None);
        assert_eq!(d.state().current_left_nodes()[&2], 8);
        assert_eq!(d.stats().num_seed_nodes, 1);
    }

    #[test]
    fn zero_weight_seeds_are_skipped() {
        let g = BipartiteAdjacency::from_edges(&[(1, 10), (2, 10), (3, 11)]);
        let req = SalsaRequest::new(1)
            .with_seeds([(1, 0.0), (2, 0.0), (3, 2.0)])
            .with_num_random_walks(10);
        let mut d = SalsaIterations::new(&g);
        d.reset(&req);
        d.seed_left_side_for_first_iteration(&req);
        let mut seeds: Vec<_> = d.state().non_zero_seed_set().collect();
        seeds.sort_unstable();
        assert_eq!(seeds, vec![3]);
        assert_eq!(d.state().injected_query_weight(), None);
        assert_eq!(d.state().current_left_nodes()[&3], 10);
    }
}
