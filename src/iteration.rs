//! Single half-step strategies.
//!
//! A half-step moves every walker on the source side to one uniformly chosen
//! neighbor on the other side. The source population is drained into a scratch
//! buffer sorted by node id before any sampling, so the rng is consumed in the
//! same order no matter how the population tables were laid out by earlier
//! requests.

use crate::graph::BipartiteGraph;
use crate::state::{PopulationMap, SalsaInternalState};
use crate::visitor::{NodeVisitor, PlainCounter, SocialProofRecorder};
use crate::{NodeId, Result};
use rand::Rng;

/// The three kinds of half-step a SALSA run is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalsaIteration {
    /// Left to right, counting visits.
    Left,
    /// Right to left.
    Right,
    /// Left to right, counting visits and recording social proof.
    FinalLeft,
}

impl SalsaIteration {
    pub fn step<G, R>(self, graph: &G, state: &mut SalsaInternalState, rng: &mut R) -> Result<()>
    where
        G: BipartiteGraph + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            SalsaIteration::Left => left_step(graph, state, rng, &PlainCounter),
            SalsaIteration::Right => right_step(graph, state, rng),
            SalsaIteration::FinalLeft => {
                let recorder = SocialProofRecorder::new(state.max_social_proof_size);
                left_step(graph, state, rng, &recorder)
            }
        }
    }
}

fn drain_sorted(source: &mut PopulationMap, scratch: &mut Vec<(NodeId, u64)>) {
    scratch.clear();
    scratch.extend(source.drain());
    scratch.sort_unstable_by_key(|&(node, _)| node);
}

fn left_step<G, R, V>(
    graph: &G,
    state: &mut SalsaInternalState,
    rng: &mut R,
    visitor: &V,
) -> Result<()>
where
    G: BipartiteGraph + ?Sized,
    R: Rng + ?Sized,
    V: NodeVisitor,
{
    drain_sorted(&mut state.current_left_nodes, &mut state.scratch);
    for &(left, walkers) in &state.scratch {
        for _ in 0..walkers {
            let right = graph.random_right_neighbor(left, rng)?;
            *state.current_right_nodes.entry(right).or_insert(0) += 1;
            let record = state.visited_right_nodes.entry(right).or_default();
            visitor.visit(left, right, record);
        }
    }
    Ok(())
}

fn right_step<G, R>(graph: &G, state: &mut SalsaInternalState, rng: &mut R) -> Result<()>
where
    G: BipartiteGraph + ?Sized,
    R: Rng + ?Sized,
{
    drain_sorted(&mut state.current_right_nodes, &mut state.scratch);
    for &(right, walkers) in &state.scratch {
        for _ in 0..walkers {
            let left = graph.random_left_neighbor(right, rng)?;
            *state.current_left_nodes.entry(left).or_insert(0) += 1;
        }
    }
    Ok(())
}
