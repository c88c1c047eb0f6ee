//! `salsa-walk`: Monte-Carlo SALSA iterations over a bipartite graph.
//!
//! Given a left-side query node and optional weighted seed nodes, a
//! [`SalsaIterations`] driver launches a fixed number of walkers, moves them
//! alternately left-to-right and right-to-left, and counts how often each right
//! node is visited. The final left-to-right half-step also records, per right
//! node, the left nodes its walkers came from ("social proof").
//!
//! Public invariants (must not drift):
//! - **Determinism**: a run is a pure function of graph, request and rng state,
//!   including for drivers reused across requests.
//! - **Visit accounting**: every left-to-right half-step increments the visit table;
//!   `num_rhs_visits` is the sum of the table and `num_right_nodes_reached` its size.
//! - **Social proof** is written only on the last left-to-right half-step.
//!
//! Ranking, filtering and the graph store itself live outside this crate.

pub mod driver;
pub mod graph;
pub mod iteration;
pub mod request;
pub mod state;
pub mod stats;
pub mod visitor;

#[cfg(feature = "parallel")]
pub mod batch;

#[cfg(feature = "parallel")]
pub use batch::{request_rng, run_batch, SalsaResult};
pub use driver::{IterationSchedule, SalsaIterations, SeedOutcome};
pub use graph::{BipartiteAdjacency, BipartiteGraph, Side};
pub use iteration::SalsaIteration;
pub use request::{SalsaConfig, SalsaRequest};
pub use state::{NodeVisit, PopulationMap, SalsaInternalState, SocialProof, VisitTable};
pub use stats::{SalsaStats, NO_VISITS_SENTINEL};
pub use visitor::{NodeVisitor, PlainCounter, SocialProofRecorder};

/// Node identifier; left and right ids are disjoint namespaces.
pub type NodeId = u64;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("{side} node {node} has no neighbors to sample from")]
    EmptyNeighborhood { side: Side, node: NodeId },
}

pub type Result<T> = std::result::Result<T, Error>;
