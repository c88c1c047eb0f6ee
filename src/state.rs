//! Per-request scratch state, reused across requests.
//!
//! Every container here is cleared in place on [`SalsaInternalState::reset`] and
//! keeps its capacity, so a driver that has served one request of a given shape
//! serves the next one without growing its tables again.

use crate::stats::SalsaStats;
use crate::NodeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Walker count per node on one side of the graph.
pub type PopulationMap = FxHashMap<NodeId, u64>;

/// Cumulative visit records keyed by right node.
pub type VisitTable = FxHashMap<NodeId, NodeVisit>;

/// Left nodes that led walkers to a right node on the social-proof half-step.
///
/// Kept as a list in arrival order; a left node appears once per walker it sent.
pub type SocialProof = SmallVec<[NodeId; 4]>;

/// Visit record for one right node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeVisit {
    /// Visits over every left-to-right half-step of the request.
    pub visits: u64,
    /// Only filled on the last left-to-right half-step.
    pub social_proof: SocialProof,
}

#[derive(Debug)]
pub struct SalsaInternalState {
    pub(crate) stats: SalsaStats,
    pub(crate) current_left_nodes: PopulationMap,
    pub(crate) current_right_nodes: PopulationMap,
    /// Effective weight of every seed in the non-zero seed set, injected query node
    /// included, in units of `weight_scale`.
    pub(crate) seed_weights: FxHashMap<NodeId, f64>,
    /// Sum of `seed_weights`, in units of `weight_scale`.
    pub(crate) total_seed_weight: f64,
    /// Power of two the seed weights were divided by.
    pub(crate) weight_scale: f64,
    pub(crate) injected_query_weight: Option<f64>,
    pub(crate) visited_right_nodes: VisitTable,
    /// Source population of the running half-step, sorted by node id.
    pub(crate) scratch: Vec<(NodeId, u64)>,
    /// Social proof cap of the current request.
    pub(crate) max_social_proof_size: Option<usize>,
}

impl Default for SalsaInternalState {
    fn default() -> Self {
        Self {
            stats: SalsaStats::default(),
            current_left_nodes: PopulationMap::default(),
            current_right_nodes: PopulationMap::default(),
            seed_weights: FxHashMap::default(),
            total_seed_weight: 0.0,
            weight_scale: 1.0,
            injected_query_weight: None,
            visited_right_nodes: VisitTable::default(),
            scratch: Vec::new(),
            max_social_proof_size: None,
        }
    }
}

impl SalsaInternalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every per-request container without releasing its memory.
    pub fn reset(&mut self) {
        self.stats.reset();
        self.current_left_nodes.clear();
        self.current_right_nodes.clear();
        self.seed_weights.clear();
        self.total_seed_weight = 0.0;
        self.weight_scale = 1.0;
        self.injected_query_weight = None;
        self.visited_right_nodes.clear();
        self.scratch.clear();
        self.max_social_proof_size = None;
    }

    pub fn stats(&self) -> &SalsaStats {
        &self.stats
    }

    pub fn current_left_nodes(&self) -> &PopulationMap {
        &self.current_left_nodes
    }

    pub fn current_right_nodes(&self) -> &PopulationMap {
        &self.current_right_nodes
    }

    pub fn visited_right_nodes(&self) -> &VisitTable {
        &self.visited_right_nodes
    }

    /// Left nodes with positive seed weight and positive degree.
    pub fn non_zero_seed_set(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.seed_weights.keys().copied()
    }

    pub fn non_zero_seed_count(&self) -> usize {
        self.seed_weights.len()
    }

    /// Effective seed weight of `node`, after query-node injection.
    pub fn seed_weight(&self, node: NodeId) -> Option<f64> {
        self.seed_weights.get(&node).map(|&w| w * self.weight_scale)
    }

    /// Sum of the effective seed weights. May be infinite when the request's weights
    /// sum past `f64::MAX`; walker shares are unaffected.
    pub fn total_seed_weight(&self) -> f64 {
        self.total_seed_weight * self.weight_scale
    }

    /// Weight given to the query node when it was absent from the request's seeds.
    pub fn injected_query_weight(&self) -> Option<f64> {
        self.injected_query_weight
    }

    /// Recompute the reach/visit aggregates from the visit table.
    pub(crate) fn finalize_stats(&mut self) {
        let stats = &mut self.stats;
        stats.num_right_nodes_reached = 0;
        stats.num_rhs_visits = 0;
        stats.min_visits_per_right_node = crate::stats::NO_VISITS_SENTINEL;
        stats.max_visits_per_right_node = 0;
        for visit in self.visited_right_nodes.values() {
            stats.record_right_node(visit.visits);
        }
    }
}
