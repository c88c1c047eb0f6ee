//! Per-request execution statistics.

/// Value of [`SalsaStats::min_visits_per_right_node`] before any right node was visited.
pub const NO_VISITS_SENTINEL: u64 = i32::MAX as u64;

/// Counters describing one SALSA run.
///
/// The driver fills everything except `num_right_nodes_filtered`, which belongs to
/// whatever selects results downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SalsaStats {
    /// Left nodes that received walkers, query node included when it was seeded.
    pub num_seed_nodes: u32,
    /// Left degree of the query node.
    pub num_direct_neighbors: u32,
    /// Distinct right nodes in the visit table.
    pub num_right_nodes_reached: u32,
    /// Sum of all visit counters.
    pub num_rhs_visits: u64,
    /// Smallest visit counter, or [`NO_VISITS_SENTINEL`].
    pub min_visits_per_right_node: u64,
    pub max_visits_per_right_node: u64,
    pub num_right_nodes_filtered: u32,
}

impl Default for SalsaStats {
    fn default() -> Self {
        Self {
            num_seed_nodes: 0,
            num_direct_neighbors: 0,
            num_right_nodes_reached: 0,
            num_rhs_visits: 0,
            min_visits_per_right_node: NO_VISITS_SENTINEL,
            max_visits_per_right_node: 0,
            num_right_nodes_filtered: 0,
        }
    }
}

impl SalsaStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the zero state so the record can be reused for the next request.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Minimum visits per right node, `None` if nothing was visited.
    ///
    /// Decided by the reach count, so a genuine minimum equal to the sentinel value
    /// is still reported.
    pub fn min_visits(&self) -> Option<u64> {
        (self.num_right_nodes_reached > 0).then_some(self.min_visits_per_right_node)
    }

    /// Fold one right node's visit counter into the reach/visit aggregates.
    pub(crate) fn record_right_node(&mut self, visits: u64) {
        self.num_right_nodes_reached += 1;
        self.num_rhs_visits += visits;
        self.min_visits_per_right_node = self.min_visits_per_right_node.min(visits);
        self.max_visits_per_right_node = self.max_visits_per_right_node.max(visits);
    }
}
