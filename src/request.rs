//! SALSA request and walk parameters.

use crate::{Error, NodeId, Result};
use rustc_hash::FxHashMap;

/// Scalar walk parameters shared by every request built from them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SalsaConfig {
    /// Total walkers launched from the seed distribution.
    pub num_random_walks: u32,
    /// Number of half-steps; at least 2. The last left-to-right one records social proof.
    pub max_random_walk_length: u32,
    /// Share of the seed mass given to the query node when it is not already a seed.
    pub query_node_weight_fraction: f64,
    /// Cap on social proof entries per right node; `None` keeps every entry.
    pub max_social_proof_size: Option<usize>,
}

impl Default for SalsaConfig {
    fn default() -> Self {
        Self {
            num_random_walks: 1000,
            max_random_walk_length: 3,
            query_node_weight_fraction: 0.5,
            max_social_proof_size: None,
        }
    }
}

impl SalsaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_random_walks < 1 {
            return Err(Error::InvalidRequest(
                "num_random_walks must be >= 1".to_string(),
            ));
        }
        if self.max_random_walk_length < 2 {
            return Err(Error::InvalidRequest(format!(
                "max_random_walk_length must be >= 2 (got {})",
                self.max_random_walk_length
            )));
        }
        let f = self.query_node_weight_fraction;
        if !(0.0..1.0).contains(&f) {
            return Err(Error::InvalidRequest(format!(
                "query_node_weight_fraction must be in [0, 1) (got {f})"
            )));
        }
        Ok(())
    }
}

/// One SALSA query: a left-side query node plus an optional weighted seed set.
///
/// The driver never mutates the request; query-node injection happens in the
/// driver's own seed table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SalsaRequest {
    pub query_node: NodeId,
    pub left_seed_nodes_with_weight: FxHashMap<NodeId, f64>,
    pub config: SalsaConfig,
}

impl SalsaRequest {
    /// A request seeded only from `query_node`, with default parameters.
    pub fn new(query_node: NodeId) -> Self {
        Self {
            query_node,
            left_seed_nodes_with_weight: FxHashMap::default(),
            config: SalsaConfig::default(),
        }
    }

    pub fn with_seeds<I>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, f64)>,
    {
        self.left_seed_nodes_with_weight.extend(seeds);
        self
    }

    pub fn with_config(mut self, config: SalsaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_num_random_walks(mut self, n: u32) -> Self {
        self.config.num_random_walks = n;
        self
    }

    pub fn with_max_random_walk_length(mut self, len: u32) -> Self {
        self.config.max_random_walk_length = len;
        self
    }

    pub fn with_query_node_weight_fraction(mut self, f: f64) -> Self {
        self.config.query_node_weight_fraction = f;
        self
    }

    pub fn with_max_social_proof_size(mut self, cap: usize) -> Self {
        self.config.max_social_proof_size = Some(cap);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        for (&node, &w) in &self.left_seed_nodes_with_weight {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidRequest(format!(
                    "seed weight for left node {node} must be finite and non-negative (got {w})"
                )));
            }
        }
        Ok(())
    }
}
