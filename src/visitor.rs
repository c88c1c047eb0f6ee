//! Visitors applied to every right node a walker lands on during a left-to-right step.
//!
//! Visitors are monomorphized into the step loop; there is no dynamic dispatch per walker.

use crate::state::NodeVisit;
use crate::NodeId;

pub trait NodeVisitor {
    /// Record one walker moving from `source` (left) to `destination` (right).
    ///
    /// `record` is the destination's entry in the visit table. Returns the
    /// destination's visit count after the update.
    fn visit(&self, source: NodeId, destination: NodeId, record: &mut NodeVisit) -> u64;
}

/// Counts visits and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCounter;

impl NodeVisitor for PlainCounter {
    #[inline]
    fn visit(&self, _source: NodeId, _destination: NodeId, record: &mut NodeVisit) -> u64 {
        record.visits += 1;
        record.visits
    }
}

/// Counts visits and appends the originating left node to the destination's social proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocialProofRecorder {
    /// Entries per right node beyond which sources are no longer appended.
    pub max_social_proof_size: Option<usize>,
}

impl SocialProofRecorder {
    pub fn new(max_social_proof_size: Option<usize>) -> Self {
        Self { max_social_proof_size }
    }
}

impl NodeVisitor for SocialProofRecorder {
    #[inline]
    fn visit(&self, source: NodeId, _destination: NodeId, record: &mut NodeVisit) -> u64 {
        record.visits += 1;
        let full = self
            .max_social_proof_size
            .is_some_and(|cap| record.social_proof.len() >= cap);
        if !full {
            record.social_proof.push(source);
        }
        record.visits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_counter_leaves_social_proof_alone() {
        let mut rec = NodeVisit::default();
        assert_eq!(PlainCounter.visit(1, 10, &mut rec), 1);
        assert_eq!(PlainCounter.visit(2, 10, &mut rec), 2);
        assert!(rec.social_proof.is_empty());
    }

    #[test]
    fn recorder_appends_sources_in_order() {
        let mut rec = NodeVisit { visits: 5, ..Default::default() };
        let v = SocialProofRecorder::new(None);
        v.visit(3, 10, &mut rec);
        v.visit(1, 10, &mut rec);
        assert_eq!(v.visit(3, 10, &mut rec), 8);
        assert_eq!(rec.social_proof.as_slice(), &[3, 1, 3]);
    }

    #[test]
    fn recorder_respects_cap_but_keeps_counting() {
        let mut rec = NodeVisit::default();
        let v = SocialProofRecorder::new(Some(2));
        for src in 0..5 {
            v.visit(src, 10, &mut rec);
        }
        assert_eq!(rec.visits, 5);
        assert_eq!(rec.social_proof.as_slice(), &[0, 1]);
    }

    #[test]
    fn counters_run_past_u32() {
        let start = u64::from(u32::MAX);
        let mut rec = NodeVisit { visits: start, ..Default::default() };
        assert_eq!(PlainCounter.visit(1, 10, &mut rec), start + 1);
        assert_eq!(SocialProofRecorder::new(Some(1)).visit(1, 10, &mut rec), start + 2);
        assert_eq!(rec.social_proof.as_slice(), &[1]);
    }
}
