//! Gain computation policies.
//!
//! A policy scores one hyperedge for one move: moving a pin of a hyperedge of `size` pins from a
//! part holding `pins_in_from` of them to a part holding `pins_in_to`. The gain of a move is the
//! sum over the incident hyperedges, and the change a neighbor's move causes is the difference of
//! the per-edge score before and after, so both exact and delta updates use the same formula.

use crate::defs::*;
use crate::hypergraph::Hypergraph;

pub trait GainComputation {
    fn edge_gain(size: usize, weight: HyperedgeWeight, pins_in_from: u32, pins_in_to: u32) -> Gain;

    /// gain of moving `v` from its current part (possibly `INVALID_PART`) to `to`
    fn gain(hg: &Hypergraph, v: HypernodeId, to: PartitionId) -> Gain {
        let from = hg.part_id(v);
        hg.incident_edges(v)
            .iter()
            .map(|&e| {
                Self::edge_gain(
                    hg.edge_size(e),
                    hg.edge_weight(e),
                    hg.pin_count_in_part(e, from),
                    hg.pin_count_in_part(e, to),
                )
            })
            .sum()
    }

    /// Change in the gain of moving pin `v` of `e` to `to` that was caused by another pin of `e`
    /// having just moved from `moved_from` to `moved_to`.
    fn delta(
        hg: &Hypergraph,
        e: HyperedgeId,
        v: HypernodeId,
        to: PartitionId,
        moved_from: PartitionId,
        moved_to: PartitionId,
    ) -> Gain {
        let from = hg.part_id(v);
        let size = hg.edge_size(e);
        let weight = hg.edge_weight(e);

        let now = |p: PartitionId| hg.pin_count_in_part(e, p);
        let before = |p: PartitionId| {
            if p == INVALID_PART {
                return 0;
            }
            now(p) + (p == moved_from) as u32 - (p == moved_to) as u32
        };

        Self::edge_gain(size, weight, now(from), now(to))
            - Self::edge_gain(size, weight, before(from), before(to))
    }
}

/// Cut gain: moving the last outside pin into a part uncuts the hyperedge, moving a pin out of a
/// part holding all of them cuts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FmGain;

impl GainComputation for FmGain {
    fn edge_gain(size: usize, weight: HyperedgeWeight, pins_in_from: u32, pins_in_to: u32) -> Gain {
        let mut gain = 0;
        if pins_in_to as usize + 1 == size {
            gain += weight;
        }
        if pins_in_from as usize == size {
            gain -= weight;
        }
        gain
    }
}

/// Rewards every incident hyperedge that already reaches the target part.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxNetGain;

impl GainComputation for MaxNetGain {
    fn edge_gain(_size: usize, weight: HyperedgeWeight, _pins_in_from: u32, pins_in_to: u32) -> Gain {
        if pins_in_to > 0 {
            weight
        } else {
            0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// {0,2} {0,1,3,4} {3,4,6} {2,5,6} with node 0 in part 0 and the rest in part 1
    fn seven_nodes() -> Hypergraph {
        let mut hg = Hypergraph::new(
            7,
            &[0, 2, 6, 9, 12],
            &[0, 2, 0, 1, 3, 4, 3, 4, 6, 2, 5, 6],
            2,
        );
        for v in 0..7 {
            hg.set_node_part(v, if v == 0 { 0 } else { 1 });
        }
        hg
    }

    #[test]
    fn fm_gains() {
        let hg = seven_nodes();
        assert_eq!(FmGain::gain(&hg, 0, 1), 2);
        assert_eq!(FmGain::gain(&hg, 2, 0), 0);
        assert_eq!(FmGain::gain(&hg, 4, 0), -1);
        assert_eq!(FmGain::gain(&hg, 6, 0), -2);
    }

    #[test]
    fn max_net_gains() {
        let hg = seven_nodes();
        assert_eq!(MaxNetGain::gain(&hg, 0, 1), 2);
        assert_eq!(MaxNetGain::gain(&hg, 2, 0), 1);
        assert_eq!(MaxNetGain::gain(&hg, 6, 0), 0);
    }

    #[test]
    fn unassigned_node_only_sees_the_target() {
        let mut hg = Hypergraph::new(3, &[0, 2, 5], &[0, 1, 0, 1, 2], 2);
        hg.set_node_part(0, 0);
        // {0,1} becomes internal, {0,1,2} keeps a pin outside
        assert_eq!(FmGain::gain(&hg, 1, 0), 1);
        assert_eq!(FmGain::gain(&hg, 2, 0), 0);
    }

    #[test]
    fn delta_matches_recomputation() {
        let mut hg = seven_nodes();
        let before_0 = FmGain::gain(&hg, 0, 1);
        let before_6 = FmGain::gain(&hg, 6, 0);

        hg.change_node_part(2, 1, 0);
        assert_eq!(before_0 + FmGain::delta(&hg, 0, 0, 1, 1, 0), FmGain::gain(&hg, 0, 1));
        assert_eq!(before_6 + FmGain::delta(&hg, 3, 6, 0, 1, 0), FmGain::gain(&hg, 6, 0));
        assert_eq!(FmGain::gain(&hg, 0, 1), 0);
        assert_eq!(FmGain::gain(&hg, 6, 0), -1);
    }
}
