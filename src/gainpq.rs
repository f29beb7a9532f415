//! Gain priority queues: one addressable max-heap per part, each holding at most one entry per
//! node. The entry of `v` in the queue of part `p` is the gain of moving `v` to `p`.
//!
//! Greedy growing and refinement share this structure. Growing runs with an unassigned part (the
//! part free nodes sit in, or `INVALID_PART`) and pulls newly reached neighbors into the queue of
//! the part that reached them. Refinement runs with `INVALID_PART` and only re-keys existing
//! entries.

use std::cmp::Reverse;
use std::marker::PhantomData;

use crate::dal::DirectAccessList;
use crate::defs::*;
use crate::gain::GainComputation;
use crate::hypergraph::Hypergraph;
use crate::pqueue::IndexedPriorityQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GainMove {
    pub node: HypernodeId,
    pub part: PartitionId,
    pub gain: Gain,
}

/// Equal gains go to the lower node id
type GainKey = (Gain, Reverse<HypernodeId>);

pub struct GainQueues<G: GainComputation> {
    queues: Vec<IndexedPriorityQueue<GainKey>>,
    unassigned_part: PartitionId,
    touched: DirectAccessList,
    _gain: PhantomData<G>,
}

impl<G: GainComputation> GainQueues<G> {
    pub fn new(hg: &Hypergraph, unassigned_part: PartitionId) -> Self {
        let n = hg.initial_num_nodes();
        Self {
            queues: (0..hg.k()).map(|_| IndexedPriorityQueue::new(n)).collect(),
            unassigned_part,
            touched: DirectAccessList::new(n),
            _gain: PhantomData,
        }
    }

    pub fn unassigned_part(&self) -> PartitionId {
        self.unassigned_part
    }

    /// total number of entries over all parts
    pub fn len(&self) -> usize {
        self.queues.iter().map(|q| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.iter().all(|q| q.is_empty())
    }

    pub fn part_len(&self, part: PartitionId) -> usize {
        self.queues[part as usize].len()
    }

    pub fn contains(&self, v: HypernodeId, part: PartitionId) -> bool {
        self.queues[part as usize].contains(v)
    }

    /// queued gain of moving `v` to `part`
    pub fn key(&self, v: HypernodeId, part: PartitionId) -> Option<Gain> {
        self.queues[part as usize].key(v).map(|(g, _)| g)
    }

    pub fn clear(&mut self) {
        for q in self.queues.iter_mut() {
            q.reset();
        }
    }

    /// Queues `v` for `part` with `gain`, or with the computed gain when `gain` is `None`. An
    /// existing entry is re-keyed.
    pub fn insert_node_into_pq(
        &mut self,
        hg: &Hypergraph,
        v: HypernodeId,
        part: PartitionId,
        gain: Option<Gain>,
    ) {
        let gain = gain.unwrap_or_else(|| G::gain(hg, v, part));
        self.queues[part as usize].push(v, (gain, Reverse(v)));
    }

    /// no-op for parts that do not hold `v`
    pub fn delete_node_in_all_queues(&mut self, v: HypernodeId) {
        for q in self.queues.iter_mut() {
            q.delete(v);
        }
    }

    pub fn max_from_partition(&self, part: PartitionId) -> Option<HypernodeId> {
        self.queues[part as usize].see_top_val()
    }

    pub fn max_key_from_partition(&self, part: PartitionId) -> Option<Gain> {
        self.queues[part as usize].see_top_key().map(|(g, _)| g)
    }

    /// Fixes the queues after `moved` went from `from` (possibly `INVALID_PART`) to `to`.
    ///
    /// `moved` leaves every queue. Entries of nodes sharing a hyperedge with `moved` are
    /// recomputed when `exact` is set and shifted by the per-hyperedge delta otherwise. Neighbors
    /// still in the unassigned part are then queued for `to`. No other entry changes.
    pub fn insert_and_update_nodes_after_move(
        &mut self,
        hg: &Hypergraph,
        moved: HypernodeId,
        from: PartitionId,
        to: PartitionId,
        exact: bool,
    ) {
        self.delete_node_in_all_queues(moved);
        self.touched.clear();

        for &e in hg.incident_edges(moved) {
            for &p in hg.pins(e) {
                if p == moved {
                    continue;
                }
                if !exact {
                    for (part, q) in self.queues.iter_mut().enumerate() {
                        if let Some((gain, tie)) = q.key(p) {
                            let d = G::delta(hg, e, p, part as PartitionId, from, to);
                            if d != 0 {
                                q.update(p, (gain + d, tie));
                            }
                        }
                    }
                }
                self.touched.insert(p);
            }
        }

        for i in 0..self.touched.len() {
            let p = self.touched.as_slice()[i];
            if exact {
                for (part, q) in self.queues.iter_mut().enumerate() {
                    if q.contains(p) {
                        q.update(p, (G::gain(hg, p, part as PartitionId), Reverse(p)));
                    }
                }
            }
            if to != self.unassigned_part
                && hg.part_id(p) == self.unassigned_part
                && !self.queues[to as usize].contains(p)
            {
                self.insert_node_into_pq(hg, p, to, None);
            }
        }
    }

    /// Best top entry over the enabled parts that can take their top node without exceeding
    /// `upper`. Ties go to the lower node id, then to the lower part id.
    pub fn global_max_gain_move(
        &self,
        hg: &Hypergraph,
        enabled: &[bool],
        upper: &[HypernodeWeight],
    ) -> Option<GainMove> {
        let mut best: Option<(GainKey, Reverse<PartitionId>)> = None;
        for (part, q) in self.queues.iter().enumerate() {
            if !enabled[part] {
                continue;
            }
            let Some(v) = q.see_top_val() else {
                continue;
            };
            if hg.part_weight(part as PartitionId) + hg.node_weight(v) > upper[part] {
                continue;
            }
            let cand = (q.see_top_key()?, Reverse(part as PartitionId));
            if best.map_or(true, |b| cand > b) {
                best = Some(cand);
            }
        }

        best.map(|((gain, Reverse(node)), Reverse(part))| GainMove { node, part, gain })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gain::FmGain;

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
        hg.initialize_num_cut_hyperedges();
        hg
    }

    fn filled(hg: &Hypergraph, unassigned: PartitionId) -> GainQueues<FmGain> {
        let mut queues = GainQueues::<FmGain>::new(hg, unassigned);
        queues.insert_node_into_pq(hg, 0, 1, None);
        queues.insert_node_into_pq(hg, 2, 0, None);
        queues.insert_node_into_pq(hg, 4, 0, None);
        queues.insert_node_into_pq(hg, 6, 0, None);
        queues
    }

    #[test]
    fn max_gain_after_pushing_some_nodes() {
        let hg = seven_nodes();
        let mut queues = GainQueues::<FmGain>::new(&hg, INVALID_PART);
        queues.insert_node_into_pq(&hg, 2, 0, None);
        queues.insert_node_into_pq(&hg, 4, 0, None);
        queues.insert_node_into_pq(&hg, 6, 0, None);
        assert_eq!(queues.len(), 3);
        assert_eq!(queues.max_from_partition(0), Some(2));
        assert_eq!(queues.max_key_from_partition(0), Some(0));
    }

    #[test]
    fn reinsert_recomputes_gain() {
        let mut hg = seven_nodes();
        let mut queues = GainQueues::<FmGain>::new(&hg, INVALID_PART);
        queues.insert_node_into_pq(&hg, 0, 1, None);
        assert_eq!(queues.max_from_partition(1), Some(0));
        assert_eq!(queues.max_key_from_partition(1), Some(2));
        hg.change_node_part(2, 1, 0);
        queues.insert_node_into_pq(&hg, 0, 1, None);
        assert_eq!(queues.max_from_partition(1), Some(0));
        assert_eq!(queues.max_key_from_partition(1), Some(0));
        assert_eq!(queues.len(), 1);
    }

    #[test]
    fn max_gain_after_delta_updates() {
        let mut hg = seven_nodes();
        let mut queues = filled(&hg, INVALID_PART);

        hg.change_node_part(2, 1, 0);
        queues.insert_and_update_nodes_after_move(&hg, 2, 1, 0, false);
        assert_eq!(queues.key(0, 1), Some(0));
        assert_eq!(queues.key(6, 0), Some(-1));
        // not adjacent to node 2
        assert_eq!(queues.key(4, 0), Some(-1));

        hg.change_node_part(4, 1, 0);
        queues.insert_and_update_nodes_after_move(&hg, 4, 1, 0, false);

        assert_eq!(queues.max_from_partition(0), Some(6));
        assert_eq!(queues.max_key_from_partition(0), Some(0));
        assert_eq!(queues.key(0, 1), Some(-1));
        assert_eq!(queues.len(), 2);
    }

    #[test]
    fn exact_updates_pull_in_unassigned_neighbors() {
        let mut hg = seven_nodes();
        let mut queues = filled(&hg, 1);

        hg.change_node_part(2, 1, 0);
        queues.insert_and_update_nodes_after_move(&hg, 2, 1, 0, true);
        assert!(!queues.contains(2, 0));
        assert_eq!(queues.key(0, 1), Some(0));
        assert_eq!(queues.key(6, 0), Some(-1));
        assert_eq!(queues.key(5, 0), Some(0));
        assert_eq!(queues.len(), 4);
        assert_eq!(queues.max_from_partition(0), Some(5));
    }

    #[test]
    fn global_max_gain_move() {
        let hg = seven_nodes();
        let queues = filled(&hg, 0);
        let best = queues.global_max_gain_move(&hg, &[true, true], &[7, 7]);
        assert_eq!(
            best,
            Some(GainMove {
                node: 0,
                part: 1,
                gain: 2
            })
        );
    }

    #[test]
    fn global_move_respects_upper_bounds() {
        let hg = seven_nodes();
        let queues = filled(&hg, 0);
        // part 1 already weighs 6
        let best = queues.global_max_gain_move(&hg, &[true, true], &[7, 6]);
        assert_eq!(
            best,
            Some(GainMove {
                node: 2,
                part: 0,
                gain: 0
            })
        );
        assert_eq!(queues.global_max_gain_move(&hg, &[true, false], &[1, 7]), None);
    }

    #[test]
    fn deletes_assigned_nodes() {
        let hg = seven_nodes();
        let mut queues = filled(&hg, 0);
        queues.delete_node_in_all_queues(0);
        assert_eq!(queues.len(), 3);
        queues.delete_node_in_all_queues(0);
        assert_eq!(queues.len(), 3);
        assert_eq!(queues.max_from_partition(1), None);
        assert_eq!(queues.max_key_from_partition(1), None);
    }
}
