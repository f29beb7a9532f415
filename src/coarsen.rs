//! Hyperedge coarsening.
//!
//! Each step takes the best rated hyperedge out of the contraction queue and contracts all of its
//! pins into the lowest-id pin. Hyperedges that shrink to a single pin are removed, hyperedges
//! that end up with the same pin set are merged into the one with the lowest id. Everything needed
//! to undo a step is kept in one `HistoryEntry` that points into flat arenas, so uncoarsening
//! replays the steps in reverse and hands each batch of re-exposed nodes to a refiner.

use std::marker::PhantomData;

use ordered_float::OrderedFloat;

use crate::dal::DirectAccessList;
use crate::defs::*;
use crate::hypergraph::{Hypergraph, Memento, PinChange};
use crate::ifset;
use crate::options::Ctrl;
use crate::pqueue::IndexedPriorityQueue;
use crate::rating::RatingPolicy;
use crate::refine::Refiner;

/// One coarsening step. Each `(begin, size)` pair addresses one of the coarsener's arenas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mementos_begin: usize,
    pub mementos_size: usize,
    pub one_pin_begin: usize,
    pub one_pin_size: usize,
    pub parallel_begin: usize,
    pub parallel_size: usize,
}

/// `removed` was merged into `representative`, which carries both weights until restoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelHyperedge {
    pub representative: HyperedgeId,
    pub removed: HyperedgeId,
}

/// Equal ratings go to the higher hyperedge id
type ContractionKey = (OrderedFloat<f64>, HyperedgeId);

pub struct HyperedgeCoarsener<R: RatingPolicy> {
    max_allowed_node_weight: HypernodeWeight,
    dbglvl: u32,

    pq: IndexedPriorityQueue<ContractionKey>,

    history: Vec<HistoryEntry>,
    mementos: Vec<Memento>,
    changes: Vec<PinChange>,
    one_pin_hes: Vec<HyperedgeId>,
    parallel_hes: Vec<ParallelHyperedge>,

    refinement_nodes: DirectAccessList,
    _rating: PhantomData<R>,
}

impl<R: RatingPolicy> HyperedgeCoarsener<R> {
    pub fn new(hg: &Hypergraph, max_allowed_node_weight: HypernodeWeight) -> Self {
        Self {
            max_allowed_node_weight,
            dbglvl: 0,
            pq: IndexedPriorityQueue::new(hg.initial_num_edges()),
            history: Vec::new(),
            mementos: Vec::with_capacity(hg.initial_num_nodes()),
            changes: Vec::new(),
            one_pin_hes: Vec::new(),
            parallel_hes: Vec::new(),
            refinement_nodes: DirectAccessList::new(hg.initial_num_nodes()),
            _rating: PhantomData,
        }
    }

    pub fn from_ctrl(hg: &Hypergraph, ctrl: &Ctrl) -> Self {
        let mut coarsener = Self::new(hg, ctrl.max_allowed_node_weight);
        coarsener.dbglvl = ctrl.dbglvl;
        coarsener
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn num_mementos(&self) -> usize {
        self.mementos.len()
    }

    /// true if `e` is waiting in the contraction queue
    pub fn is_queued(&self, e: HyperedgeId) -> bool {
        self.pq.contains(e)
    }

    /// the rating `e` is queued with
    pub fn queued_rating(&self, e: HyperedgeId) -> Option<f64> {
        self.pq.key(e).map(|(r, _)| r.into_inner())
    }

    /// Rebuilds the contraction queue from the current state. Hyperedges without a valid rating
    /// are left out.
    pub fn rate_all_hyperedges(&mut self, hg: &Hypergraph) {
        self.pq.reset();
        for e in hg.edges() {
            let rating = R::rate(hg, e, self.max_allowed_node_weight);
            if rating.valid {
                self.pq.insert(e, (OrderedFloat(rating.value), e));
            }
        }
    }

    /// Contracts hyperedges until at most `limit` nodes are left or the queue runs dry. Running
    /// dry before reaching `limit` is not an error.
    pub fn coarsen(&mut self, hg: &mut Hypergraph, limit: usize) {
        self.rate_all_hyperedges(hg);

        while hg.current_num_nodes() > limit {
            let Some(e) = self.pq.get_top() else {
                break;
            };
            let pins = hg.pins(e).to_vec();
            let rep = pins
                .iter()
                .copied()
                .min()
                .expect("queued hyperedges have pins");
            debug_assert!(R::rate(hg, e, self.max_allowed_node_weight).valid);

            let mut entry = HistoryEntry {
                mementos_begin: self.mementos.len(),
                ..Default::default()
            };
            for &v in pins.iter().filter(|&&v| v != rep) {
                let memento = hg.contract(rep, v, &mut self.changes);
                self.mementos.push(memento);
            }
            entry.mementos_size = self.mementos.len() - entry.mementos_begin;

            entry.one_pin_begin = self.one_pin_hes.len();
            self.remove_single_pin_hyperedges(hg, rep);
            entry.one_pin_size = self.one_pin_hes.len() - entry.one_pin_begin;

            entry.parallel_begin = self.parallel_hes.len();
            self.remove_parallel_hyperedges(hg, rep);
            entry.parallel_size = self.parallel_hes.len() - entry.parallel_begin;

            self.history.push(entry);
            self.update_pq(hg, rep);

            ifset!(
                self.dbglvl,
                DBG_COARSEN,
                println!(
                    "contracted hyperedge {e:6} into {rep:6}: nodes {:7} edges {:7} pins {:8} [single {} parallel {}]",
                    hg.current_num_nodes(),
                    hg.current_num_edges(),
                    hg.current_num_pins(),
                    entry.one_pin_size,
                    entry.parallel_size,
                )
            );
        }
    }

    /// Undoes every coarsening step, newest first, calling `refiner` on the nodes each step
    /// exposes. Does nothing when there is no history.
    pub fn uncoarsen<F: Refiner + ?Sized>(&mut self, hg: &mut Hypergraph, refiner: &mut F) {
        while let Some(entry) = self.history.pop() {
            self.restore_parallel_hyperedges(hg, &entry);
            self.restore_single_pin_hyperedges(hg, &entry);
            self.perform_uncontraction(hg, &entry);

            let improved = refiner.refine(hg, self.refinement_nodes.as_slice());
            ifset!(
                self.dbglvl,
                DBG_REFINE,
                println!(
                    "uncontracted {:3} nodes: cut {:6} nodes {:7} improved {}",
                    self.refinement_nodes.len(),
                    hg.num_cut_hyperedges(),
                    hg.current_num_nodes(),
                    improved,
                )
            );

            if entry.mementos_size > 0 {
                self.changes
                    .truncate(self.mementos[entry.mementos_begin].changes_begin);
            }
            self.mementos.truncate(entry.mementos_begin);
            self.one_pin_hes.truncate(entry.one_pin_begin);
            self.parallel_hes.truncate(entry.parallel_begin);
        }
    }

    /// Removes the hyperedges incident to `rep` that only have `rep` left.
    fn remove_single_pin_hyperedges(&mut self, hg: &mut Hypergraph, rep: HypernodeId) {
        let single: Vec<_> = hg
            .incident_edges(rep)
            .iter()
            .copied()
            .filter(|&e| hg.edge_size(e) == 1)
            .collect();
        for e in single {
            hg.remove_edge(e);
            self.pq.delete(e);
            self.one_pin_hes.push(e);
        }
    }

    /// Merges hyperedges incident to `rep` with identical pin sets into the lowest id among them.
    fn remove_parallel_hyperedges(&mut self, hg: &mut Hypergraph, rep: HypernodeId) {
        let mut fingerprints: Vec<(Vec<HypernodeId>, HyperedgeId)> = hg
            .incident_edges(rep)
            .iter()
            .map(|&e| {
                let mut pins = hg.pins(e).to_vec();
                pins.sort_unstable();
                (pins, e)
            })
            .collect();
        fingerprints.sort_unstable();

        let mut i = 0;
        while i < fingerprints.len() {
            let representative = fingerprints[i].1;
            let mut j = i + 1;
            while j < fingerprints.len() && fingerprints[j].0 == fingerprints[i].0 {
                let removed = fingerprints[j].1;
                hg.set_edge_weight(
                    representative,
                    hg.edge_weight(representative) + hg.edge_weight(removed),
                );
                hg.remove_edge(removed);
                self.pq.delete(removed);
                self.parallel_hes.push(ParallelHyperedge {
                    representative,
                    removed,
                });
                j += 1;
            }
            i = j;
        }
    }

    /// Re-rates the hyperedges incident to `rep`. No other rating can have changed.
    fn update_pq(&mut self, hg: &Hypergraph, rep: HypernodeId) {
        for &e in hg.incident_edges(rep) {
            let rating = R::rate(hg, e, self.max_allowed_node_weight);
            if rating.valid {
                self.pq.push(e, (OrderedFloat(rating.value), e));
            } else {
                self.pq.delete(e);
            }
        }
    }

    fn restore_parallel_hyperedges(&mut self, hg: &mut Hypergraph, entry: &HistoryEntry) {
        let range = entry.parallel_begin..entry.parallel_begin + entry.parallel_size;
        for &ParallelHyperedge {
            representative,
            removed,
        } in self.parallel_hes[range].iter().rev()
        {
            hg.set_edge_weight(
                representative,
                hg.edge_weight(representative) - hg.edge_weight(removed),
            );
            hg.restore_edge(removed);
        }
    }

    pub(crate) fn restore_single_pin_hyperedges(&mut self, hg: &mut Hypergraph, entry: &HistoryEntry) {
        let range = entry.one_pin_begin..entry.one_pin_begin + entry.one_pin_size;
        for &e in self.one_pin_hes[range].iter().rev() {
            hg.restore_edge(e);
        }
    }

    /// Replays the mementos of `entry` backwards and collects every node they touch, each once.
    pub(crate) fn perform_uncontraction(&mut self, hg: &mut Hypergraph, entry: &HistoryEntry) {
        self.refinement_nodes.clear();
        let range = entry.mementos_begin..entry.mementos_begin + entry.mementos_size;
        for memento in self.mementos[range].iter().rev() {
            self.refinement_nodes.insert(memento.u);
            self.refinement_nodes.insert(memento.v);
            hg.uncontract(memento, &self.changes);
        }
    }
}
