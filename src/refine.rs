//! Refiners called by the coarsener after every uncontraction batch.

use crate::defs::*;
use crate::gain::GainComputation;
use crate::gainpq::GainQueues;
use crate::hypergraph::Hypergraph;
use crate::ifset;
use crate::options::Ctrl;

pub trait Refiner {
    /// called once before the first `refine`, after the initial partition exists
    fn initialize(&mut self, hg: &Hypergraph);

    /// Improves the partition around `refinement_nodes`. Returns true if the cut got better.
    fn refine(&mut self, hg: &mut Hypergraph, refinement_nodes: &[HypernodeId]) -> bool;
}

/// Leaves the partition alone
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRefiner;

impl Refiner for NullRefiner {
    fn initialize(&mut self, _hg: &Hypergraph) {}

    fn refine(&mut self, _hg: &mut Hypergraph, _refinement_nodes: &[HypernodeId]) -> bool {
        false
    }
}

/// Greedy k-way refinement over the border nodes among the refinement nodes.
///
/// Every border node is queued for each part it is adjacent to. The globally best move is applied
/// as long as it has positive gain and fits its part, each node moving at most once per call.
/// With a cut gain such as `FmGain` every applied move lowers the cut by its gain.
pub struct GreedyRefiner<G: GainComputation> {
    queues: GainQueues<G>,
    upper: Vec<HypernodeWeight>,
    enabled: Vec<bool>,
    adjacent: Vec<bool>,
    dbglvl: u32,
}

impl<G: GainComputation> GreedyRefiner<G> {
    pub fn new(hg: &Hypergraph, ctrl: &Ctrl) -> Self {
        Self {
            queues: GainQueues::new(hg, INVALID_PART),
            upper: ctrl.upper_allowed_partition_weight.clone(),
            enabled: vec![true; hg.k() as usize],
            adjacent: vec![false; hg.k() as usize],
            dbglvl: ctrl.dbglvl,
        }
    }
}

impl<G: GainComputation> Refiner for GreedyRefiner<G> {
    fn initialize(&mut self, _hg: &Hypergraph) {
        self.queues.clear();
    }

    fn refine(&mut self, hg: &mut Hypergraph, refinement_nodes: &[HypernodeId]) -> bool {
        self.queues.clear();

        for &v in refinement_nodes {
            let from = hg.part_id(v);
            self.adjacent.fill(false);
            for &e in hg.incident_edges(v) {
                if hg.connectivity(e) < 2 {
                    continue;
                }
                for p in 0..hg.k() {
                    if p != from && hg.pin_count_in_part(e, p) > 0 {
                        self.adjacent[p as usize] = true;
                    }
                }
            }
            for p in 0..hg.k() {
                if self.adjacent[p as usize] {
                    self.queues.insert_node_into_pq(hg, v, p, None);
                }
            }
        }

        let mut total_gain = 0;
        let mut nmoves = 0;
        while let Some(mv) = self.queues.global_max_gain_move(hg, &self.enabled, &self.upper) {
            if mv.gain <= 0 {
                break;
            }
            let from = hg.part_id(mv.node);
            hg.change_node_part(mv.node, from, mv.part);
            self.queues
                .insert_and_update_nodes_after_move(hg, mv.node, from, mv.part, false);
            total_gain += mv.gain;
            nmoves += 1;

            ifset!(
                self.dbglvl,
                DBG_MOVEINFO,
                println!(
                    "\t moving {:6} from {:3} to {:3}, gain {:4}",
                    mv.node, from, mv.part, mv.gain
                )
            );
        }
        self.queues.clear();

        ifset!(
            self.dbglvl,
            DBG_REFINE,
            println!(
                "\t greedy refinement: {} border candidates, {} moves, gain {}",
                refinement_nodes.len(),
                nmoves,
                total_gain
            )
        );

        total_gain > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::checkhgraph::check_hypergraph;
    use crate::gain::FmGain;
    use crate::stat;

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

    fn refiner(hg: &Hypergraph, upper: Vec<HypernodeWeight>) -> GreedyRefiner<FmGain> {
        let mut ctrl = Ctrl::setup(hg, 2, 0.0);
        ctrl.upper_allowed_partition_weight = upper;
        GreedyRefiner::new(hg, &ctrl)
    }

    #[test]
    fn applies_positive_move() {
        let mut hg = seven_nodes();
        let mut r = refiner(&hg, vec![7, 7]);
        r.initialize(&hg);
        assert!(r.refine(&mut hg, &[0, 1, 2, 3, 4, 5, 6]));
        assert_eq!(hg.part_id(0), 1);
        assert_eq!(hg.num_cut_hyperedges(), 0);
        check_hypergraph(&hg);
    }

    #[test]
    fn respects_upper_bounds() {
        let mut hg = seven_nodes();
        let mut r = refiner(&hg, vec![7, 6]);
        assert!(!r.refine(&mut hg, &[0, 1, 2, 3, 4, 5, 6]));
        assert_eq!(hg.part_id(0), 0);
        assert_eq!(hg.num_cut_hyperedges(), 2);
    }

    #[test]
    fn ignores_nodes_outside_the_refinement_set() {
        let mut hg = seven_nodes();
        let mut r = refiner(&hg, vec![7, 7]);
        assert!(!r.refine(&mut hg, &[5, 6]));
        assert_eq!(hg.part_id(0), 0);
    }

    #[test]
    fn improvement_matches_the_cut_change() {
        let mut rng = fastrand::Rng::with_seed(21);
        let mut hg = crate::tests::random_hypergraph(&mut rng, 200, 300, 2);
        for v in 0..200 {
            hg.set_node_part(v, (v % 2) as PartitionId);
        }
        hg.initialize_num_cut_hyperedges();
        let before = stat::hyperedge_cut(&hg);

        let mut r = refiner(&hg, vec![110, 110]);
        r.initialize(&hg);
        let nodes: Vec<HypernodeId> = hg.nodes().collect();
        let improved = r.refine(&mut hg, &nodes);

        let after = stat::hyperedge_cut(&hg);
        assert!(after <= before);
        assert_eq!(improved, after < before);
        assert!((0..2).all(|p| hg.part_weight(p) <= 110));
        check_hypergraph(&hg);
    }

    #[test]
    fn null_refiner_keeps_partition() {
        let mut hg = seven_nodes();
        assert!(!NullRefiner.refine(&mut hg, &[0, 2]));
        assert_eq!(hg.num_cut_hyperedges(), 2);
    }
}
