//! The multilevel driver: coarsen, partition the coarsest hypergraph, then uncoarsen with
//! refinement after every step.

use std::time::{Duration, Instant};

use fastrand::Rng;

use crate::checkhgraph::check_hypergraph;
use crate::coarsen::HyperedgeCoarsener;
use crate::defs::*;
use crate::error::Result;
use crate::gain::FmGain;
use crate::hypergraph::Hypergraph;
use crate::ifset;
use crate::initpart::init_partition;
use crate::options::{Ctrl, Ctype, Rtype};
use crate::rating::{EdgeWeightDivMultPinWeight, EdgeWeightDivPinWeightSum, RatingPolicy};
use crate::refine::{GreedyRefiner, NullRefiner, Refiner};
use crate::stat::{self, Stats};

/// Partitions `hg` into `ctrl.k` parts and returns the weight of the cut hyperedges. The
/// partition is left in `hg`.
pub fn partition(hg: &mut Hypergraph, ctrl: &Ctrl) -> Result<HyperedgeWeight> {
    let mut stats = Stats::new();
    let cut = partition_with_stats(hg, ctrl, &mut stats)?;
    ifset!(ctrl.dbglvl, DBG_INFO, print!("{}", stats.to_console_string()));
    Ok(cut)
}

/// Like `partition`, recording sizes, cuts and phase times in `stats`.
pub fn partition_with_stats(
    hg: &mut Hypergraph,
    ctrl: &Ctrl,
    stats: &mut Stats,
) -> Result<HyperedgeWeight> {
    ctrl.validate(hg)?;
    ifset!(ctrl.dbglvl, DBG_INFO, ctrl.print());

    let cut = match ctrl.ctype {
        Ctype::EdgeWeightDivMultPinWeight => {
            multilevel::<EdgeWeightDivMultPinWeight>(hg, ctrl, stats)
        }
        Ctype::EdgeWeightDivPinWeightSum => multilevel::<EdgeWeightDivPinWeightSum>(hg, ctrl, stats),
    };
    Ok(cut)
}

fn multilevel<R: RatingPolicy>(hg: &mut Hypergraph, ctrl: &Ctrl, stats: &mut Stats) -> HyperedgeWeight {
    let total_timer = Instant::now();
    let mut rng = Rng::with_seed(ctrl.seed);

    stats.add("numHNs", 0, hg.current_num_nodes() as f64);
    stats.add("numHEs", 0, hg.current_num_edges() as f64);
    stats.add("numPins", 0, hg.current_num_pins() as f64);

    let timer = Instant::now();
    let mut coarsener = HyperedgeCoarsener::<R>::from_ctrl(hg, ctrl);
    coarsener.coarsen(hg, ctrl.coarsen_to);
    let coarsen_time = timer.elapsed();

    stats.add("coarseHNs", 0, hg.current_num_nodes() as f64);
    stats.add("coarseHEs", 0, hg.current_num_edges() as f64);
    stats.add("contractions", 0, coarsener.num_mementos() as f64);
    ifset!(
        ctrl.dbglvl,
        DBG_INFO,
        println!(
            "Coarsened to {} nodes, {} hyperedges in {} steps",
            hg.current_num_nodes(),
            hg.current_num_edges(),
            coarsener.history().len()
        )
    );

    let timer = Instant::now();
    init_partition(hg, ctrl, &mut rng);
    let initpart_time = timer.elapsed();
    stats.add("initialCut", 0, stat::hyperedge_cut(hg) as f64);

    let timer = Instant::now();
    let mut refiner = build_refiner(hg, ctrl);
    refiner.initialize(hg);
    coarsener.uncoarsen(hg, refiner.as_mut());
    let uncoarsen_time = timer.elapsed();

    debug_assert!(check_hypergraph(hg));

    let cut = stat::hyperedge_cut(hg);
    stats.add("cut", 0, cut as f64);
    stats.add("km1", 0, stat::km1(hg) as f64);
    stats.add("imbalance", 0, stat::imbalance(hg));
    stats.add("coarseningTime", 0, coarsen_time.as_secs_f64());
    stats.add("initialPartitionTime", 0, initpart_time.as_secs_f64());
    stats.add("uncoarseningTime", 0, uncoarsen_time.as_secs_f64());
    stats.add("totalTime", 0, total_timer.elapsed().as_secs_f64());

    ifset!(
        ctrl.dbglvl,
        DBG_TIME,
        print_timers(total_timer.elapsed(), coarsen_time, initpart_time, uncoarsen_time)
    );
    ifset!(ctrl.dbglvl, DBG_INFO, stat::print_partition_info(hg));

    cut
}

/// Refinement always moves by cut gain, `ctrl.gain_type` only selects the growing gain.
fn build_refiner(hg: &Hypergraph, ctrl: &Ctrl) -> Box<dyn Refiner> {
    match ctrl.rtype {
        Rtype::None => Box::new(NullRefiner),
        Rtype::Greedy => Box::new(GreedyRefiner::<FmGain>::new(hg, ctrl)),
    }
}

fn print_timers(total: Duration, coarsen: Duration, initpart: Duration, uncoarsen: Duration) {
    print!("\nTiming Information -------------------------------------------------");
    print!("\n Multilevel: \t\t {:7.3}", total.as_secs_f64());
    print!("\n     Coarsening: \t\t {:7.3}", coarsen.as_secs_f64());
    print!("\n     Initial Partition: \t {:7.3}", initpart.as_secs_f64());
    print!("\n     Uncoarsening: \t\t {:7.3}", uncoarsen.as_secs_f64());
    print!("\n********************************************************************\n");
}
