mod common;

use common::*;
use hgmetis::checkhgraph::check_hypergraph;
use hgmetis::coarsen::HyperedgeCoarsener;
use hgmetis::hgraphio::{read_hypergraph, write_partition_to};
use hgmetis::options::{GrowMode, Iptype};
use hgmetis::rating::EdgeWeightDivPinWeightSum;
use hgmetis::refine::NullRefiner;
use hgmetis::{khmetis, stat, Ctrl, Error};

#[test]
fn bisects_seven_nodes() {
    let mut hg = read_hypergraph(hypergraph_path("seven.hgr"), 2).unwrap();
    let mut ctrl = Ctrl::setup(&hg, 2, 0.03);
    ctrl.iptype = Iptype::Bisection;
    ctrl.grow_mode = GrowMode::Sequential;

    let cut = khmetis::partition(&mut hg, &ctrl).unwrap();
    assert_eq!(cut, 2);

    let mut out = Vec::new();
    write_partition_to(&mut out, &hg).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "0\n0\n0\n1\n1\n0\n1\n");
}

#[test]
fn reads_weighted_input() {
    let hg = read_hypergraph(hypergraph_path("weighted40.hgr"), 3).unwrap();
    assert_eq!(hg.initial_num_nodes(), 40);
    assert_eq!(hg.initial_num_edges(), 60);
    assert_eq!(hg.total_weight(), 75);
    assert_eq!(hg.pins(0), &[9, 25, 3, 4]);
    assert_eq!(hg.edge_weight(0), 1);
    check_hypergraph(&hg);
}

#[test]
fn partitions_weighted_input_with_every_iptype() {
    for (k, iptype) in [(2, Iptype::Bisection), (3, Iptype::KWay), (3, Iptype::RecursiveBisection)] {
        let mut hg = read_hypergraph(hypergraph_path("weighted40.hgr"), k).unwrap();
        let mut ctrl = Ctrl::setup(&hg, k, 0.1);
        ctrl.iptype = iptype;
        ctrl.coarsen_to = 10;
        ctrl.set_max_allowed_node_weight(hg.total_weight());

        let cut = khmetis::partition(&mut hg, &ctrl).unwrap();
        assert_eq!(cut, stat::hyperedge_cut(&hg), "{iptype:?}");
        assert!(hg.nodes().all(|v| (0..k).contains(&hg.part_id(v))));
        let sum: i32 = (0..k).map(|p| hg.part_weight(p)).sum();
        assert_eq!(sum, 75);
        check_hypergraph(&hg);
    }
}

#[test]
fn grid_coarsening_round_trip() {
    let mut hg = read_hypergraph(hypergraph_path("grid16.hgr"), 2).unwrap();
    let original = hg.clone();
    let mut coarsener = HyperedgeCoarsener::<EdgeWeightDivPinWeightSum>::new(&hg, 8);
    coarsener.coarsen(&mut hg, 16);
    assert!(hg.current_num_nodes() < 256);
    assert!(hg.nodes().all(|v| hg.node_weight(v) <= 8));

    let nodes: Vec<u32> = hg.nodes().collect();
    for v in nodes {
        hg.set_node_part(v, (v % 2) as i32);
    }
    hg.initialize_num_cut_hyperedges();
    coarsener.uncoarsen(&mut hg, &mut NullRefiner);
    assert!(hgmetis::checkhgraph::verify_equivalence_without_partition_info(&hg, &original));
    check_hypergraph(&hg);
}

#[test]
fn invalid_k_is_an_error() {
    for k in [0, 8, 2_000_000_000] {
        assert!(matches!(
            read_hypergraph(hypergraph_path("seven.hgr"), k),
            Err(Error::InvalidConfig(_))
        ));
    }

    let mut hg = read_hypergraph(hypergraph_path("seven.hgr"), 4).unwrap();
    let mut ctrl = Ctrl::setup(&hg, 4, 0.03);
    ctrl.iptype = Iptype::Bisection;
    assert!(matches!(khmetis::partition(&mut hg, &ctrl), Err(Error::InvalidConfig(_))));
}
