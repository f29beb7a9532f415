//! Consistency checks for hypergraphs.

use crate::defs::*;
use crate::hypergraph::Hypergraph;

/// Checks that a hypergraph is consistent:
/// - pins of enabled hyperedges are enabled, distinct, and list the hyperedge as incident
/// - incident hyperedges of enabled nodes are enabled and contain the node
/// - the node, hyperedge and pin counters match
/// - part weights, part sizes, pin counts per part and the cut count match a recount
///
/// Panics on the first violation. Returns true so it can sit inside `debug_assert!`.
pub fn check_hypergraph(hg: &Hypergraph) -> bool {
    let mut npins = 0;
    let mut mark = vec![false; hg.initial_num_nodes()];

    for e in hg.edges() {
        let pins = hg.pins(e);
        npins += pins.len();
        for &p in pins {
            assert!(hg.node_is_enabled(p), "hyperedge {e} has disabled pin {p}");
            assert!(!mark[p as usize], "hyperedge {e} lists pin {p} twice");
            mark[p as usize] = true;
            assert!(
                hg.incident_edges(p).contains(&e),
                "pin {p} does not list hyperedge {e}"
            );
        }
        for &p in pins {
            mark[p as usize] = false;
        }
    }

    for v in hg.nodes() {
        for &e in hg.incident_edges(v) {
            assert!(hg.edge_is_enabled(e), "node {v} lists disabled hyperedge {e}");
            assert!(hg.pins(e).contains(&v), "hyperedge {e} does not contain node {v}");
        }
    }

    assert_eq!(hg.nodes().count(), hg.current_num_nodes(), "node count");
    assert_eq!(hg.edges().count(), hg.current_num_edges(), "hyperedge count");
    assert_eq!(npins, hg.current_num_pins(), "pin count");

    let k = hg.k();
    let mut pwgts = vec![0; k as usize];
    let mut psizes = vec![0; k as usize];
    for v in hg.nodes() {
        let p = hg.part_id(v);
        if p != INVALID_PART {
            pwgts[p as usize] += hg.node_weight(v);
            psizes[p as usize] += 1;
        }
    }
    for p in 0..k {
        assert_eq!(hg.part_weight(p), pwgts[p as usize], "weight of part {p}");
        assert_eq!(hg.part_size(p), psizes[p as usize], "size of part {p}");
    }

    let mut ncut = 0;
    for e in hg.edges() {
        let mut counts = vec![0; k as usize];
        for &pin in hg.pins(e) {
            let p = hg.part_id(pin);
            if p != INVALID_PART {
                counts[p as usize] += 1;
            }
        }
        for p in 0..k {
            assert_eq!(
                hg.pin_count_in_part(e, p),
                counts[p as usize],
                "pins of hyperedge {e} in part {p}"
            );
        }
        if counts.iter().filter(|&&c| c > 0).count() > 1 {
            ncut += 1;
        }
    }
    assert_eq!(hg.num_cut_hyperedges(), ncut, "cut hyperedges");

    true
}

/// True if both hypergraphs have the same enabled nodes and hyperedges with the same weights,
/// the same pin sets and the same incidence sets. Part assignments are ignored.
pub fn verify_equivalence_without_partition_info(a: &Hypergraph, b: &Hypergraph) -> bool {
    if a.initial_num_nodes() != b.initial_num_nodes()
        || a.initial_num_edges() != b.initial_num_edges()
        || a.current_num_nodes() != b.current_num_nodes()
        || a.current_num_edges() != b.current_num_edges()
        || a.current_num_pins() != b.current_num_pins()
    {
        return false;
    }

    let sorted = |s: &[u32]| {
        let mut s = s.to_vec();
        s.sort_unstable();
        s
    };

    for v in 0..a.initial_num_nodes() as HypernodeId {
        if a.node_is_enabled(v) != b.node_is_enabled(v) {
            return false;
        }
        if !a.node_is_enabled(v) {
            continue;
        }
        if a.node_weight(v) != b.node_weight(v)
            || sorted(a.incident_edges(v)) != sorted(b.incident_edges(v))
        {
            return false;
        }
    }

    for e in 0..a.initial_num_edges() as HyperedgeId {
        if a.edge_is_enabled(e) != b.edge_is_enabled(e) {
            return false;
        }
        if !a.edge_is_enabled(e) {
            continue;
        }
        if a.edge_weight(e) != b.edge_weight(e) || sorted(a.pins(e)) != sorted(b.pins(e)) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;

    fn small() -> Hypergraph {
        Hypergraph::new(4, &[0, 3, 5], &[0, 1, 2, 2, 3], 2)
    }

    #[test]
    fn fresh_hypergraph_is_consistent() {
        let mut hg = small();
        assert!(check_hypergraph(&hg));
        for v in 0..4 {
            hg.set_node_part(v, (v / 2) as PartitionId);
        }
        assert!(check_hypergraph(&hg));
        assert_eq!(hg.num_cut_hyperedges(), 1);
    }

    #[test]
    fn equivalence_ignores_parts_but_not_weights() {
        let a = small();
        let mut b = small();
        b.set_node_part(0, 1);
        assert!(verify_equivalence_without_partition_info(&a, &b));
        b.set_edge_weight(1, 3);
        assert!(!verify_equivalence_without_partition_info(&a, &b));
    }

    #[test]
    fn equivalence_sees_contraction() {
        let a = small();
        let mut b = small();
        b.contract(2, 3, &mut Vec::new());
        assert!(!verify_equivalence_without_partition_info(&a, &b));
    }
}
