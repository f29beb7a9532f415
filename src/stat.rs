//! Partition quality metrics and a run statistics collector.

use std::collections::BTreeMap;
use std::fmt;

use crate::defs::*;
use crate::hypergraph::Hypergraph;
use crate::util::ceil_div;

/// total weight of the cut hyperedges
pub fn hyperedge_cut(hg: &Hypergraph) -> HyperedgeWeight {
    hg.edges()
        .filter(|&e| hg.is_cut(e))
        .map(|e| hg.edge_weight(e))
        .sum()
}

/// connectivity minus one, weighted, summed over the hyperedges
pub fn km1(hg: &Hypergraph) -> HyperedgeWeight {
    hg.edges()
        .map(|e| (hg.connectivity(e).max(1) as HyperedgeWeight - 1) * hg.edge_weight(e))
        .sum()
}

/// `max part weight / ⌈W / k⌉ - 1`
pub fn imbalance(hg: &Hypergraph) -> f64 {
    let avg = ceil_div(hg.total_weight() as i64, hg.k() as i64);
    if avg == 0 {
        return 0.0;
    }
    let max = (0..hg.k()).map(|p| hg.part_weight(p)).max().unwrap_or(0);
    max as f64 / avg as f64 - 1.0
}

/// prints cut, km1 and balance of the current partition
pub fn print_partition_info(hg: &Hypergraph) {
    print!(
        "{}-way Cut: {:5}, km1: {:5}, ",
        hg.k(),
        hyperedge_cut(hg),
        km1(hg)
    );
    println!("\tImbalance: {:5.3}", imbalance(hg));

    print!(" Part weights:");
    for p in 0..hg.k() {
        print!(
            "{}[{p}]={}",
            if p % 8 == 0 && p > 0 { "\n    " } else { " " },
            hg.part_weight(p)
        );
    }
    println!();
}

/// `(vcycle, key) -> value`, rendered in key order. The first value recorded for a key wins.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    stats: BTreeMap<String, f64>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str, vcycle: usize, value: f64) {
        self.stats.entry(format!("{vcycle}{key}")).or_insert(value);
    }

    pub fn get(&self, key: &str, vcycle: usize) -> Option<f64> {
        self.stats.get(&format!("{vcycle}{key}")).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// one `key = value` line per entry
    pub fn to_console_string(&self) -> String {
        self.stats
            .iter()
            .map(|(k, v)| format!("{k} = {v}\n"))
            .collect()
    }
}

/// ` key=value` per entry on one line
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.stats {
            write!(f, " {k}={v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metrics() {
        // {0,1,2} weight 3, {2,3} weight 2, {0,3} weight 1
        let mut hg = Hypergraph::with_weights(4, &[0, 3, 5, 7], &[0, 1, 2, 2, 3, 0, 3], 3, Some(&[3, 2, 1]), None);
        hg.set_node_part(0, 0);
        hg.set_node_part(1, 1);
        hg.set_node_part(2, 2);
        hg.set_node_part(3, 2);
        assert_eq!(hyperedge_cut(&hg), 4);
        assert_eq!(km1(&hg), 2 * 3 + 1);
        // ⌈4 / 3⌉ = 2, heaviest part 2
        assert_eq!(imbalance(&hg), 0.0);
    }

    #[test]
    fn stats_keep_first_value() {
        let mut stats = Stats::new();
        stats.add("cut", 0, 12.0);
        stats.add("cut", 0, 5.0);
        stats.add("nodes", 0, 7.0);
        assert_eq!(stats.get("cut", 0), Some(12.0));
        assert_eq!(stats.to_string(), " 0cut=12 0nodes=7");
        assert_eq!(stats.to_console_string(), "0cut = 12\n0nodes = 7\n");
    }
}
