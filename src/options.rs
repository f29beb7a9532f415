//! Run parameters.
//!
//! `Ctrl::setup` fills every default and derived value from the hypergraph. All fields are public
//! so callers can override them, after which `Ctrl::validate` checks the combination.

use crate::defs::*;
use crate::error::{Error, Result};
use crate::hypergraph::Hypergraph;
use crate::util::ceil_div;

/// Rating policy used by the coarsener
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ctype {
    /// w(e) / product of pin weights
    #[default]
    EdgeWeightDivMultPinWeight,
    /// w(e) / sum of pin weights
    EdgeWeightDivPinWeightSum,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Iptype {
    /// one greedy 2-way growth, `k` must be 2
    Bisection,
    /// all `k` parts grown directly
    KWay,
    #[default]
    RecursiveBisection,
}

/// Queue discipline of greedy growing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowMode {
    /// each part is grown to its bound before the next one starts
    Sequential,
    /// every step takes the best move over all parts
    #[default]
    Global,
    /// parts take turns
    RoundRobin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartType {
    #[default]
    Bfs,
    Random,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GainType {
    #[default]
    Fm,
    MaxNet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rtype {
    None,
    #[default]
    Greedy,
}

#[derive(Debug, Clone)]
pub struct Ctrl {
    pub k: PartitionId,
    pub epsilon: f64,
    pub seed: u64,
    pub dbglvl: u32,

    pub ctype: Ctype,
    /// coarsening stops at this many nodes
    pub coarsen_to: usize,
    pub max_allowed_node_weight: HypernodeWeight,

    pub iptype: Iptype,
    pub grow_mode: GrowMode,
    pub start_type: StartType,
    pub gain_type: GainType,
    /// part that counts as "not yet claimed" during growing, `INVALID_PART` for none
    pub unassigned_part: PartitionId,
    pub upper_allowed_partition_weight: Vec<HypernodeWeight>,

    pub rtype: Rtype,
}

impl Ctrl {
    pub fn setup(hg: &Hypergraph, k: PartitionId, epsilon: f64) -> Self {
        let mut ctrl = Self {
            k,
            epsilon,
            seed: 0,
            dbglvl: 0,
            ctype: Ctype::default(),
            coarsen_to: COARSEN_TO_PER_PART * k.max(1) as usize,
            max_allowed_node_weight: 0,
            iptype: Iptype::default(),
            grow_mode: GrowMode::default(),
            start_type: StartType::default(),
            gain_type: GainType::default(),
            unassigned_part: INVALID_PART,
            upper_allowed_partition_weight: Vec::new(),
            rtype: Rtype::default(),
        };
        ctrl.set_max_allowed_node_weight(hg.total_weight());
        ctrl.set_upper_bounds(hg.total_weight());
        ctrl
    }

    /// `⌈3.25 · W / coarsen_to⌉`
    pub fn set_max_allowed_node_weight(&mut self, total_weight: HypernodeWeight) {
        let avg = total_weight as f64 / self.coarsen_to.max(1) as f64;
        self.max_allowed_node_weight = ((MAX_NODE_WEIGHT_FACTOR * avg).ceil() as HypernodeWeight).max(1);
    }

    /// `(1 + ε) · ⌈W / k⌉` for every part
    pub fn set_upper_bounds(&mut self, total_weight: HypernodeWeight) {
        let k = self.k.max(1);
        let avg = ceil_div(total_weight as i64, k as i64) as f64;
        let bound = ((1.0 + self.epsilon) * avg).floor() as HypernodeWeight;
        self.upper_allowed_partition_weight = vec![bound; k as usize];
    }

    pub fn validate(&self, hg: &Hypergraph) -> Result<()> {
        if self.k < 1 {
            return Err(Error::InvalidConfig(format!("k must be positive, got {}", self.k)));
        }
        if self.k != hg.k() {
            return Err(Error::InvalidConfig(format!(
                "hypergraph was built for {} parts, ctrl asks for {}",
                hg.k(),
                self.k
            )));
        }
        if self.k as usize > hg.current_num_nodes() {
            return Err(Error::InvalidConfig(format!(
                "{} parts requested for {} nodes",
                self.k,
                hg.current_num_nodes()
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be a nonnegative number, got {}",
                self.epsilon
            )));
        }
        if self.iptype == Iptype::Bisection && self.k != 2 {
            return Err(Error::InvalidConfig(format!(
                "bisection initial partitioning needs k = 2, got {}",
                self.k
            )));
        }
        if self.coarsen_to < self.k as usize {
            return Err(Error::InvalidConfig(format!(
                "cannot coarsen to {} nodes with {} parts",
                self.coarsen_to, self.k
            )));
        }
        if self.max_allowed_node_weight < 1 {
            return Err(Error::InvalidConfig(
                "max_allowed_node_weight must be positive".to_string(),
            ));
        }
        if self.upper_allowed_partition_weight.len() != self.k as usize {
            return Err(Error::InvalidConfig(format!(
                "{} part upper bounds given for {} parts",
                self.upper_allowed_partition_weight.len(),
                self.k
            )));
        }
        let capacity: i64 = self
            .upper_allowed_partition_weight
            .iter()
            .map(|&w| w as i64)
            .sum();
        if capacity < hg.total_weight() as i64 {
            return Err(Error::InvalidConfig(format!(
                "part upper bounds add up to {capacity}, less than the total weight {}",
                hg.total_weight()
            )));
        }
        if self.unassigned_part != INVALID_PART
            && !(0..self.k).contains(&self.unassigned_part)
        {
            return Err(Error::InvalidConfig(format!(
                "unassigned part {} out of range",
                self.unassigned_part
            )));
        }
        Ok(())
    }

    pub fn print(&self) {
        println!(" Runtime parameters:");
        println!("   Number of parts: {}", self.k);
        println!("   Imbalance: {:.3}", self.epsilon);
        println!("   Coarsening type: {:?}", self.ctype);
        println!("   Coarsen to: {}", self.coarsen_to);
        println!("   Max allowed node weight: {}", self.max_allowed_node_weight);
        println!("   Initial partitioning type: {:?}", self.iptype);
        println!("   Grow mode: {:?}", self.grow_mode);
        println!("   Start nodes: {:?}", self.start_type);
        println!("   Gain type: {:?}", self.gain_type);
        println!("   Refinement type: {:?}", self.rtype);
        println!("   Random number seed: {}", self.seed);
        print!("   Part upper bounds:");
        for (i, w) in self.upper_allowed_partition_weight.iter().enumerate() {
            print!("{}[{i}]={w}", if i % 8 == 0 && i > 0 { "\n     " } else { " " });
        }
        println!();
    }
}
