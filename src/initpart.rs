//! Initial partitioning of the coarsest hypergraph by greedy hypergraph growing.
//!
//! Every grown part starts from one start node and repeatedly claims the free node with the best
//! gain toward it, as long as the node fits under the part's upper bound. Free nodes either sit in
//! a designated unassigned part or carry `INVALID_PART`; in the latter case whatever is left when
//! growing stops goes to the lightest part.

use std::cmp::Reverse;
use std::collections::VecDeque;

use fastrand::Rng;

use crate::defs::*;
use crate::gain::{FmGain, GainComputation, MaxNetGain};
use crate::gainpq::{GainMove, GainQueues};
use crate::hypergraph::Hypergraph;
use crate::ifset;
use crate::options::{Ctrl, GainType, GrowMode, Iptype, StartType};
use crate::stat;
use crate::util::ceil_div;

pub trait StartNodeSelection {
    /// Up to `count` distinct enabled nodes. Fewer only if there are fewer enabled nodes.
    fn start_nodes(hg: &Hypergraph, count: usize, rng: &mut Rng) -> Vec<HypernodeId>;
}

/// Spreads the start nodes out: the first is a node of maximum degree, every further one is the
/// last node reached by a breadth first search from the ones picked so far. A node the search
/// does not reach at all is preferred.
pub struct BfsStartNodes;

impl StartNodeSelection for BfsStartNodes {
    fn start_nodes(hg: &Hypergraph, count: usize, _rng: &mut Rng) -> Vec<HypernodeId> {
        let mut starts = Vec::with_capacity(count);
        if count == 0 {
            return starts;
        }
        let Some(first) = hg.nodes().max_by_key(|&v| (hg.node_degree(v), Reverse(v))) else {
            return starts;
        };
        starts.push(first);

        let mut visited = vec![false; hg.initial_num_nodes()];
        let mut edge_seen = vec![false; hg.initial_num_edges()];
        let mut queue = VecDeque::new();

        while starts.len() < count {
            visited.fill(false);
            edge_seen.fill(false);
            queue.clear();

            for &s in &starts {
                visited[s as usize] = true;
                queue.push_back(s);
            }
            let mut nvisited = starts.len();
            let mut last = None;

            while let Some(v) = queue.pop_front() {
                last = Some(v);
                for &e in hg.incident_edges(v) {
                    if edge_seen[e as usize] {
                        continue;
                    }
                    edge_seen[e as usize] = true;
                    for &p in hg.pins(e) {
                        if !visited[p as usize] {
                            visited[p as usize] = true;
                            nvisited += 1;
                            queue.push_back(p);
                        }
                    }
                }
            }

            let next = if nvisited < hg.current_num_nodes() {
                hg.nodes().find(|&v| !visited[v as usize])
            } else {
                last.filter(|v| !starts.contains(v))
            };
            match next {
                Some(v) => starts.push(v),
                None => break,
            }
        }

        starts
    }
}

/// `count` enabled nodes drawn uniformly without replacement
pub struct RandomStartNodes;

impl StartNodeSelection for RandomStartNodes {
    fn start_nodes(hg: &Hypergraph, count: usize, rng: &mut Rng) -> Vec<HypernodeId> {
        let mut nodes: Vec<HypernodeId> = hg.nodes().collect();
        rng.shuffle(&mut nodes);
        nodes.truncate(count);
        nodes
    }
}

/// Computes the initial partition selected by `ctrl` and initializes the cut counter.
pub fn init_partition(hg: &mut Hypergraph, ctrl: &Ctrl, rng: &mut Rng) {
    match (ctrl.gain_type, ctrl.start_type) {
        (GainType::Fm, StartType::Bfs) => init_partition_with::<FmGain, BfsStartNodes>(hg, ctrl, rng),
        (GainType::Fm, StartType::Random) => {
            init_partition_with::<FmGain, RandomStartNodes>(hg, ctrl, rng)
        }
        (GainType::MaxNet, StartType::Bfs) => {
            init_partition_with::<MaxNetGain, BfsStartNodes>(hg, ctrl, rng)
        }
        (GainType::MaxNet, StartType::Random) => {
            init_partition_with::<MaxNetGain, RandomStartNodes>(hg, ctrl, rng)
        }
    }
    hg.initialize_num_cut_hyperedges();

    ifset!(ctrl.dbglvl, DBG_IPART, {
        print!("Initial partition: ");
        stat::print_partition_info(hg);
    });
}

pub fn init_partition_with<G: GainComputation, S: StartNodeSelection>(
    hg: &mut Hypergraph,
    ctrl: &Ctrl,
    rng: &mut Rng,
) {
    let upper = &ctrl.upper_allowed_partition_weight;
    match ctrl.iptype {
        Iptype::Bisection => bisect::<G, S>(hg, upper, ctrl.grow_mode, rng, ctrl.dbglvl),
        Iptype::KWay => greedy_grow::<G, S>(
            hg,
            ctrl.unassigned_part,
            upper,
            ctrl.grow_mode,
            rng,
            ctrl.dbglvl,
        ),
        Iptype::RecursiveBisection => recursive_bisection::<G, S>(hg, ctrl, rng),
    }
}

/// Two-way growing. Round robin grows both parts from free nodes; the other modes grow part 0
/// out of part 1 until part 0 reaches its bound.
pub fn bisect<G: GainComputation, S: StartNodeSelection>(
    hg: &mut Hypergraph,
    upper: &[HypernodeWeight],
    mode: GrowMode,
    rng: &mut Rng,
    dbglvl: u32,
) {
    assert_eq!(hg.k(), 2, "bisection of a hypergraph with {} parts", hg.k());
    let unassigned = if mode == GrowMode::RoundRobin {
        INVALID_PART
    } else {
        1
    };
    greedy_grow::<G, S>(hg, unassigned, upper, mode, rng, dbglvl);
}

/// Splits the enabled nodes of `hg` into `hg.k()` parts by repeated bisection of compact
/// sub-hypergraphs. Each level gets the same share of the imbalance so that the product of the
/// per-level factors stays within `1 + epsilon`.
pub fn recursive_bisection<G: GainComputation, S: StartNodeSelection>(
    hg: &mut Hypergraph,
    ctrl: &Ctrl,
    rng: &mut Rng,
) {
    let k = hg.k();
    let levels = (k as f64).log2().ceil().max(1.0);
    let epsilon = (1.0 + ctrl.epsilon).powf(1.0 / levels) - 1.0;

    let (mut root, map) = hg.extract(|_| true, 2);
    let parts = split::<G, S>(&mut root, k, epsilon, ctrl.grow_mode, rng, ctrl.dbglvl);

    hg.reset_partitioning();
    for (&v, &p) in map.iter().zip(&parts) {
        hg.set_node_part(v, p);
    }
}

/// part ids in `0..k` for every node of the two-way hypergraph `hg`
fn split<G: GainComputation, S: StartNodeSelection>(
    hg: &mut Hypergraph,
    k: PartitionId,
    epsilon: f64,
    mode: GrowMode,
    rng: &mut Rng,
    dbglvl: u32,
) -> Vec<PartitionId> {
    let n = hg.initial_num_nodes();
    if k == 1 || n == 0 {
        return vec![0; n];
    }
    let k0 = k / 2;
    let k1 = k - k0;

    let total = hg.total_weight() as i64;
    let bound = |kside: PartitionId| {
        ((1.0 + epsilon) * ceil_div(total * kside as i64, k as i64) as f64).floor()
            as HypernodeWeight
    };
    let upper = [bound(k0), bound(k1)];
    bisect::<G, S>(hg, &upper, mode, rng, dbglvl);

    ifset!(
        dbglvl,
        DBG_IPART,
        println!(
            "\t split {n} nodes into {k0}+{k1} parts: weights {} {}",
            hg.part_weight(0),
            hg.part_weight(1)
        )
    );

    let mut parts: Vec<PartitionId> = (0..n as HypernodeId)
        .map(|v| if hg.part_id(v) == 0 { 0 } else { k0 })
        .collect();
    for (side, kside, offset) in [(0, k0, 0), (1, k1, k0)] {
        if kside < 2 {
            continue;
        }
        let (mut sub, map) = hg.extract_part(side, 2);
        let sub_parts = split::<G, S>(&mut sub, kside, epsilon, mode, rng, dbglvl);
        for (&v, &p) in map.iter().zip(&sub_parts) {
            parts[v as usize] = offset + p;
        }
    }
    parts
}

/// Grows every part except `unassigned` from its own start node.
///
/// With a real unassigned part all enabled nodes start there. With `INVALID_PART` they start
/// unassigned and leftovers go to the lightest part at the end.
pub fn greedy_grow<G: GainComputation, S: StartNodeSelection>(
    hg: &mut Hypergraph,
    unassigned: PartitionId,
    upper: &[HypernodeWeight],
    mode: GrowMode,
    rng: &mut Rng,
    dbglvl: u32,
) {
    let k = hg.k();
    let nodes: Vec<HypernodeId> = hg.nodes().collect();

    hg.reset_partitioning();
    if unassigned != INVALID_PART {
        for &v in &nodes {
            hg.set_node_part(v, unassigned);
        }
    }

    let parts: Vec<PartitionId> = (0..k).filter(|&p| p != unassigned).collect();
    let starts = S::start_nodes(hg, parts.len(), rng);

    let mut grower = Grower {
        queues: GainQueues::<G>::new(hg, unassigned),
        enabled: vec![false; k as usize],
        start: vec![HypernodeId::MAX; k as usize],
        upper,
        unassigned,
        reseed_always: unassigned != INVALID_PART,
    };
    for &p in &parts {
        grower.enabled[p as usize] = true;
    }
    for (&p, &s) in parts.iter().zip(&starts) {
        grower.start[p as usize] = s;
        grower.queues.insert_node_into_pq(hg, s, p, None);
    }

    let mut cursor = 0;
    let mut nmoves = 0;
    loop {
        let mv = match mode {
            GrowMode::Sequential => {
                let mut mv = None;
                while cursor < parts.len() {
                    mv = grower.next_move(hg, parts[cursor]);
                    if mv.is_some() {
                        break;
                    }
                    cursor += 1;
                }
                mv
            }
            GrowMode::RoundRobin => {
                let mut mv = None;
                for i in 0..parts.len() {
                    let p = parts[(cursor + i) % parts.len()];
                    if !grower.enabled[p as usize] {
                        continue;
                    }
                    mv = grower.next_move(hg, p);
                    if mv.is_some() {
                        cursor = (cursor + i + 1) % parts.len();
                        break;
                    }
                }
                mv
            }
            GrowMode::Global => {
                for &p in &parts {
                    if grower.enabled[p as usize] {
                        grower.next_move(hg, p);
                    }
                }
                grower
                    .queues
                    .global_max_gain_move(hg, &grower.enabled, upper)
            }
        };
        let Some(mv) = mv else {
            break;
        };

        let from = hg.part_id(mv.node);
        if from == INVALID_PART {
            hg.set_node_part(mv.node, mv.part);
        } else {
            hg.change_node_part(mv.node, from, mv.part);
        }
        grower
            .queues
            .insert_and_update_nodes_after_move(hg, mv.node, from, mv.part, true);
        nmoves += 1;

        ifset!(
            dbglvl,
            DBG_MOVEINFO,
            println!(
                "\t growing part {:3} by {:6}, gain {:4}",
                mv.part, mv.node, mv.gain
            )
        );
    }

    let mut leftovers = 0;
    if unassigned == INVALID_PART {
        for &v in &nodes {
            if hg.part_id(v) != INVALID_PART {
                continue;
            }
            let lightest = (0..k)
                .min_by_key(|&p| (hg.part_weight(p), p))
                .unwrap_or(0);
            hg.set_node_part(v, lightest);
            leftovers += 1;
        }
    }

    ifset!(
        dbglvl,
        DBG_IPART,
        println!("\t grew {k} parts with {nmoves} moves, {leftovers} leftover nodes")
    );
}

struct Grower<'a, G: GainComputation> {
    queues: GainQueues<G>,
    enabled: Vec<bool>,
    start: Vec<HypernodeId>,
    upper: &'a [HypernodeWeight],
    unassigned: PartitionId,
    /// an empty queue is refilled even after the part got its first node
    reseed_always: bool,
}

impl<G: GainComputation> Grower<'_, G> {
    /// The move `part` wants to make next, or `None` after disabling `part` for good.
    fn next_move(&mut self, hg: &Hypergraph, part: PartitionId) -> Option<GainMove> {
        loop {
            match self.queues.max_from_partition(part) {
                None => {
                    if self.reseed_always || hg.part_size(part) == 0 {
                        if let Some(seed) = self.free_node(hg, part) {
                            self.queues.insert_node_into_pq(hg, seed, part, None);
                            continue;
                        }
                    }
                    self.enabled[part as usize] = false;
                    return None;
                }
                Some(v) => {
                    if hg.part_weight(part) + hg.node_weight(v) > self.upper[part as usize] {
                        self.enabled[part as usize] = false;
                        return None;
                    }
                    let gain = self.queues.max_key_from_partition(part)?;
                    return Some(GainMove {
                        node: v,
                        part,
                        gain,
                    });
                }
            }
        }
    }

    /// the part's start node if still free, otherwise the lowest free node
    fn free_node(&self, hg: &Hypergraph, part: PartitionId) -> Option<HypernodeId> {
        let s = self.start[part as usize];
        if s != HypernodeId::MAX && hg.part_id(s) == self.unassigned {
            return Some(s);
        }
        hg.nodes().find(|&v| hg.part_id(v) == self.unassigned)
    }
}
