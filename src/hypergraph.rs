//! Hypergraph storage: nodes and hyperedges with weights, enable flags and incidence lists, the
//! partition bookkeeping used by the gain engine (part weights, pin counts per part, cut count)
//! and the reversible contraction primitive used by the coarsener.
//!
//! Nodes and hyperedges are never deleted. Contraction disables the absorbed node and edge
//! removal disables the edge; both keep their data so that the operation can be undone exactly.

use crate::defs::*;

#[derive(Debug, Clone)]
struct Hypernode {
    weight: HypernodeWeight,
    part: PartitionId,
    enabled: bool,
    incident: Vec<HyperedgeId>,
}

#[derive(Debug, Clone)]
struct Hyperedge {
    weight: HyperedgeWeight,
    enabled: bool,
    pins: Vec<HypernodeId>,
}

/// What happened to one hyperedge of the absorbed node `v` during `contract(u, v)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinChange {
    /// `u` was already a pin, so `v` was swap-removed from position `pos`
    Removed { edge: HyperedgeId, pos: u32 },
    /// `v` at position `pos` was replaced by `u`
    Relinked { edge: HyperedgeId, pos: u32 },
}

/// Record of one contraction. The pin changes live in an arena owned by the caller and this
/// memento refers to them by `changes_begin..changes_begin + changes_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memento {
    /// representative
    pub u: HypernodeId,
    /// absorbed node
    pub v: HypernodeId,
    pub changes_begin: usize,
    pub changes_len: usize,
}

#[derive(Debug, Clone)]
pub struct Hypergraph {
    k: PartitionId,
    nodes: Vec<Hypernode>,
    edges: Vec<Hyperedge>,
    num_nodes: usize,
    num_edges: usize,
    num_pins: usize,
    total_weight: HypernodeWeight,
    pwgts: Vec<HypernodeWeight>,
    psizes: Vec<usize>,
    /// `pins_in_part[e * k + p]`, only kept current for enabled edges
    pins_in_part: Vec<u32>,
    ncut: usize,
}

impl Hypergraph {
    /// Unit-weight hypergraph from the CSR pair `eptr`/`eind` (pins of edge `e` are
    /// `eind[eptr[e]..eptr[e + 1]]`).
    pub fn new(nvtxs: usize, eptr: &[usize], eind: &[HypernodeId], k: PartitionId) -> Self {
        Self::with_weights(nvtxs, eptr, eind, k, None, None)
    }

    pub fn with_weights(
        nvtxs: usize,
        eptr: &[usize],
        eind: &[HypernodeId],
        k: PartitionId,
        ewgt: Option<&[HyperedgeWeight]>,
        vwgt: Option<&[HypernodeWeight]>,
    ) -> Self {
        assert!(k >= 1, "need at least one part");
        assert!(!eptr.is_empty() && eptr[0] == 0, "eptr starts at 0");
        assert_eq!(*eptr.last().expect("eptr is nonempty"), eind.len());
        let nedges = eptr.len() - 1;
        if let Some(ewgt) = ewgt {
            assert_eq!(ewgt.len(), nedges);
        }
        if let Some(vwgt) = vwgt {
            assert_eq!(vwgt.len(), nvtxs);
        }

        let mut nodes: Vec<Hypernode> = (0..nvtxs)
            .map(|i| Hypernode {
                weight: vwgt.map_or(1, |w| w[i]),
                part: INVALID_PART,
                enabled: true,
                incident: Vec::new(),
            })
            .collect();

        let mut edges = Vec::with_capacity(nedges);
        for e in 0..nedges {
            let pins = eind[eptr[e]..eptr[e + 1]].to_vec();
            for &p in &pins {
                assert!((p as usize) < nvtxs, "pin {p} of hyperedge {e} out of range");
                assert!(
                    nodes[p as usize].incident.last() != Some(&(e as HyperedgeId)),
                    "pin {p} appears twice in hyperedge {e}"
                );
                nodes[p as usize].incident.push(e as HyperedgeId);
            }
            edges.push(Hyperedge {
                weight: ewgt.map_or(1, |w| w[e]),
                enabled: true,
                pins,
            });
        }

        let total_weight = nodes.iter().map(|n| n.weight).sum();

        Self {
            k,
            num_nodes: nvtxs,
            num_edges: nedges,
            num_pins: eind.len(),
            total_weight,
            pwgts: vec![0; k as usize],
            psizes: vec![0; k as usize],
            pins_in_part: vec![0; nedges * k as usize],
            ncut: 0,
            nodes,
            edges,
        }
    }

    pub fn k(&self) -> PartitionId {
        self.k
    }

    pub fn initial_num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn initial_num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn current_num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn current_num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn current_num_pins(&self) -> usize {
        self.num_pins
    }

    pub fn total_weight(&self) -> HypernodeWeight {
        self.total_weight
    }

    /// enabled hypernodes in increasing id order
    pub fn nodes(&self) -> impl Iterator<Item = HypernodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.enabled)
            .map(|(i, _)| i as HypernodeId)
    }

    /// enabled hyperedges in increasing id order
    pub fn edges(&self) -> impl Iterator<Item = HyperedgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.enabled)
            .map(|(i, _)| i as HyperedgeId)
    }

    pub fn pins(&self, e: HyperedgeId) -> &[HypernodeId] {
        &self.edges[e as usize].pins
    }

    pub fn incident_edges(&self, v: HypernodeId) -> &[HyperedgeId] {
        &self.nodes[v as usize].incident
    }

    pub fn edge_size(&self, e: HyperedgeId) -> usize {
        self.edges[e as usize].pins.len()
    }

    pub fn node_degree(&self, v: HypernodeId) -> usize {
        self.nodes[v as usize].incident.len()
    }

    pub fn node_weight(&self, v: HypernodeId) -> HypernodeWeight {
        self.nodes[v as usize].weight
    }

    pub fn set_node_weight(&mut self, v: HypernodeId, weight: HypernodeWeight) {
        let node = &mut self.nodes[v as usize];
        let delta = weight - node.weight;
        node.weight = weight;
        if node.enabled {
            self.total_weight += delta;
        }
        if node.part != INVALID_PART {
            self.pwgts[node.part as usize] += delta;
        }
    }

    pub fn edge_weight(&self, e: HyperedgeId) -> HyperedgeWeight {
        self.edges[e as usize].weight
    }

    pub fn set_edge_weight(&mut self, e: HyperedgeId, weight: HyperedgeWeight) {
        self.edges[e as usize].weight = weight;
    }

    pub fn node_is_enabled(&self, v: HypernodeId) -> bool {
        self.nodes[v as usize].enabled
    }

    pub fn edge_is_enabled(&self, e: HyperedgeId) -> bool {
        self.edges[e as usize].enabled
    }

    /*************************************************************************/
    /* partition bookkeeping */
    /*************************************************************************/

    pub fn part_id(&self, v: HypernodeId) -> PartitionId {
        self.nodes[v as usize].part
    }

    pub fn part_weight(&self, p: PartitionId) -> HypernodeWeight {
        self.pwgts[p as usize]
    }

    pub fn part_size(&self, p: PartitionId) -> usize {
        self.psizes[p as usize]
    }

    /// number of pins of `e` in part `p`, zero for `INVALID_PART`
    pub fn pin_count_in_part(&self, e: HyperedgeId, p: PartitionId) -> u32 {
        if p == INVALID_PART {
            return 0;
        }
        self.pins_in_part[e as usize * self.k as usize + p as usize]
    }

    /// number of parts with at least one pin of `e`
    pub fn connectivity(&self, e: HyperedgeId) -> usize {
        let k = self.k as usize;
        let base = e as usize * k;
        self.pins_in_part[base..base + k]
            .iter()
            .filter(|&&c| c > 0)
            .count()
    }

    pub fn is_cut(&self, e: HyperedgeId) -> bool {
        self.connectivity(e) > 1
    }

    pub fn num_cut_hyperedges(&self) -> usize {
        self.ncut
    }

    /// Recounts the cut hyperedges from scratch. Call once after the initial assignment.
    pub fn initialize_num_cut_hyperedges(&mut self) {
        self.ncut = self.edges().filter(|&e| self.is_cut(e)).count();
    }

    /// Assigns `v` to `p`, moving it out of its current part if it has one.
    pub fn set_node_part(&mut self, v: HypernodeId, p: PartitionId) {
        assert!(0 <= p && p < self.k, "part {p} out of range");
        let from = self.nodes[v as usize].part;
        if from == p {
            return;
        }
        let k = self.k as usize;
        let w = self.nodes[v as usize].weight;

        self.nodes[v as usize].part = p;
        if from != INVALID_PART {
            self.pwgts[from as usize] -= w;
            self.psizes[from as usize] -= 1;
        }
        self.pwgts[p as usize] += w;
        self.psizes[p as usize] += 1;

        for i in 0..self.nodes[v as usize].incident.len() {
            let e = self.nodes[v as usize].incident[i];
            let was_cut = self.is_cut(e);
            if from != INVALID_PART {
                self.pins_in_part[e as usize * k + from as usize] -= 1;
            }
            self.pins_in_part[e as usize * k + p as usize] += 1;
            match (was_cut, self.is_cut(e)) {
                (false, true) => self.ncut += 1,
                (true, false) => self.ncut -= 1,
                _ => (),
            }
        }
    }

    pub fn change_node_part(&mut self, v: HypernodeId, from: PartitionId, to: PartitionId) {
        assert_eq!(self.part_id(v), from, "hypernode {v} is not in part {from}");
        self.set_node_part(v, to);
    }

    /// Unassigns every node.
    pub fn reset_partitioning(&mut self) {
        for node in self.nodes.iter_mut() {
            node.part = INVALID_PART;
        }
        self.pwgts.fill(0);
        self.psizes.fill(0);
        self.pins_in_part.fill(0);
        self.ncut = 0;
    }

    /*************************************************************************/
    /* structural changes */
    /*************************************************************************/

    /// Disables `e` and unlinks it from its pins. The pin list is kept for `restore_edge`.
    pub fn remove_edge(&mut self, e: HyperedgeId) {
        assert!(self.edges[e as usize].enabled, "hyperedge {e} already removed");
        if self.is_cut(e) {
            self.ncut -= 1;
        }
        for &p in &self.edges[e as usize].pins {
            let incident = &mut self.nodes[p as usize].incident;
            let i = incident
                .iter()
                .position(|&x| x == e)
                .expect("hyperedge is in the incidence list of its pins");
            incident.swap_remove(i);
        }
        self.edges[e as usize].enabled = false;
        self.num_edges -= 1;
        self.num_pins -= self.edges[e as usize].pins.len();
    }

    /// Re-enables a removed hyperedge and recomputes its pin counts from the current parts.
    pub fn restore_edge(&mut self, e: HyperedgeId) {
        assert!(!self.edges[e as usize].enabled, "hyperedge {e} is enabled");
        let k = self.k as usize;
        let base = e as usize * k;
        self.pins_in_part[base..base + k].fill(0);
        for &p in &self.edges[e as usize].pins {
            let node = &mut self.nodes[p as usize];
            debug_assert!(node.enabled);
            node.incident.push(e);
            if node.part != INVALID_PART {
                self.pins_in_part[base + node.part as usize] += 1;
            }
        }
        self.edges[e as usize].enabled = true;
        self.num_edges += 1;
        self.num_pins += self.edges[e as usize].pins.len();
        if self.is_cut(e) {
            self.ncut += 1;
        }
    }

    /// Contracts `v` into `u`: `u` takes the weight of `v` and the pin slots of `v`, `v` is
    /// disabled. Every changed hyperedge is appended to `changes`.
    pub fn contract(
        &mut self,
        u: HypernodeId,
        v: HypernodeId,
        changes: &mut Vec<PinChange>,
    ) -> Memento {
        assert_ne!(u, v, "self-contraction of hypernode {u}");
        assert!(
            self.node_is_enabled(u) && self.node_is_enabled(v),
            "contraction of a disabled hypernode ({u}, {v})"
        );
        assert_eq!(
            self.part_id(u),
            self.part_id(v),
            "contraction across parts ({u}, {v})"
        );

        let k = self.k as usize;
        let part = self.part_id(v);
        let changes_begin = changes.len();

        self.nodes[u as usize].weight += self.nodes[v as usize].weight;

        let incident = std::mem::take(&mut self.nodes[v as usize].incident);
        for &e in &incident {
            let pins = &mut self.edges[e as usize].pins;
            let pos = pins
                .iter()
                .position(|&p| p == v)
                .expect("hyperedge contains its incident node");
            if pins.contains(&u) {
                pins.swap_remove(pos);
                changes.push(PinChange::Removed {
                    edge: e,
                    pos: pos as u32,
                });
                if part != INVALID_PART {
                    self.pins_in_part[e as usize * k + part as usize] -= 1;
                }
                self.num_pins -= 1;
            } else {
                pins[pos] = u;
                self.nodes[u as usize].incident.push(e);
                changes.push(PinChange::Relinked {
                    edge: e,
                    pos: pos as u32,
                });
            }
        }
        self.nodes[v as usize].incident = incident;

        self.nodes[v as usize].enabled = false;
        self.num_nodes -= 1;
        if part != INVALID_PART {
            self.psizes[part as usize] -= 1;
        }

        Memento {
            u,
            v,
            changes_begin,
            changes_len: changes.len() - changes_begin,
        }
    }

    /// Exact inverse of `contract`. `v` is placed in the current part of `u`. Mementos must be
    /// undone in the reverse order they were created.
    pub fn uncontract(&mut self, memento: &Memento, changes: &[PinChange]) {
        let Memento { u, v, .. } = *memento;
        assert!(
            self.node_is_enabled(u) && !self.node_is_enabled(v),
            "uncontraction of ({u}, {v}) out of order"
        );

        let k = self.k as usize;
        let part = self.part_id(u);

        self.nodes[v as usize].enabled = true;
        self.nodes[v as usize].part = part;
        self.nodes[u as usize].weight -= self.nodes[v as usize].weight;
        self.num_nodes += 1;
        if part != INVALID_PART {
            self.psizes[part as usize] += 1;
        }

        let range = memento.changes_begin..memento.changes_begin + memento.changes_len;
        for change in changes[range].iter().rev() {
            match *change {
                PinChange::Removed { edge, pos } => {
                    let pins = &mut self.edges[edge as usize].pins;
                    let pos = pos as usize;
                    if pos == pins.len() {
                        pins.push(v);
                    } else {
                        let displaced = pins[pos];
                        pins[pos] = v;
                        pins.push(displaced);
                    }
                    if part != INVALID_PART {
                        self.pins_in_part[edge as usize * k + part as usize] += 1;
                    }
                    self.num_pins += 1;
                }
                PinChange::Relinked { edge, pos } => {
                    let pins = &mut self.edges[edge as usize].pins;
                    debug_assert_eq!(pins[pos as usize], u);
                    pins[pos as usize] = v;
                    let incident = &mut self.nodes[u as usize].incident;
                    let i = incident
                        .iter()
                        .position(|&e| e == edge)
                        .expect("relinked hyperedge is incident to the representative");
                    incident.swap_remove(i);
                }
            }
        }
    }

    /// Copies the enabled nodes of part `p` and the enabled hyperedges with at least two pins in
    /// `p` (restricted to those pins) into a fresh hypergraph with `k` parts. Returns it together
    /// with the map from new node ids to ids in `self`.
    pub fn extract_part(&self, p: PartitionId, k: PartitionId) -> (Hypergraph, Vec<HypernodeId>) {
        self.extract(|v| self.part_id(v) == p, k)
    }

    /// Like `extract_part` for the enabled nodes selected by `keep`.
    pub fn extract(
        &self,
        keep: impl Fn(HypernodeId) -> bool,
        k: PartitionId,
    ) -> (Hypergraph, Vec<HypernodeId>) {
        let mut map = vec![HypernodeId::MAX; self.nodes.len()];
        let mut orig = Vec::new();
        for v in self.nodes().filter(|&v| keep(v)) {
            map[v as usize] = orig.len() as HypernodeId;
            orig.push(v);
        }

        let mut eptr = vec![0];
        let mut eind = Vec::new();
        let mut ewgt = Vec::new();
        for e in self.edges() {
            let start = eind.len();
            eind.extend(
                self.pins(e)
                    .iter()
                    .filter(|&&pin| map[pin as usize] != HypernodeId::MAX)
                    .map(|&pin| map[pin as usize]),
            );
            if eind.len() - start < 2 {
                eind.truncate(start);
                continue;
            }
            eptr.push(eind.len());
            ewgt.push(self.edge_weight(e));
        }
        let vwgt: Vec<_> = orig.iter().map(|&v| self.node_weight(v)).collect();

        let sub = Hypergraph::with_weights(orig.len(), &eptr, &eind, k, Some(&ewgt), Some(&vwgt));
        (sub, orig)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// {0,2} {0,1,3,4} {3,4,6} {2,5,6}
    fn seven_nodes() -> Hypergraph {
        Hypergraph::new(
            7,
            &[0, 2, 6, 9, 12],
            &[0, 2, 0, 1, 3, 4, 3, 4, 6, 2, 5, 6],
            2,
        )
    }

    #[test]
    fn builds_incidence_lists() {
        let hg = seven_nodes();
        assert_eq!(hg.current_num_nodes(), 7);
        assert_eq!(hg.current_num_edges(), 4);
        assert_eq!(hg.current_num_pins(), 12);
        assert_eq!(hg.incident_edges(0), &[0, 1]);
        assert_eq!(hg.incident_edges(6), &[2, 3]);
        assert_eq!(hg.pins(1), &[0, 1, 3, 4]);
        assert_eq!(hg.total_weight(), 7);
    }

    #[test]
    fn tracks_pin_counts_and_cut() {
        let mut hg = seven_nodes();
        hg.set_node_part(0, 0);
        for v in 1..7 {
            hg.set_node_part(v, 1);
        }
        hg.initialize_num_cut_hyperedges();
        assert_eq!(hg.num_cut_hyperedges(), 2);
        assert_eq!(hg.pin_count_in_part(1, 1), 3);
        assert_eq!(hg.part_weight(0), 1);
        assert_eq!(hg.part_weight(1), 6);

        hg.change_node_part(2, 1, 0);
        // {0,2} is now internal, {2,5,6} is now cut
        assert_eq!(hg.num_cut_hyperedges(), 2);
        assert!(!hg.is_cut(0));
        assert!(hg.is_cut(3));
        assert_eq!(hg.part_size(0), 2);
    }

    #[test]
    fn uncontract_restores_pin_order() {
        let mut hg = seven_nodes();
        let before: Vec<Vec<_>> = (0..4).map(|e| hg.pins(e).to_vec()).collect();
        let mut changes = Vec::new();

        let m1 = hg.contract(3, 4, &mut changes);
        let m2 = hg.contract(3, 0, &mut changes);
        assert_eq!(hg.node_weight(3), 3);
        assert_eq!(hg.pins(1), &[3, 1]);
        assert_eq!(hg.pins(2).len(), 2);
        assert_eq!(hg.current_num_nodes(), 5);

        hg.uncontract(&m2, &changes);
        hg.uncontract(&m1, &changes);
        for e in 0..4 {
            assert_eq!(hg.pins(e), &before[e as usize][..]);
        }
        assert_eq!(hg.node_weight(3), 1);
        assert_eq!(hg.current_num_pins(), 12);
        let mut inc = hg.incident_edges(3).to_vec();
        inc.sort();
        assert_eq!(inc, vec![1, 2]);
    }

    #[test]
    fn uncontracted_node_joins_the_part_of_its_representative() {
        let mut hg = seven_nodes();
        let mut changes = Vec::new();
        let m = hg.contract(5, 6, &mut changes);
        for v in hg.nodes().collect::<Vec<_>>() {
            hg.set_node_part(v, if v < 3 { 0 } else { 1 });
        }
        hg.initialize_num_cut_hyperedges();
        hg.uncontract(&m, &changes);
        assert_eq!(hg.part_id(6), 1);
        assert_eq!(hg.part_size(1), 4);
        assert_eq!(hg.pin_count_in_part(2, 1), 3);
        assert_eq!(hg.pin_count_in_part(3, 1), 2);
    }

    #[test]
    fn remove_and_restore_edge() {
        let mut hg = seven_nodes();
        hg.remove_edge(1);
        assert!(!hg.edge_is_enabled(1));
        assert_eq!(hg.incident_edges(1), &[] as &[HyperedgeId]);
        assert_eq!(hg.current_num_pins(), 8);
        hg.restore_edge(1);
        assert!(hg.edge_is_enabled(1));
        assert_eq!(hg.incident_edges(1), &[1]);
        assert_eq!(hg.current_num_edges(), 4);
    }

    #[test]
    fn extracts_one_side() {
        let mut hg = seven_nodes();
        for v in 0..7 {
            hg.set_node_part(v, if [0, 1, 2, 5].contains(&v) { 0 } else { 1 });
        }
        let (sub, map) = hg.extract_part(1, 2);
        assert_eq!(map, vec![3, 4, 6]);
        // {0,1,3,4} shrinks to {3,4}, {0,2} and {2,5,6} have fewer than two pins in part 1
        assert_eq!(sub.current_num_edges(), 2);
        assert_eq!(sub.pins(0), &[0, 1]);
        assert_eq!(sub.pins(1), &[0, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "self-contraction")]
    fn rejects_self_contraction() {
        let mut hg = seven_nodes();
        hg.contract(2, 2, &mut Vec::new());
    }

    #[test]
    #[should_panic(expected = "disabled")]
    fn rejects_contraction_of_disabled_node() {
        let mut hg = seven_nodes();
        let mut changes = Vec::new();
        hg.contract(0, 2, &mut changes);
        hg.contract(1, 2, &mut changes);
    }
}
