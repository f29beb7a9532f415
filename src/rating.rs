//! Hyperedge rating policies for the coarsener.
//!
//! A rating scores contracting all pins of a hyperedge into its lowest-id pin. Policies are pure
//! functions of the current hypergraph state.

use crate::defs::*;
use crate::hypergraph::Hypergraph;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    /// representative the pins would be contracted into
    pub target: HypernodeId,
    pub value: f64,
    /// false if the contracted node would be heavier than the allowed maximum, or if there is
    /// nothing to contract
    pub valid: bool,
}

impl Rating {
    pub const INVALID: Rating = Rating {
        target: HypernodeId::MAX,
        value: f64::MIN,
        valid: false,
    };
}

pub trait RatingPolicy {
    fn rate(hg: &Hypergraph, e: HyperedgeId, max_allowed_node_weight: HypernodeWeight) -> Rating;
}

/// `w(e) / Π w(p)`
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeWeightDivMultPinWeight;

/// `w(e) / Σ w(p)`
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeWeightDivPinWeightSum;

impl RatingPolicy for EdgeWeightDivMultPinWeight {
    fn rate(hg: &Hypergraph, e: HyperedgeId, max_allowed_node_weight: HypernodeWeight) -> Rating {
        let pins = hg.pins(e);
        if pins.len() < 2 {
            return Rating::INVALID;
        }
        let mut sum: i64 = 0;
        let mut prod = 1.0;
        for &p in pins {
            let w = hg.node_weight(p);
            sum += w as i64;
            prod *= w as f64;
        }
        Rating {
            target: lowest_pin(pins),
            value: hg.edge_weight(e) as f64 / prod,
            valid: sum <= max_allowed_node_weight as i64,
        }
    }
}

impl RatingPolicy for EdgeWeightDivPinWeightSum {
    fn rate(hg: &Hypergraph, e: HyperedgeId, max_allowed_node_weight: HypernodeWeight) -> Rating {
        let pins = hg.pins(e);
        if pins.len() < 2 {
            return Rating::INVALID;
        }
        let sum: i64 = pins.iter().map(|&p| hg.node_weight(p) as i64).sum();
        Rating {
            target: lowest_pin(pins),
            value: hg.edge_weight(e) as f64 / sum as f64,
            valid: sum <= max_allowed_node_weight as i64,
        }
    }
}

fn lowest_pin(pins: &[HypernodeId]) -> HypernodeId {
    pins.iter().copied().min().unwrap_or(HypernodeId::MAX)
}

#[cfg(test)]
mod test {
    use super::*;

    fn hg() -> Hypergraph {
        // {0,1,2} {1,3}
        Hypergraph::with_weights(
            4,
            &[0, 3, 5],
            &[2, 0, 1, 3, 1],
            2,
            Some(&[6, 4]),
            Some(&[1, 2, 3, 4]),
        )
    }

    #[test]
    fn product_rating() {
        let hg = hg();
        let r = EdgeWeightDivMultPinWeight::rate(&hg, 0, 6);
        assert_eq!(r.target, 0);
        assert_eq!(r.value, 1.0);
        assert!(r.valid);
        let r = EdgeWeightDivMultPinWeight::rate(&hg, 1, 6);
        assert_eq!(r.target, 1);
        assert_eq!(r.value, 0.5);
        assert!(r.valid);
    }

    #[test]
    fn sum_rating() {
        let hg = hg();
        let r = EdgeWeightDivPinWeightSum::rate(&hg, 1, 6);
        assert_eq!(r.value, 4.0 / 6.0);
        assert!(r.valid);
    }

    #[test]
    fn heavy_contraction_is_invalid() {
        let hg = hg();
        assert!(!EdgeWeightDivMultPinWeight::rate(&hg, 0, 5).valid);
        assert!(!EdgeWeightDivPinWeightSum::rate(&hg, 1, 5).valid);
    }
}
