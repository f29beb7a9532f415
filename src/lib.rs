#![allow(clippy::needless_range_loop, clippy::too_many_arguments)]

//! Multilevel hypergraph partitioning: hyperedge coarsening with a reversible history, greedy
//! hypergraph growing for the initial partition, and gain-queue driven refinement while the
//! coarsening is undone.

#[macro_use]
pub mod util;

pub mod defs;
pub mod error;

pub mod checkhgraph;
pub mod coarsen;
pub mod dal;
pub mod gain;
pub mod gainpq;
pub mod hgraphio;
pub mod hypergraph;
pub mod initpart;
pub mod khmetis;
pub mod options;
pub mod pqueue;
pub mod rating;
pub mod refine;
pub mod stat;

pub use error::{Error, Result};
pub use hypergraph::Hypergraph;
pub use options::Ctrl;
