//! Type aliases, sentinels and default constants shared by every module.

pub type HypernodeId = u32;
pub type HyperedgeId = u32;
pub type PartitionId = i32;
pub type HypernodeWeight = i32;
pub type HyperedgeWeight = i32;
pub type Gain = i32;

/// Part id of a node that has not been assigned yet.
pub const INVALID_PART: PartitionId = -1;

/// Contraction limit is `COARSEN_TO_PER_PART * k` nodes
pub const COARSEN_TO_PER_PART: usize = 160;

/// Scales the average coarsest node weight into `max_allowed_node_weight`.
pub const MAX_NODE_WEIGHT_FACTOR: f64 = 3.25;

/* Debug levels, same bit layout as the METIS family */
pub const DBG_INFO: u32 = 1;
pub const DBG_TIME: u32 = 2;
pub const DBG_COARSEN: u32 = 4;
pub const DBG_REFINE: u32 = 8;
pub const DBG_IPART: u32 = 16;
pub const DBG_MOVEINFO: u32 = 32;
