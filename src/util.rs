//! Small helpers used across the crate

/// Evaluates `$body` only when `$flag` is set in the debug level `$lvl`.
///
/// ```
/// # use hgmetis::{ifset, defs::*};
/// let mut hits = 0;
/// ifset!(DBG_COARSEN | DBG_INFO, DBG_INFO, hits += 1);
/// ifset!(DBG_COARSEN, DBG_REFINE, hits += 1);
/// assert_eq!(hits, 1);
/// ```
#[macro_export]
macro_rules! ifset {
    ($lvl:expr, $flag:expr, $body:expr $(,)?) => {
        if ($lvl) & ($flag) != 0 {
            $body;
        }
    };
}

/// integer ceil of `a / b` for positive `b`
#[inline(always)]
pub fn ceil_div(a: i64, b: i64) -> i64 {
    debug_assert!(b > 0);
    (a + b - 1).div_euclid(b)
}
