//! Splits `[0, n)` into contiguous per-worker ranges.

use std::ops::Range;

/// One contiguous stripe per worker, each `ceil(n / workers)` long except
/// possibly the last. Stripes that would start at or past `n` are omitted,
/// so fewer than `workers` ranges come back when the tail runs out early.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    if n == 0 {
        return Vec::new();
    }
    let stride = n.div_ceil(workers);

    (0..workers)
        .map(|w| w * stride)
        .take_while(|&begin| begin < n)
        .map(|begin| begin..(begin + stride).min(n))
        .collect()
}
